use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of handlers a task can be assigned to.
///
/// The three specialists are the only labels delegation may produce.
/// `StepExecutor` handles the steps of a stored plan and is attached when the
/// plan is stored, never by classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum HandlerRole {
    #[serde(rename = "DevOps Engineer")]
    DevOpsEngineer,
    #[serde(rename = "Technical Lead")]
    TechnicalLead,
    #[serde(rename = "Software Engineer")]
    SoftwareEngineer,
    #[serde(rename = "Step Executor")]
    StepExecutor,
}

impl HandlerRole {
    /// Labels delegation may return, in the order the classifier reply is
    /// checked. The last entry is the fallback for unrecognised replies.
    pub const SPECIALISTS: [HandlerRole; 3] = [
        HandlerRole::DevOpsEngineer,
        HandlerRole::TechnicalLead,
        HandlerRole::SoftwareEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DevOpsEngineer => "DevOps Engineer",
            Self::TechnicalLead => "Technical Lead",
            Self::SoftwareEngineer => "Software Engineer",
            Self::StepExecutor => "Step Executor",
        }
    }

    /// Task category recorded once the role is attached.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DevOpsEngineer => "devops",
            Self::TechnicalLead => "technical_leadership",
            Self::SoftwareEngineer => "development",
            Self::StepExecutor => "plan_step",
        }
    }
}

impl std::fmt::Display for HandlerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_matches_serialized_form() {
        for role in [
            HandlerRole::DevOpsEngineer,
            HandlerRole::TechnicalLead,
            HandlerRole::SoftwareEngineer,
            HandlerRole::StepExecutor,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    #[test]
    fn test_specialists_exclude_step_executor() {
        assert!(!HandlerRole::SPECIALISTS.contains(&HandlerRole::StepExecutor));
        assert_eq!(HandlerRole::SPECIALISTS[2], HandlerRole::SoftwareEngineer);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&HandlerRole::TechnicalLead).unwrap();
        assert_eq!(json, "\"Technical Lead\"");

        let role: HandlerRole = serde_json::from_str("\"Software Engineer\"").unwrap();
        assert_eq!(role, HandlerRole::SoftwareEngineer);
    }
}
