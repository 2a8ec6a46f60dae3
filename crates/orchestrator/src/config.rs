use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ORACLE_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ORACLE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 120;

/// Connection settings for [`crate::HttpOracle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    /// Bearer token. Never written back to config files.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORACLE_BASE_URL.to_string(),
            model: DEFAULT_ORACLE_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl OracleConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `base_url` without a trailing slash, ready for path joining.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Rounds used by `reflect` when the caller does not ask for a count.
    pub default_reflection_iterations: u32,
    /// Upper bound on requested rounds; larger requests are rejected.
    pub max_reflection_iterations: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_reflection_iterations: 1,
            max_reflection_iterations: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.base_url, DEFAULT_ORACLE_BASE_URL);
        assert_eq!(config.model, DEFAULT_ORACLE_MODEL);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = OracleConfig::default().with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            config.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OracleConfig = serde_json::from_str(r#"{"model":"llama3"}"#).unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.base_url, DEFAULT_ORACLE_BASE_URL);
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = OracleConfig::default().with_api_key("sk-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_orchestrator_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.default_reflection_iterations, 1);
        assert_eq!(config.max_reflection_iterations, 10);
    }
}
