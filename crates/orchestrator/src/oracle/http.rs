use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, warn};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ProviderErrorBody,
};
use super::{Oracle, OracleError};
use crate::config::OracleConfig;

/// Oracle backed by an OpenAI-compatible chat completions API.
///
/// Failures are reported once and never retried here; retry policy belongs to
/// the caller.
#[derive(Clone)]
pub struct HttpOracle {
    client: Client,
    config: OracleConfig,
}

impl HttpOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OracleError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn status_error(status: StatusCode, body: String) -> OracleError {
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .map(|parsed| {
                if let Some(kind) = parsed.error.error_type {
                    format!("{} ({})", parsed.error.message, kind)
                } else {
                    parsed.error.message
                }
            })
            .unwrap_or(body);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by oracle provider");
            return OracleError::Unavailable(format!("rate limited: {}", message));
        }

        if status.is_server_error() {
            error!(status = status.as_u16(), "Oracle provider server error: {}", message);
            return OracleError::Unavailable(format!("provider returned {}: {}", status, message));
        }

        error!(status = status.as_u16(), "Oracle provider rejected request: {}", message);
        OracleError::Provider {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn complete(&self, system: &str, user: &str) -> Result<String, OracleError> {
        debug!(
            model = %self.config.model,
            system_len = system.len(),
            user_len = user.len(),
            "Sending chat completion"
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        let mut builder = self
            .client
            .post(self.config.endpoint("chat/completions"))
            .json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Unavailable(format!(
                    "request timed out after {}s",
                    self.config.timeout_secs
                ))
            } else {
                OracleError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, body));
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(|e| OracleError::Provider {
                status: status.as_u16(),
                message: format!("malformed completion body: {}", e),
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        debug!(response_len = content.len(), "Chat completion received");
        Ok(content)
    }
}
