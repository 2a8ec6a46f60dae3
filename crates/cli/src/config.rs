use std::path::Path;

use anyhow::{Context, Result};
use orchestrator::{OracleConfig, OrchestratorConfig};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "agent-patterns.toml";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub oracle: OracleSection,
    pub patterns: OrchestratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Oracle settings as written on disk. The key itself is read from the
/// environment variable named by `api_key_env`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    pub api_key_env: String,
    #[serde(flatten)]
    pub connection: OracleConfig,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            connection: OracleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Oracle connection with the API key resolved from the environment.
    pub fn oracle_config(&self) -> OracleConfig {
        let connection = self.oracle.connection.clone();
        match std::env::var(&self.oracle.api_key_env) {
            Ok(key) if !key.trim().is_empty() => connection.with_api_key(key),
            _ => connection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert_eq!(config.oracle.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(config.patterns.max_reflection_iterations, 10);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[oracle]\nmodel = \"local-model\"\nbase_url = \"http://localhost:11434/v1\"\ntemperature = 0.2"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.oracle.connection.model, "local-model");
        assert_eq!(config.oracle.connection.base_url, "http://localhost:11434/v1");
        assert_eq!(config.oracle.connection.temperature, Some(0.2));
        assert_eq!(config.patterns.default_reflection_iterations, 1);
    }

    #[test]
    fn test_written_defaults_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, AppConfig::default().to_toml().unwrap()).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.oracle.connection.model, orchestrator::config::DEFAULT_ORACLE_MODEL);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();

        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_api_key_is_read_from_named_variable() {
        let mut config = AppConfig::default();
        config.oracle.api_key_env = "AGENT_PATTERNS_TEST_KEY_UNSET".to_string();
        assert!(config.oracle_config().api_key.is_none());

        config.oracle.api_key_env = "PATH".to_string();
        assert!(config.oracle_config().api_key.is_some());
    }
}
