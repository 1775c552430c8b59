//! Server configuration

use crate::cli::Cli;
use feedlens_classifiers::{BatchConfig, RemoteConfig};
use feedlens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hosted model endpoints and credentials
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Batch admission and chunking
    #[serde(default)]
    pub batch: BatchConfig,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config: Self = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(account_id) = &cli.account_id {
            config.remote.account_id = Some(account_id.clone());
        }
        if let Some(api_token) = &cli.api_token {
            config.remote.api_token = Some(api_token.clone());
        }
        if let Some(ceiling) = cli.call_ceiling {
            config.batch.call_ceiling = ceiling;
        }
        if let Some(environment) = &cli.environment {
            config.cors.environment = environment.clone();
        }

        // Credentials not given in the file or on the command line come from the environment
        config.remote = config.remote.with_env_credentials();

        Ok(config)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        self.remote.credentials()?;
        self.batch.validate()?;
        if !self.cors.is_development() && self.cors.allowed_origins.is_empty() {
            return Err(Error::config(
                "cors.allowed_origins must be set outside development",
            ));
        }
        Ok(())
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Deployment environment; `development` allows any origin
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Origins allowed outside development
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_environment() -> String {
    "development".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["feedlens-server"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("does-not-exist.yaml", &cli(&[])).unwrap();
        assert_eq!(config.batch.call_ceiling, 50);
        assert_eq!(config.batch.chunk_size, 10);
        assert!(config.cors.is_development());
    }

    #[test]
    fn test_yaml_shape() {
        let yaml = r#"
remote:
  account_id: acct-1
  chat_model: "@cf/meta/llama-3.1-70b-instruct"
batch:
  call_ceiling: 40
  chunk_timeout_secs: 20
cors:
  environment: production
  allowed_origins: ["https://feedback.example.com"]
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.remote.account_id.as_deref(), Some("acct-1"));
        assert_eq!(config.remote.chat_model, "@cf/meta/llama-3.1-70b-instruct");
        assert_eq!(
            config.remote.sentiment_model,
            "@cf/huggingface/distilbert-sst-2-int8"
        );
        assert_eq!(config.batch.call_ceiling, 40);
        assert_eq!(config.batch.chunk_size, 10);
        assert_eq!(config.batch.chunk_timeout_secs, Some(20));
        assert!(!config.cors.is_development());
    }

    #[test]
    fn test_cli_overrides() {
        let config = ServerConfig::load(
            "does-not-exist.yaml",
            &cli(&[
                "--account-id",
                "acct-2",
                "--api-token",
                "secret",
                "--call-ceiling",
                "20",
            ]),
        )
        .unwrap();
        assert_eq!(config.remote.account_id.as_deref(), Some("acct-2"));
        assert_eq!(config.batch.call_ceiling, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = ServerConfig::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_requires_origins_outside_development() {
        let mut config = ServerConfig::default();
        config.remote.account_id = Some("acct".to_string());
        config.remote.api_token = Some("token".to_string());
        config.cors.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.cors.allowed_origins = vec!["https://feedback.example.com".to_string()];
        assert!(config.validate().is_ok());
    }
}
