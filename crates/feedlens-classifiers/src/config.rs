//! Configuration for hosted models and batch analysis

use feedlens_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Environment variable holding the inference account id
pub const ACCOUNT_ID_ENV: &str = "CLOUDFLARE_ACCOUNT_ID";

/// Environment variable holding the inference API token
pub const API_TOKEN_ENV: &str = "CLOUDFLARE_API_TOKEN";

/// Hosted inference endpoint configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Account that owns the models
    #[serde(default)]
    pub account_id: Option<String>,

    /// Bearer token
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Binary sentiment model
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,

    /// Chat/instruction model
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Fill credentials from the environment when not set explicitly
    pub fn with_env_credentials(mut self) -> Self {
        if self.account_id.is_none() {
            self.account_id = std::env::var(ACCOUNT_ID_ENV).ok();
        }
        if self.api_token.is_none() {
            self.api_token = std::env::var(API_TOKEN_ENV).ok();
        }
        self
    }

    /// Credentials, or a configuration error naming what is missing
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let account_id = self.account_id.as_deref().filter(|s| !s.is_empty());
        let api_token = self.api_token.as_deref().filter(|s| !s.is_empty());

        match (account_id, api_token) {
            (Some(account_id), Some(api_token)) => Ok((account_id, api_token)),
            _ => Err(Error::config(format!(
                "inference credentials missing; set {ACCOUNT_ID_ENV} and {API_TOKEN_ENV}"
            ))),
        }
    }

    /// URL for running `model`
    pub fn model_url(&self, account_id: &str, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url.trim_end_matches('/'),
            account_id,
            model
        )
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            base_url: default_base_url(),
            sentiment_model: default_sentiment_model(),
            chat_model: default_chat_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Keep the token out of logs
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("account_id", &self.account_id)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("sentiment_model", &self.sentiment_model)
            .field("chat_model", &self.chat_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Batch admission and chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Hard ceiling on outbound calls per batch request
    #[serde(default = "default_call_ceiling")]
    pub call_ceiling: usize,

    /// Items per sequential chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Optional wall-clock limit per chunk; an expired chunk falls back to defaults
    #[serde(default)]
    pub chunk_timeout_secs: Option<u64>,
}

impl BatchConfig {
    /// Reject settings the orchestrator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("batch.chunk_size must be at least 1"));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            call_ceiling: default_call_ceiling(),
            chunk_size: default_chunk_size(),
            chunk_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_sentiment_model() -> String {
    "@cf/huggingface/distilbert-sst-2-int8".to_string()
}

fn default_chat_model() -> String {
    "@cf/meta/llama-3.1-8b-instruct".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_call_ceiling() -> usize {
    50 // free-tier subrequest limit
}

fn default_chunk_size() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let batch = BatchConfig::default();
        assert_eq!(batch.call_ceiling, 50);
        assert_eq!(batch.chunk_size, 10);
        assert!(batch.chunk_timeout_secs.is_none());
        assert!(batch.validate().is_ok());
        assert_eq!(RemoteConfig::default().timeout_secs, 30);
    }

    #[test]
    fn test_missing_credentials() {
        let config = RemoteConfig {
            account_id: Some("acct".to_string()),
            api_token: Some(String::new()),
            ..Default::default()
        };
        let err = config.credentials().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_model_url() {
        let config = RemoteConfig {
            base_url: "https://example.test/v4/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.model_url("acct", "@cf/meta/llama-3.1-8b-instruct"),
            "https://example.test/v4/accounts/acct/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = RemoteConfig {
            api_token: Some("super-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = BatchConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
