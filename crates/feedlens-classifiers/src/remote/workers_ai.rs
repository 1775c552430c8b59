//! Workers AI REST client
//!
//! Both models are served from the same endpoint family:
//! ```text
//! POST {base_url}/accounts/{account_id}/ai/run/{model}
//! Authorization: Bearer {api_token}
//! ```
//! and answer with a `{"result": ...}` envelope.

use super::response::{unwrap_envelope, ChatPayload, ClassificationPayload};
use crate::classifier::{BinaryClassifier, ChatModel, RawClassification};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use feedlens_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A chat message in a model request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
}

/// Client for the hosted binary sentiment and chat models
#[derive(Clone)]
pub struct WorkersAiClient {
    http: reqwest::Client,
    sentiment_url: String,
    chat_url: String,
    api_token: String,
    sentiment_model: String,
    chat_model: String,
}

impl WorkersAiClient {
    /// Build a client; fails with a configuration error when credentials are missing
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let (account_id, api_token) = config.credentials()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            sentiment_url: config.model_url(account_id, &config.sentiment_model),
            chat_url: config.model_url(account_id, &config.chat_model),
            api_token: api_token.to_string(),
            sentiment_model: config.sentiment_model.clone(),
            chat_model: config.chat_model.clone(),
        })
    }

    /// POST a JSON body and return the unwrapped payload
    async fn run<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value> {
        let start = Instant::now();

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::remote(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                "inference API returned an error response"
            );
            return Err(Error::remote_status(
                status.as_u16(),
                format!(
                    "{} - {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    error_text
                ),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::remote(format!("malformed response body: {e}")))?;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "inference call completed"
        );

        Ok(unwrap_envelope(body))
    }
}

#[async_trait]
impl BinaryClassifier for WorkersAiClient {
    async fn classify_binary_sentiment(&self, text: &str) -> Result<RawClassification> {
        let payload = self
            .run(&self.sentiment_url, &ClassificationRequest { text })
            .await?;
        ClassificationPayload::from_value(payload).into_raw()
    }

    fn name(&self) -> &str {
        &self.sentiment_model
    }
}

#[async_trait]
impl ChatModel for WorkersAiClient {
    async fn chat_complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)],
        };
        let payload = self.run(&self.chat_url, &request).await?;
        Ok(ChatPayload::from_value(payload).into_text())
    }

    fn name(&self) -> &str {
        &self.chat_model
    }
}
