//! Shared application state

use crate::config::ServerConfig;
use anyhow::Result;
use feedlens_classifiers::{
    BatchOrchestrator, BinaryClassifier, ChatModel, SentimentAnalyzer, ThemeClassifier,
    WorkersAiClient,
};
use feedlens_store::{FeedbackStore, MemoryStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Single-item analyzer
    pub analyzer: Arc<SentimentAnalyzer>,

    /// Batch runner sharing the analyzer
    pub orchestrator: Arc<BatchOrchestrator>,

    /// Theme-only classifier
    pub themes: Arc<ThemeClassifier>,

    /// Feedback and analysis persistence
    pub store: Arc<dyn FeedbackStore>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state from configuration
    pub async fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        config.validate()?;

        let client = Arc::new(WorkersAiClient::new(&config.remote)?);
        info!(
            sentiment_model = %config.remote.sentiment_model,
            chat_model = %config.remote.chat_model,
            "inference client ready"
        );

        let store: Arc<dyn FeedbackStore> = Arc::new(MemoryStore::new());
        Self::from_parts(config, client.clone(), client, store, metrics_handle).await
    }

    /// Assemble state from already-built remotes and store
    pub async fn from_parts(
        config: ServerConfig,
        classifier: Arc<dyn BinaryClassifier>,
        chat: Arc<dyn ChatModel>,
        store: Arc<dyn FeedbackStore>,
        metrics_handle: PrometheusHandle,
    ) -> Result<Self> {
        store.ensure_ready().await?;

        let analyzer = Arc::new(SentimentAnalyzer::new(classifier, chat.clone())?);
        let orchestrator = Arc::new(BatchOrchestrator::new(
            analyzer.clone(),
            config.batch.clone(),
        )?);
        info!(
            max_items = orchestrator.max_items(),
            chunk_size = config.batch.chunk_size,
            "batch orchestrator ready"
        );

        Ok(Self {
            config: Arc::new(config),
            analyzer,
            orchestrator,
            themes: Arc::new(ThemeClassifier::new(chat)),
            store,
            metrics_handle,
        })
    }
}
