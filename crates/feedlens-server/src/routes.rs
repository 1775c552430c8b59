//! HTTP routes and handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use feedlens_core::{FeedbackItem, FeedbackSource, SentimentAnalysisResult};
use feedlens_store::{FeedbackWithAnalysis, SentimentStats, DEFAULT_LIST_LIMIT};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::CorsConfig;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/analyze", post(analyze))
        .route("/api/analyze/batch", post(analyze_batch))
        .route("/api/theme", post(classify_theme))
        .route("/api/feedback", get(list_feedback))
        .route("/api/stats", get(stats))
        .route("/api/results/:id", get(result_by_id))
        .fallback(fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.is_development() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Feedlens API", "status": "ok" }))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Feedback as submitted by clients; everything but `content` is optional
#[derive(Debug, Deserialize)]
struct FeedbackInput {
    id: Option<String>,
    #[serde(default)]
    source: FeedbackSource,
    content: Option<String>,
    author: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: HashMap<String, Value>,
    /// Pre-assigned theme, folded into metadata
    theme: Option<String>,
}

impl FeedbackInput {
    /// Decode one batch entry; fields that fail to decode fall back to their defaults
    fn lenient(entry: &Value) -> Self {
        serde_json::from_value(entry.clone()).unwrap_or_else(|e| {
            debug!(error = %e, "batch entry did not decode cleanly, using field defaults");
            Self {
                id: decoded_field(entry, "id"),
                source: decoded_field(entry, "source").unwrap_or_default(),
                content: decoded_field(entry, "content"),
                author: decoded_field(entry, "author"),
                timestamp: decoded_field(entry, "timestamp"),
                metadata: decoded_field(entry, "metadata").unwrap_or_default(),
                theme: decoded_field(entry, "theme"),
            }
        })
    }

    fn into_item(self) -> FeedbackItem {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("temp-{}", uuid::Uuid::new_v4()));

        let mut item = FeedbackItem::new(id, self.source, self.content.unwrap_or_default());
        item.author = self.author;
        if let Some(timestamp) = self.timestamp {
            item.timestamp = timestamp;
        }
        item.metadata = self.metadata;
        if let Some(theme) = self.theme {
            item.metadata.entry("theme".to_string()).or_insert(Value::String(theme));
        }
        item
    }
}

fn decoded_field<T: DeserializeOwned>(entry: &Value, key: &str) -> Option<T> {
    entry
        .get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    feedback: FeedbackItem,
    sentiment: SentimentAnalysisResult,
}

/// Analyze a single feedback item
async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    metrics::counter!("feedlens_requests_total", "route" => "analyze").increment(1);

    let input: FeedbackInput = serde_json::from_value(body)?;
    if input.content.as_deref().map_or(true, |c| c.trim().is_empty()) {
        return Err(AppError::InvalidRequest(
            "Missing required field: content".to_string(),
        ));
    }

    let item = input.into_item();
    let sentiment = state.analyzer.analyze_or_fallback(&item).await;
    persist(&state, std::slice::from_ref(&item), std::slice::from_ref(&sentiment)).await;

    info!(feedback_id = %item.id, sentiment = %sentiment.sentiment, "analyzed feedback");
    Ok(Json(AnalyzeResponse {
        feedback: item,
        sentiment,
    }))
}

/// One batch entry in the shape the dashboard consumes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzedFeedback {
    id: String,
    source: FeedbackSource,
    content: String,
    sentiment: feedlens_core::Sentiment,
    sentiment_score: f64,
    author: String,
    timestamp: DateTime<Utc>,
    theme: feedlens_core::Theme,
    emotion: feedlens_core::Emotion,
    urgency: u8,
    confidence: f64,
    reasoning: String,
}

impl AnalyzedFeedback {
    fn new(item: &FeedbackItem, result: &SentimentAnalysisResult) -> Self {
        Self {
            id: item.id.clone(),
            source: item.source,
            content: item.content.clone(),
            sentiment: result.sentiment,
            sentiment_score: result.score,
            author: item.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            timestamp: item.timestamp,
            theme: result.theme,
            emotion: result.emotion,
            urgency: result.urgency,
            confidence: result.confidence,
            reasoning: result.reasoning.clone(),
        }
    }
}

/// Analyze up to the admission cap; the response holds only admitted items
async fn analyze_batch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<AnalyzedFeedback>>, AppError> {
    metrics::counter!("feedlens_requests_total", "route" => "analyze_batch").increment(1);

    let entries = body
        .get("feedback")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::InvalidRequest("Missing or invalid feedback array".to_string()))?;

    // Entries past the admission cap are dropped before they are decoded
    let max_items = state.orchestrator.max_items();
    if entries.len() > max_items {
        let dropped = entries.len() - max_items;
        warn!(
            received = entries.len(),
            admitted = max_items,
            dropped,
            "batch exceeds outbound call ceiling, dropping excess items"
        );
        metrics::counter!("feedlens_items_dropped_total").increment(dropped as u64);
    }

    // Undecodable entries become empty items and get the default result
    let items: Vec<FeedbackItem> = entries
        .iter()
        .take(max_items)
        .map(|entry| FeedbackInput::lenient(entry).into_item())
        .collect();

    info!(items = items.len(), "processing feedback batch");
    let outcome = state.orchestrator.execute(&items).await;
    let admitted = &items[..outcome.admitted];

    persist(&state, admitted, &outcome.results).await;

    Ok(Json(
        admitted
            .iter()
            .zip(&outcome.results)
            .map(|(item, result)| AnalyzedFeedback::new(item, result))
            .collect(),
    ))
}

#[derive(Debug, Serialize)]
struct ThemeResponse {
    theme: feedlens_core::Theme,
}

/// Classify the theme of one piece of feedback
async fn classify_theme(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ThemeResponse>, AppError> {
    metrics::counter!("feedlens_requests_total", "route" => "theme").increment(1);

    let input: FeedbackInput = serde_json::from_value(body)?;
    if input.content.as_deref().map_or(true, |c| c.trim().is_empty()) {
        return Err(AppError::InvalidRequest(
            "Missing required field: content".to_string(),
        ));
    }

    let theme = state.themes.classify_theme(&input.into_item()).await;
    Ok(Json(ThemeResponse { theme }))
}

#[derive(Debug, Deserialize)]
struct Paging {
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn list_feedback(
    State(state): State<AppState>,
    Query(paging): Query<Paging>,
) -> Result<Json<Vec<FeedbackWithAnalysis>>, AppError> {
    let feedback = state
        .store
        .list_feedback_with_analysis(
            paging.limit.unwrap_or(DEFAULT_LIST_LIMIT),
            paging.offset.unwrap_or(0),
        )
        .await?;
    Ok(Json(feedback))
}

async fn stats(State(state): State<AppState>) -> Result<Json<SentimentStats>, AppError> {
    Ok(Json(state.store.sentiment_stats().await?))
}

#[derive(Debug, Serialize)]
struct StoredResult {
    id: String,
    feedback: FeedbackItem,
    sentiment: SentimentAnalysisResult,
}

/// Stored feedback with its analysis, analyzing it first if it never was
async fn result_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredResult>, AppError> {
    let feedback = state
        .store
        .get_feedback(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    let sentiment = match state.store.get_analysis(&id).await? {
        Some(record) => record.result,
        None => {
            let sentiment = state.analyzer.analyze_or_fallback(&feedback).await;
            if let Err(e) = state.store.upsert_analysis(&id, &sentiment).await {
                error!(feedback_id = %id, error = %e, "failed to store analysis, continuing");
            }
            sentiment
        }
    };

    Ok(Json(StoredResult {
        id,
        feedback,
        sentiment,
    }))
}

/// Store feedback and results pairwise; failures are logged, never returned
async fn persist(state: &AppState, items: &[FeedbackItem], results: &[SentimentAnalysisResult]) {
    if let Err(e) = state.store.upsert_feedback_batch(items).await {
        error!(error = %e, "failed to store feedback, continuing");
        return;
    }

    let analyses: Vec<(String, SentimentAnalysisResult)> = items
        .iter()
        .zip(results)
        .map(|(item, result)| (item.id.clone(), result.clone()))
        .collect();
    if let Err(e) = state.store.upsert_analysis_batch(&analyses).await {
        error!(error = %e, "failed to store analysis results, continuing");
    }
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound(String),
    InternalError(String),
}

impl From<feedlens_core::Error> for AppError {
    fn from(err: feedlens_core::Error) -> Self {
        match err {
            feedlens_core::Error::Validation(msg) | feedlens_core::Error::Parse(msg) => {
                AppError::InvalidRequest(msg)
            }
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InternalError(details) => {
                error!(details = %details, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
