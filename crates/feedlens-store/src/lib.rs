//! Feedlens Store
//!
//! Persistence for feedback items and their latest analysis.
//!
//! Writes are replace-on-conflict by id: re-analyzing a feedback item
//! overwrites its previous analysis instead of adding a second one.
//! Stores must be readied once with [`FeedbackStore::ensure_ready`]
//! before use; the call is idempotent.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedlens_core::{FeedbackItem, Result, Sentiment, SentimentAnalysisResult};
use serde::{Deserialize, Serialize};

/// Default page size for listings
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Stored analysis of one feedback item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub feedback_id: String,

    #[serde(flatten)]
    pub result: SentimentAnalysisResult,

    pub analyzed_at: DateTime<Utc>,
}

/// Feedback joined with its latest analysis, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackWithAnalysis {
    #[serde(flatten)]
    pub feedback: FeedbackItem,

    pub sentiment: Option<AnalysisRecord>,
}

/// Counts over stored analyses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentStats {
    /// Count one analysis
    pub fn record(&mut self, sentiment: Sentiment) {
        self.total += 1;
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }
}

impl FromIterator<Sentiment> for SentimentStats {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut stats = Self::default();
        for sentiment in iter {
            stats.record(sentiment);
        }
        stats
    }
}

/// Feedback and analysis persistence
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Prepare the store. Safe to call any number of times; only the first
    /// call does work.
    async fn ensure_ready(&self) -> Result<()>;

    /// Insert or replace a feedback item by id
    async fn upsert_feedback(&self, item: &FeedbackItem) -> Result<()>;

    /// Insert or replace several feedback items
    async fn upsert_feedback_batch(&self, items: &[FeedbackItem]) -> Result<()> {
        for item in items {
            self.upsert_feedback(item).await?;
        }
        Ok(())
    }

    /// Insert or replace the analysis for a feedback id
    async fn upsert_analysis(&self, feedback_id: &str, result: &SentimentAnalysisResult) -> Result<()>;

    /// Insert or replace several analyses
    async fn upsert_analysis_batch(&self, results: &[(String, SentimentAnalysisResult)]) -> Result<()> {
        for (feedback_id, result) in results {
            self.upsert_analysis(feedback_id, result).await?;
        }
        Ok(())
    }

    async fn get_feedback(&self, id: &str) -> Result<Option<FeedbackItem>>;

    async fn get_analysis(&self, feedback_id: &str) -> Result<Option<AnalysisRecord>>;

    /// Feedback newest first, each with its latest analysis
    async fn list_feedback_with_analysis(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<FeedbackWithAnalysis>>;

    async fn sentiment_stats(&self) -> Result<SentimentStats>;

    /// Get the store name
    fn name(&self) -> &str;
}
