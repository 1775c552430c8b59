//! In-memory store

use crate::{AnalysisRecord, FeedbackStore, FeedbackWithAnalysis, SentimentStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedlens_core::{Error, FeedbackItem, Result, SentimentAnalysisResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info};

#[derive(Default)]
struct Tables {
    feedback: HashMap<String, FeedbackItem>,
    analyses: HashMap<String, AnalysisRecord>,
}

/// Process-local store backed by hash maps
#[derive(Default)]
pub struct MemoryStore {
    ready: OnceLock<DateTime<Utc>>,
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the store was readied, if it has been
    pub fn ready_since(&self) -> Option<DateTime<Utc>> {
        self.ready.get().copied()
    }

    fn check_ready(&self) -> Result<()> {
        if self.ready.get().is_none() {
            return Err(Error::store("store used before ensure_ready"));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn ensure_ready(&self) -> Result<()> {
        self.ready.get_or_init(|| {
            info!(store = "memory", "feedback store ready");
            Utc::now()
        });
        Ok(())
    }

    async fn upsert_feedback(&self, item: &FeedbackItem) -> Result<()> {
        self.check_ready()?;
        self.tables
            .write()
            .feedback
            .insert(item.id.clone(), item.clone());
        debug!(feedback_id = %item.id, "stored feedback");
        Ok(())
    }

    async fn upsert_analysis(&self, feedback_id: &str, result: &SentimentAnalysisResult) -> Result<()> {
        self.check_ready()?;
        let record = AnalysisRecord {
            feedback_id: feedback_id.to_string(),
            result: result.clone(),
            analyzed_at: Utc::now(),
        };
        self.tables
            .write()
            .analyses
            .insert(feedback_id.to_string(), record);
        debug!(feedback_id, sentiment = %result.sentiment, "stored analysis");
        Ok(())
    }

    async fn get_feedback(&self, id: &str) -> Result<Option<FeedbackItem>> {
        self.check_ready()?;
        Ok(self.tables.read().feedback.get(id).cloned())
    }

    async fn get_analysis(&self, feedback_id: &str) -> Result<Option<AnalysisRecord>> {
        self.check_ready()?;
        Ok(self.tables.read().analyses.get(feedback_id).cloned())
    }

    async fn list_feedback_with_analysis(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<FeedbackWithAnalysis>> {
        self.check_ready()?;
        let tables = self.tables.read();

        let mut items: Vec<&FeedbackItem> = tables.feedback.values().collect();
        // newest first; id keeps equal timestamps stable
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));

        Ok(items
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|item| FeedbackWithAnalysis {
                feedback: item.clone(),
                sentiment: tables.analyses.get(&item.id).cloned(),
            })
            .collect())
    }

    async fn sentiment_stats(&self) -> Result<SentimentStats> {
        self.check_ready()?;
        Ok(self
            .tables
            .read()
            .analyses
            .values()
            .map(|record| record.result.sentiment)
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
