//! Batch orchestration under an outbound call ceiling
//!
//! The hosted endpoints cap outbound calls per incoming request. The
//! orchestrator admits `floor(ceiling / cost)` items, silently drops the
//! rest, and analyzes the admitted prefix one item at a time in fixed-size
//! chunks. A failed item or a failed chunk is replaced by the defensive
//! default result; nothing is surfaced to the caller as a batch error.

use crate::classifier::FeedbackAnalyzer;
use crate::config::BatchConfig;
use feedlens_core::{Error, FeedbackItem, Result, SentimentAnalysisResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Number of items admitted for a given call ceiling and per-item cost
pub fn admission_limit(call_ceiling: usize, calls_per_item: usize) -> usize {
    call_ceiling / calls_per_item.max(1)
}

/// Outbound call allowance for one orchestrator invocation
#[derive(Debug)]
pub struct CallBudget {
    ceiling: usize,
    spent: usize,
}

impl CallBudget {
    pub fn new(ceiling: usize) -> Self {
        Self { ceiling, spent: 0 }
    }

    /// Reserve `calls` up front; fails without reserving anything if they don't fit
    pub fn reserve(&mut self, calls: usize) -> Result<()> {
        if calls > self.remaining() {
            return Err(Error::internal(format!(
                "outbound call budget exhausted: need {calls}, {} of {} left",
                self.remaining(),
                self.ceiling
            )));
        }
        self.spent += calls;
        Ok(())
    }

    pub fn spent(&self) -> usize {
        self.spent
    }

    pub fn remaining(&self) -> usize {
        self.ceiling - self.spent
    }
}

/// Result of one batch run
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One result per admitted item, in input order
    pub results: Vec<SentimentAnalysisResult>,

    /// Items that were admitted
    pub admitted: usize,

    /// Items dropped by the admission cap
    pub dropped: usize,

    /// Chunks that failed as a unit
    pub failed_chunks: usize,

    /// Results that are defensive defaults
    pub fallbacks: usize,

    /// Outbound calls reserved for this run
    pub outbound_calls: usize,

    /// Wall-clock time for the whole run
    pub latency_us: u64,
}

/// Runs an analyzer over a batch within the configured call ceiling
pub struct BatchOrchestrator {
    analyzer: Arc<dyn FeedbackAnalyzer>,
    config: BatchConfig,
}

impl BatchOrchestrator {
    pub fn new(analyzer: Arc<dyn FeedbackAnalyzer>, config: BatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { analyzer, config })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Maximum items one invocation will analyze
    pub fn max_items(&self) -> usize {
        admission_limit(
            self.config.call_ceiling,
            self.analyzer.outbound_calls_per_item(),
        )
    }

    /// Analyze the admitted prefix of `items`
    pub async fn execute(&self, items: &[FeedbackItem]) -> BatchOutcome {
        let start = Instant::now();
        let cost = self.analyzer.outbound_calls_per_item();
        let admitted = items.len().min(self.max_items());
        let dropped = items.len() - admitted;

        if dropped > 0 {
            warn!(
                received = items.len(),
                admitted,
                dropped,
                call_ceiling = self.config.call_ceiling,
                "batch exceeds outbound call ceiling, dropping excess items"
            );
            metrics::counter!("feedlens_items_dropped_total").increment(dropped as u64);
        }

        let mut budget = CallBudget::new(self.config.call_ceiling);
        let mut results = Vec::with_capacity(admitted);
        let mut failed_chunks = 0;
        let mut fallbacks = 0;

        let chunks = items[..admitted].chunks(self.config.chunk_size);
        let total_chunks = chunks.len();

        for (index, chunk) in chunks.enumerate() {
            let chunk_start = Instant::now();

            match self.run_chunk(chunk, cost, &mut budget).await {
                Ok(chunk_results) => {
                    for outcome in chunk_results {
                        results.push(outcome.unwrap_or_else(|e| {
                            fallbacks += 1;
                            SentimentAnalysisResult::fallback(e)
                        }));
                    }
                }
                Err(e) => {
                    error!(
                        chunk = index + 1,
                        total_chunks,
                        items = chunk.len(),
                        error = %e,
                        "chunk failed, substituting default results"
                    );
                    failed_chunks += 1;
                    fallbacks += chunk.len();
                    results.extend(
                        std::iter::repeat_with(|| SentimentAnalysisResult::fallback(&e))
                            .take(chunk.len()),
                    );
                }
            }

            debug!(
                chunk = index + 1,
                total_chunks,
                latency_us = chunk_start.elapsed().as_micros() as u64,
                "chunk processed"
            );
        }

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::counter!("feedlens_items_analyzed_total").increment(admitted as u64);
        metrics::counter!("feedlens_analysis_fallbacks_total").increment(fallbacks as u64);
        metrics::histogram!("feedlens_batch_latency_us").record(latency_us as f64);

        info!(
            admitted,
            dropped,
            failed_chunks,
            fallbacks,
            outbound_calls = budget.spent(),
            latency_us,
            "batch analysis complete"
        );

        BatchOutcome {
            results,
            admitted,
            dropped,
            failed_chunks,
            fallbacks,
            outbound_calls: budget.spent(),
            latency_us,
        }
    }

    /// Analyze one chunk item by item.
    ///
    /// Per-item errors come back in place. The chunk as a whole fails when
    /// its calls cannot be reserved or when it outlives the chunk timeout.
    async fn run_chunk(
        &self,
        chunk: &[FeedbackItem],
        cost: usize,
        budget: &mut CallBudget,
    ) -> Result<Vec<Result<SentimentAnalysisResult>>> {
        budget.reserve(cost * chunk.len())?;

        let analyze_all = async {
            let mut outcomes = Vec::with_capacity(chunk.len());
            for item in chunk {
                let outcome = self.analyzer.analyze(item).await;
                if let Err(e) = &outcome {
                    warn!(item_id = %item.id, error = %e, "item analysis failed");
                }
                outcomes.push(outcome);
            }
            outcomes
        };

        let outcomes = match self.config.chunk_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), analyze_all)
                .await
                .map_err(|_| Error::remote(format!("chunk timed out after {secs}s")))?,
            None => analyze_all.await,
        };

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_limit() {
        assert_eq!(admission_limit(50, 2), 25);
        assert_eq!(admission_limit(51, 2), 25);
        assert_eq!(admission_limit(1, 2), 0);
        assert_eq!(admission_limit(50, 0), 50);
    }

    #[test]
    fn test_call_budget() {
        let mut budget = CallBudget::new(5);
        budget.reserve(2).unwrap();
        budget.reserve(2).unwrap();
        assert!(matches!(budget.reserve(2), Err(Error::Internal(_))));
        // a failed reservation leaves the budget untouched
        assert_eq!(budget.spent(), 4);
        assert_eq!(budget.remaining(), 1);
        budget.reserve(1).unwrap();
        assert_eq!(budget.remaining(), 0);
    }
}
