//! Batch orchestration tests
//!
//! Admission cap, order preservation, outbound call accounting and
//! chunk-level failure isolation, all against mock remotes.


use feedlens_classifiers::{BatchConfig, BatchOrchestrator, SentimentAnalyzer};
use feedlens_core::{FeedbackItem, FeedbackSource, Sentiment, Theme};
use mock_remotes::{MockChat, MockClassifier};
use std::sync::Arc;

struct Harness {
    classifier: Arc<MockClassifier>,
    chat: Arc<MockChat>,
    orchestrator: BatchOrchestrator,
}

impl Harness {
    fn new(config: BatchConfig) -> Self {
        let classifier = Arc::new(MockClassifier::new("mock-sst2"));
        let chat = Arc::new(
            MockChat::new("mock-llm").with_rule("praise-me", "emotion: happy\ntheme: Product Praise"),
        );
        let analyzer = SentimentAnalyzer::new(classifier.clone(), chat.clone()).unwrap();
        let orchestrator = BatchOrchestrator::new(Arc::new(analyzer), config).unwrap();
        Self {
            classifier,
            chat,
            orchestrator,
        }
    }

    fn outbound_calls(&self) -> u32 {
        self.classifier.call_count() + self.chat.call_count()
    }
}

/// Even items are praise, odd items are plain
fn items(n: usize) -> Vec<FeedbackItem> {
    (0..n)
        .map(|i| {
            let content = if i % 2 == 0 {
                format!("Release notes {i} praise-me")
            } else {
                format!("Release notes {i}")
            };
            FeedbackItem::new(format!("fb-{i}"), FeedbackSource::Chat, content)
        })
        .collect()
}

fn with_markers(mut items: Vec<FeedbackItem>, range: std::ops::Range<usize>, marker: &str) -> Vec<FeedbackItem> {
    for item in &mut items[range] {
        item.content.push(' ');
        item.content.push_str(marker);
    }
    items
}

#[tokio::test]
async fn test_admission_cap_and_order() {
    let harness = Harness::new(BatchConfig::default());
    let outcome = harness.orchestrator.execute(&items(75)).await;

    assert_eq!(harness.orchestrator.max_items(), 25);
    assert_eq!(outcome.results.len(), 25);
    assert_eq!(outcome.admitted, 25);
    assert_eq!(outcome.dropped, 50);
    assert_eq!(outcome.fallbacks, 0);

    for (i, result) in outcome.results.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Theme::ProductPraise
        } else {
            Theme::Other
        };
        assert_eq!(result.theme, expected, "result {i} out of order");
        assert_eq!(result.sentiment, Sentiment::Positive);
    }
}

#[tokio::test]
async fn test_outbound_calls_never_exceed_ceiling() {
    let harness = Harness::new(BatchConfig::default());
    let outcome = harness.orchestrator.execute(&items(75)).await;

    assert_eq!(harness.outbound_calls(), 50);
    assert_eq!(outcome.outbound_calls, 50);
}

#[tokio::test]
async fn test_odd_ceiling_rounds_down() {
    let harness = Harness::new(BatchConfig {
        call_ceiling: 7,
        ..Default::default()
    });
    let outcome = harness.orchestrator.execute(&items(10)).await;

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(harness.outbound_calls(), 6);
}

#[tokio::test]
async fn test_ceiling_below_item_cost_admits_nothing() {
    let harness = Harness::new(BatchConfig {
        call_ceiling: 1,
        ..Default::default()
    });
    let outcome = harness.orchestrator.execute(&items(4)).await;

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.dropped, 4);
    assert_eq!(harness.outbound_calls(), 0);
}

#[tokio::test]
async fn test_small_batch_is_fully_admitted() {
    let harness = Harness::new(BatchConfig::default());
    let outcome = harness.orchestrator.execute(&items(3)).await;

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.dropped, 0);
    assert_eq!(outcome.outbound_calls, 6);
}

#[tokio::test]
async fn test_empty_batch() {
    let harness = Harness::new(BatchConfig::default());
    let outcome = harness.orchestrator.execute(&[]).await;

    assert!(outcome.results.is_empty());
    assert_eq!(harness.outbound_calls(), 0);
}

#[tokio::test]
async fn test_failing_chunk_is_isolated() {
    let harness = Harness::new(BatchConfig::default());
    let batch = with_markers(items(25), 10..20, "FAIL");
    let outcome = harness.orchestrator.execute(&batch).await;

    assert_eq!(outcome.results.len(), 25);
    assert_eq!(outcome.fallbacks, 10);

    for (i, result) in outcome.results.iter().enumerate() {
        if (10..20).contains(&i) {
            assert_eq!(result.sentiment, Sentiment::Neutral);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.theme, Theme::Other);
            assert!(result.reasoning.starts_with("Error during analysis: "));
        } else {
            assert_eq!(result.sentiment, Sentiment::Positive, "result {i}");
            assert!(result.confidence > 0.0);
        }
    }
}

#[tokio::test]
async fn test_single_item_failure_stays_local() {
    let harness = Harness::new(BatchConfig::default());
    let batch = with_markers(items(10), 4..5, "FAIL");
    let outcome = harness.orchestrator.execute(&batch).await;

    assert_eq!(outcome.fallbacks, 1);
    assert_eq!(outcome.failed_chunks, 0);
    assert_eq!(outcome.results[4].sentiment, Sentiment::Neutral);
    assert_eq!(outcome.results[3].sentiment, Sentiment::Positive);
    assert_eq!(outcome.results[5].sentiment, Sentiment::Positive);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_chunk_falls_back_as_a_unit() {
    let harness = Harness::new(BatchConfig {
        chunk_timeout_secs: Some(1),
        ..Default::default()
    });
    let batch = with_markers(items(25), 12..13, "SLOW");
    let outcome = harness.orchestrator.execute(&batch).await;

    assert_eq!(outcome.results.len(), 25);
    assert_eq!(outcome.failed_chunks, 1);
    assert_eq!(outcome.fallbacks, 10);

    // items 10 and 11 finished before the slow one but share its chunk
    for result in &outcome.results[10..20] {
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(result.reasoning.contains("timed out"));
    }
    assert_eq!(outcome.results[9].sentiment, Sentiment::Positive);
    assert_eq!(outcome.results[20].sentiment, Sentiment::Positive);
}

#[tokio::test]
async fn test_negative_items_are_analyzed_in_place() {
    let harness = Harness::new(BatchConfig::default());
    let batch = with_markers(items(6), 1..2, "NEG");
    let outcome = harness.orchestrator.execute(&batch).await;

    assert_eq!(outcome.results[1].sentiment, Sentiment::Negative);
    assert_eq!(outcome.results[1].score, -0.96);
    assert_eq!(outcome.results[0].sentiment, Sentiment::Positive);
}

#[test]
fn test_zero_chunk_size_is_rejected() {
    let classifier = Arc::new(MockClassifier::new("mock"));
    let chat = Arc::new(MockChat::new("mock"));
    let analyzer = SentimentAnalyzer::new(classifier, chat).unwrap();

    let result = BatchOrchestrator::new(
        Arc::new(analyzer),
        BatchConfig {
            chunk_size: 0,
            ..Default::default()
        },
    );
    assert!(result.is_err());
}
