//! End-to-end analyzer tests against mock remotes


use feedlens_classifiers::{FeedbackAnalyzer, SentimentAnalyzer, ThemeClassifier};
use feedlens_core::{Emotion, FeedbackItem, FeedbackSource, Sentiment, Theme};
use mock_remotes::{FailingChat, MockChat, MockClassifier};
use std::sync::Arc;

fn item(content: &str) -> FeedbackItem {
    FeedbackItem::new("fb-1", FeedbackSource::IssueTracker, content)
}

async fn analyze(
    classifier: MockClassifier,
    chat_reply: &str,
    content: &str,
) -> feedlens_core::SentimentAnalysisResult {
    let chat = MockChat::new("mock-llm").with_default_reply(chat_reply);
    let analyzer = SentimentAnalyzer::new(Arc::new(classifier), Arc::new(chat)).unwrap();
    analyzer.analyze(&item(content)).await.unwrap()
}

#[tokio::test]
async fn test_resolved_issue_is_positive() {
    let result = analyze(
        MockClassifier::new("sst2").with_scores(0.3, 0.6),
        "emotion: happy\ntheme: Customer Support Praise",
        "Issue resolved, thanks!",
    )
    .await;

    assert_eq!(result.sentiment, Sentiment::Positive);
    assert!(result.score > 0.0);
    assert_eq!(result.emotion, Emotion::Happy);
    assert_eq!(result.theme, Theme::CustomerSupportPraise);
}

#[tokio::test]
async fn test_error_report_is_negative() {
    let result = analyze(
        MockClassifier::new("sst2").with_scores(0.55, 0.45),
        "emotion: neutral\ntheme: API Performance Issues",
        "API returns 504 timeout, blocking deployment",
    )
    .await;

    assert_eq!(result.sentiment, Sentiment::Negative);
    assert_eq!(result.score, -0.9);
    assert_eq!(result.theme, Theme::ApiPerformanceIssues);
}

#[tokio::test]
async fn test_feature_ask_is_neutral() {
    let result = analyze(
        MockClassifier::new("sst2").with_scores(0.98, 0.02),
        "emotion: neutral\ntheme: Dark Mode Requests",
        "Would love dark mode support, can you add it?",
    )
    .await;

    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.theme, Theme::DarkModeRequests);
    assert_eq!(result.urgency, 1);
}

#[tokio::test]
async fn test_uncertain_raw_scores_are_neutral() {
    let result = analyze(
        MockClassifier::new("sst2").with_scores(0.55, 0.5),
        "emotion: neutral\ntheme: Other",
        "The changelog moved to a new page",
    )
    .await;

    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.confidence, 0.55);
}

#[tokio::test]
async fn test_garbled_chat_reply_degrades() {
    let result = analyze(
        MockClassifier::new("sst2").with_scores(0.1, 0.9),
        "I think the user is upset about pricing.",
        "The pricing page is confusing",
    )
    .await;

    assert_eq!(result.emotion, Emotion::Neutral);
    assert_eq!(result.theme, Theme::Other);
    assert_eq!(result.sentiment, Sentiment::Negative);
}

#[tokio::test]
async fn test_failing_chat_still_classifies() {
    let chat = Arc::new(FailingChat::new());
    let analyzer =
        SentimentAnalyzer::new(Arc::new(MockClassifier::new("sst2")), chat.clone()).unwrap();
    let result = analyzer.analyze(&item("Smooth onboarding")).await.unwrap();

    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.theme, Theme::Other);
    assert_eq!(chat.call_count(), 1);
}

#[tokio::test]
async fn test_theme_classifier() {
    let chat = MockChat::new("mock-llm")
        .with_rule("my invoice", "Billing UI Confusion")
        .with_default_reply("I would say this is about the docs");
    let themes = ThemeClassifier::new(Arc::new(chat));

    assert_eq!(
        themes.classify_theme(&item("Where is my invoice?")).await,
        Theme::BillingUiConfusion
    );
    assert_eq!(
        themes.classify_theme(&item("How do I configure routes?")).await,
        Theme::DocumentationGaps
    );

    let failing = ThemeClassifier::new(Arc::new(FailingChat::new()));
    assert_eq!(failing.classify_theme(&item("anything")).await, Theme::Other);
}
