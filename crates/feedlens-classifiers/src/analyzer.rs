//! Per-item sentiment analyzer
//!
//! Spends exactly two outbound calls per item: one binary classification
//! and one combined emotion/theme chat completion. Both are issued
//! concurrently and their outputs handed to the [`SentimentNormalizer`].

use crate::classifier::{BinaryClassifier, ChatModel, FeedbackAnalyzer};
use crate::extract::{EmotionTheme, ReplyParser};
use crate::normalizer::SentimentNormalizer;
use crate::prompts::{emotion_theme_prompt, EMOTION_THEME_SYSTEM_PROMPT};
use async_trait::async_trait;
use feedlens_core::{Error, FeedbackItem, Result, SentimentAnalysisResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outbound calls one [`SentimentAnalyzer::analyze`] spends
pub const CALLS_PER_ITEM: usize = 2;

/// Analyzer backed by a binary classifier and a chat model
pub struct SentimentAnalyzer {
    classifier: Arc<dyn BinaryClassifier>,
    chat: Arc<dyn ChatModel>,
    parser: ReplyParser,
    normalizer: SentimentNormalizer,
}

impl SentimentAnalyzer {
    pub fn new(classifier: Arc<dyn BinaryClassifier>, chat: Arc<dyn ChatModel>) -> Result<Self> {
        Self::with_normalizer(classifier, chat, SentimentNormalizer::new()?)
    }

    pub fn with_normalizer(
        classifier: Arc<dyn BinaryClassifier>,
        chat: Arc<dyn ChatModel>,
        normalizer: SentimentNormalizer,
    ) -> Result<Self> {
        Ok(Self {
            classifier,
            chat,
            parser: ReplyParser::new()?,
            normalizer,
        })
    }

    /// Ask the chat model for emotion and theme; failures degrade to neutral/Other
    async fn emotion_and_theme(&self, content: &str) -> EmotionTheme {
        let prompt = emotion_theme_prompt(content);
        match self
            .chat
            .chat_complete(EMOTION_THEME_SYSTEM_PROMPT, &prompt)
            .await
        {
            Ok(reply) => self.parser.parse(&reply),
            Err(e) => {
                warn!(model = self.chat.name(), error = %e, "emotion/theme call failed, using neutral");
                EmotionTheme::default()
            }
        }
    }

    /// Analyze, substituting the defensive default on any error
    pub async fn analyze_or_fallback(&self, item: &FeedbackItem) -> SentimentAnalysisResult {
        match self.analyze(item).await {
            Ok(result) => result,
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "analysis failed, using default result");
                SentimentAnalysisResult::fallback(e)
            }
        }
    }
}

#[async_trait]
impl FeedbackAnalyzer for SentimentAnalyzer {
    async fn analyze(&self, item: &FeedbackItem) -> Result<SentimentAnalysisResult> {
        if item.content.trim().is_empty() {
            return Err(Error::validation("feedback content is empty"));
        }

        // Both calls always go out, so an item costs CALLS_PER_ITEM even when classification fails
        let (raw, emotion_theme) = tokio::join!(
            self.classifier.classify_binary_sentiment(&item.content),
            self.emotion_and_theme(&item.content),
        );
        let raw = raw?;

        let result = self.normalizer.normalize(&item.content, &raw, &emotion_theme);
        debug!(
            item_id = %item.id,
            sentiment = %result.sentiment,
            emotion = %result.emotion,
            theme = %result.theme,
            "analyzed feedback item"
        );
        Ok(result)
    }

    fn outbound_calls_per_item(&self) -> usize {
        CALLS_PER_ITEM
    }

    fn name(&self) -> &str {
        "sentiment-analyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RawClassification;
    use feedlens_core::{Emotion, FeedbackSource, Sentiment, Theme};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedClassifier {
        raw: Option<RawClassification>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl BinaryClassifier for FixedClassifier {
        async fn classify_binary_sentiment(&self, _text: &str) -> Result<RawClassification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.raw
                .clone()
                .ok_or_else(|| Error::remote_status(500, "Internal Server Error - boom"))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FixedChat {
        reply: Option<String>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ChatModel for FixedChat {
        async fn chat_complete(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or_else(|| Error::remote("chat down"))
        }

        fn name(&self) -> &str {
            "fixed-chat"
        }
    }

    fn analyzer(
        raw: Option<RawClassification>,
        reply: Option<&str>,
    ) -> (SentimentAnalyzer, Arc<FixedClassifier>, Arc<FixedChat>) {
        let classifier = Arc::new(FixedClassifier {
            raw,
            calls: AtomicU32::new(0),
        });
        let chat = Arc::new(FixedChat {
            reply: reply.map(String::from),
            calls: AtomicU32::new(0),
        });
        let analyzer = SentimentAnalyzer::new(classifier.clone(), chat.clone()).unwrap();
        (analyzer, classifier, chat)
    }

    fn item(content: &str) -> FeedbackItem {
        FeedbackItem::new("fb-1", FeedbackSource::Email, content)
    }

    #[tokio::test]
    async fn test_two_calls_per_item() {
        let (analyzer, classifier, chat) = analyzer(
            Some(RawClassification::from_scores(0.05, 0.95)),
            Some("emotion: frustrated\ntheme: API Performance Issues"),
        );
        let result = analyzer
            .analyze(&item("API returns 504 timeout, blocking deployment"))
            .await
            .unwrap();

        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.emotion, Emotion::Frustrated);
        assert_eq!(result.theme, Theme::ApiPerformanceIssues);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.outbound_calls_per_item(), 2);
    }

    #[tokio::test]
    async fn test_chat_failure_degrades() {
        let (analyzer, _, _) = analyzer(Some(RawClassification::from_scores(0.93, 0.07)), None);
        let result = analyzer.analyze(&item("The onboarding was smooth")).await.unwrap();

        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.emotion, Emotion::Neutral);
        assert_eq!(result.theme, Theme::Other);
    }

    #[tokio::test]
    async fn test_classifier_failure_is_error() {
        let (analyzer, classifier, chat) =
            analyzer(None, Some("emotion: happy\ntheme: Product Praise"));
        let err = analyzer.analyze(&item("Love it")).await.unwrap_err();
        assert!(err.is_remote());
        // the chat call still goes out
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);

        let result = analyzer.analyze_or_fallback(&item("Love it")).await;
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.theme, Theme::Other);
        assert!(result.reasoning.starts_with("Error during analysis: "));
    }

    #[tokio::test]
    async fn test_empty_content_makes_no_calls() {
        let (analyzer, classifier, chat) = analyzer(
            Some(RawClassification::from_scores(0.9, 0.1)),
            Some("emotion: happy"),
        );
        let err = analyzer.analyze(&item("   ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }
}
