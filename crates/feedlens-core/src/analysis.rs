//! Normalized sentiment analysis result

use crate::catalog::{Emotion, Theme};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency emitted for every result; the 1..=10 range carries no signal yet
pub const DEFAULT_URGENCY: u8 = 1;

/// Final polarity of a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized, self-consistent analysis of a feedback item.
///
/// `sentiment == Neutral` always implies `score == 0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysisResult {
    /// Final polarity
    pub sentiment: Sentiment,

    /// Signed strength in [-1, 1]
    pub score: f64,

    /// Raw winning-label confidence in [0, 1]
    pub confidence: f64,

    /// Primary emotion
    pub emotion: Emotion,

    /// Urgency in 1..=10
    pub urgency: u8,

    /// Topical theme
    pub theme: Theme,

    /// Explanation synthesized from the fields above
    pub reasoning: String,
}

impl SentimentAnalysisResult {
    /// Build a result with reasoning generated from the other fields.
    ///
    /// Neutral results have their score pinned to zero.
    pub fn new(
        sentiment: Sentiment,
        score: f64,
        confidence: f64,
        emotion: Emotion,
        theme: Theme,
    ) -> Self {
        let score = if sentiment == Sentiment::Neutral {
            0.0
        } else {
            score.clamp(-1.0, 1.0)
        };
        let confidence = confidence.clamp(0.0, 1.0);

        Self {
            sentiment,
            score,
            confidence,
            emotion,
            urgency: DEFAULT_URGENCY,
            theme,
            reasoning: reasoning_for(sentiment, score, emotion, confidence),
        }
    }

    /// Defensive default substituted when analysis of an item fails
    pub fn fallback(message: impl fmt::Display) -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            score: 0.0,
            confidence: 0.0,
            emotion: Emotion::Neutral,
            urgency: DEFAULT_URGENCY,
            theme: Theme::Other,
            reasoning: format!("Error during analysis: {message}"),
        }
    }

    /// Whether the sentiment/score invariant holds
    pub fn is_consistent(&self) -> bool {
        let score_ok = (-1.0..=1.0).contains(&self.score);
        let neutral_ok = self.sentiment != Sentiment::Neutral || self.score == 0.0;
        let sign_ok = match self.sentiment {
            Sentiment::Positive => self.score >= 0.0,
            Sentiment::Negative => self.score <= 0.0,
            Sentiment::Neutral => true,
        };
        score_ok && neutral_ok && sign_ok && (1..=10).contains(&self.urgency)
    }
}

/// Ties round away from zero before formatting, so 0.625 prints as 0.63 / 63%
fn reasoning_for(sentiment: Sentiment, score: f64, emotion: Emotion, confidence: f64) -> String {
    let score = (score * 100.0).round() / 100.0;
    let percent = (confidence * 100.0).round();
    format!(
        "Sentiment analysis detected {sentiment} sentiment (score: {score:.2}) with {emotion} emotion. Confidence: {percent:.0}%."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reasoning_format() {
        let result = SentimentAnalysisResult::new(
            Sentiment::Negative,
            -0.9,
            0.987,
            Emotion::Frustrated,
            Theme::ApiPerformanceIssues,
        );
        assert_eq!(
            result.reasoning,
            "Sentiment analysis detected negative sentiment (score: -0.90) with frustrated emotion. Confidence: 99%."
        );
        assert_eq!(result.urgency, 1);
    }

    #[test]
    fn test_reasoning_rounds_ties_away_from_zero() {
        let result =
            SentimentAnalysisResult::new(Sentiment::Positive, 0.625, 0.625, Emotion::Happy, Theme::Other);
        assert_eq!(
            result.reasoning,
            "Sentiment analysis detected positive sentiment (score: 0.63) with happy emotion. Confidence: 63%."
        );

        let result =
            SentimentAnalysisResult::new(Sentiment::Negative, -0.125, 0.125, Emotion::Angry, Theme::Other);
        assert!(result.reasoning.contains("(score: -0.13)"));
        assert!(result.reasoning.ends_with("Confidence: 13%."));
    }

    #[test]
    fn test_neutral_pins_score() {
        let result =
            SentimentAnalysisResult::new(Sentiment::Neutral, 0.35, 0.6, Emotion::Neutral, Theme::Other);
        assert_eq!(result.score, 0.0);
        assert!(result.reasoning.contains("(score: 0.00)"));
    }

    #[test]
    fn test_fallback() {
        let result = SentimentAnalysisResult::fallback("remote call error (500): boom");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.emotion, Emotion::Neutral);
        assert_eq!(result.theme, Theme::Other);
        assert_eq!(
            result.reasoning,
            "Error during analysis: remote call error (500): boom"
        );
        assert!(result.is_consistent());
    }

    #[test]
    fn test_serialized_shape() {
        let result =
            SentimentAnalysisResult::new(Sentiment::Positive, 0.91, 0.91, Emotion::Happy, Theme::ProductPraise);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["emotion"], "happy");
        assert_eq!(json["theme"], "Product Praise");
        assert_eq!(json["urgency"], 1);
    }

    fn sentiment_strategy() -> impl Strategy<Value = Sentiment> {
        prop_oneof![
            Just(Sentiment::Positive),
            Just(Sentiment::Negative),
            Just(Sentiment::Neutral),
        ]
    }

    proptest! {
        #[test]
        fn prop_neutral_always_zero(score in -2.0f64..2.0, confidence in 0.0f64..1.0) {
            let result = SentimentAnalysisResult::new(
                Sentiment::Neutral, score, confidence, Emotion::Neutral, Theme::Other,
            );
            prop_assert_eq!(result.score, 0.0);
        }

        #[test]
        fn prop_score_clamped(sentiment in sentiment_strategy(), score in -5.0f64..5.0) {
            let result = SentimentAnalysisResult::new(
                sentiment, score, 0.5, Emotion::Neutral, Theme::Other,
            );
            prop_assert!((-1.0..=1.0).contains(&result.score));
        }
    }
}
