//! Remote model traits and raw classification types

use async_trait::async_trait;
use feedlens_core::{FeedbackItem, Result, SentimentAnalysisResult};

/// Hosted binary sentiment model (POSITIVE / NEGATIVE)
#[async_trait]
pub trait BinaryClassifier: Send + Sync {
    /// Classify the given text, returning both label scores
    async fn classify_binary_sentiment(&self, text: &str) -> Result<RawClassification>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Hosted chat/instruction model
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one system + user exchange and return the raw reply text
    async fn chat_complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Get the model name
    fn name(&self) -> &str;
}

/// Anything that turns one feedback item into one analysis result
#[async_trait]
pub trait FeedbackAnalyzer: Send + Sync {
    /// Analyze a single item
    async fn analyze(&self, item: &FeedbackItem) -> Result<SentimentAnalysisResult>;

    /// Outbound calls spent per analyzed item
    fn outbound_calls_per_item(&self) -> usize;

    /// Get the analyzer name
    fn name(&self) -> &str;
}

/// Label reported by the binary classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawLabel {
    Positive,
    Negative,
    /// Only produced by the decode fallback or unknown labels
    Neutral,
}

impl RawLabel {
    /// Map a model label; anything unrecognized is neutral
    pub fn from_model_label(label: &str) -> Self {
        match label {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// Raw output of the binary classifier for one text
#[derive(Debug, Clone, PartialEq)]
pub struct RawClassification {
    /// Winning label
    pub label: RawLabel,

    /// Confidence of the winning label (0.0-1.0)
    pub score: f64,

    /// Independent POSITIVE score
    pub positive_score: f64,

    /// Independent NEGATIVE score
    pub negative_score: f64,
}

impl RawClassification {
    /// Build from independent scores; the higher one wins, POSITIVE on ties
    pub fn from_scores(positive_score: f64, negative_score: f64) -> Self {
        let (label, score) = if negative_score > positive_score {
            (RawLabel::Negative, negative_score)
        } else {
            (RawLabel::Positive, positive_score)
        };
        Self {
            label,
            score,
            positive_score,
            negative_score,
        }
    }

    /// Fallback used when the model response has no recognizable shape
    pub fn undetermined() -> Self {
        Self {
            label: RawLabel::Neutral,
            score: 0.5,
            positive_score: 0.5,
            negative_score: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scores_picks_winner() {
        let raw = RawClassification::from_scores(0.12, 0.88);
        assert_eq!(raw.label, RawLabel::Negative);
        assert_eq!(raw.score, 0.88);

        let raw = RawClassification::from_scores(0.5, 0.5);
        assert_eq!(raw.label, RawLabel::Positive);
    }

    #[test]
    fn test_undetermined() {
        let raw = RawClassification::undetermined();
        assert_eq!(raw.label, RawLabel::Neutral);
        assert_eq!(raw.score, 0.5);
        assert_eq!(raw.positive_score, raw.negative_score);
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(RawLabel::from_model_label("POSITIVE"), RawLabel::Positive);
        assert_eq!(RawLabel::from_model_label("NEGATIVE"), RawLabel::Negative);
        assert_eq!(RawLabel::from_model_label("LABEL_2"), RawLabel::Neutral);
    }
}
