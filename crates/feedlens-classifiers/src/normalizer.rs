//! Sentiment normalization
//!
//! Folds the raw binary classifier output, keyword signals and the chat
//! model's emotion/theme into one [`SentimentAnalysisResult`]:
//!
//! 1. Base polarity from the raw scores, forced neutral when uncertain
//! 2. Neutral-request detection from keywords
//! 3. Emotion and theme (already parsed, see [`EmotionTheme`])
//! 4. Final decision: an ordered chain of overrides, first match wins
//!
//! The whole thing is a pure function of its inputs.

use crate::classifier::{RawClassification, RawLabel};
use crate::extract::EmotionTheme;
use crate::keywords::{KeywordPolicy, KeywordSignals};
use feedlens_core::{Emotion, Result, Sentiment, SentimentAnalysisResult};

/// Minimum gap between the two raw scores for a confident call
pub const MIN_SCORE_DIFFERENCE: f64 = 0.3;

/// Minimum winning score for a confident call
pub const MIN_WINNING_SCORE: f64 = 0.7;

/// Clearly-positive cutoffs that skip neutral-request detection
pub const CLEAR_POSITIVE_CONFIDENCE: f64 = 0.8;
pub const CLEAR_POSITIVE_SCORE: f64 = 0.7;

/// Scores inside (-0.4, 0.4) fall back to neutral
pub const POLARITY_THRESHOLD: f64 = 0.4;

/// Score assigned to error reports the classifier did not see as negative
pub const ERROR_OVERRIDE_SCORE: f64 = -0.9;

/// Score for a positive emotion with no usable raw magnitude
pub const POSITIVE_EMOTION_FALLBACK_SCORE: f64 = 0.7;

/// Score for a positive emotion in positive context with no raw magnitude
pub const POSITIVE_CONTEXT_FALLBACK_SCORE: f64 = 0.8;

/// Polarity derived solely from the raw classifier output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePolarity {
    pub sentiment: Sentiment,
    /// Signed: negative for NEGATIVE
    pub score: f64,
    /// Winning raw score, captured before the uncertainty override
    pub confidence: f64,
}

impl BasePolarity {
    /// Derive base polarity, forcing neutral when the call is uncertain
    pub fn from_raw(raw: &RawClassification) -> Self {
        let score_difference = (raw.positive_score - raw.negative_score).abs();
        let max_score = raw.positive_score.max(raw.negative_score);
        let uncertain = score_difference < MIN_SCORE_DIFFERENCE || max_score < MIN_WINNING_SCORE;
        let confidence = raw.score.abs();

        if uncertain {
            return Self {
                sentiment: Sentiment::Neutral,
                score: 0.0,
                confidence,
            };
        }

        let (sentiment, score) = match raw.label {
            RawLabel::Positive => (Sentiment::Positive, raw.score),
            RawLabel::Negative => (Sentiment::Negative, -raw.score),
            RawLabel::Neutral => (Sentiment::Neutral, 0.0),
        };

        Self {
            sentiment,
            score,
            confidence,
        }
    }
}

/// Whether the feedback reads as a plain feature/improvement ask
pub fn is_neutral_request(base: &BasePolarity, signals: &KeywordSignals) -> bool {
    if signals.error || signals.urgent {
        return false;
    }

    if base.sentiment == Sentiment::Positive
        && base.confidence > CLEAR_POSITIVE_CONFIDENCE
        && base.score > CLEAR_POSITIVE_SCORE
        && !signals.request
    {
        return false;
    }

    signals.request && !signals.strong_emotion
}

/// Which override produced the final sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRule {
    PositiveEmotion,
    ErrorKeywords,
    NeutralRequest,
    UncertainBase,
    EmotionCrossCheck,
    ScoreThreshold,
}

/// Final sentiment, score and emotion before result assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub sentiment: Sentiment,
    pub score: f64,
    pub emotion: Emotion,
    pub rule: DecisionRule,
}

/// Ordered override chain; first matching rule wins.
pub fn decide(
    base: &BasePolarity,
    signals: &KeywordSignals,
    neutral_request: bool,
    emotion: Emotion,
) -> Decision {
    let score = base.score.clamp(-1.0, 1.0);
    let decision = |sentiment, score, rule| Decision {
        sentiment,
        score,
        emotion,
        rule,
    };

    // Positive emotion beats every keyword rule ("Issue resolved, thanks!")
    if emotion.is_positive() {
        let score = if signals.positive_context || score > 0.0 {
            if score == 0.0 {
                POSITIVE_CONTEXT_FALLBACK_SCORE
            } else {
                score.abs()
            }
        } else if score < 0.0 {
            score.abs()
        } else {
            POSITIVE_EMOTION_FALLBACK_SCORE
        };
        return decision(Sentiment::Positive, score, DecisionRule::PositiveEmotion);
    }

    if signals.error_narrow && !signals.positive_context {
        let score = if score < 0.0 { score } else { ERROR_OVERRIDE_SCORE };
        return decision(Sentiment::Negative, score, DecisionRule::ErrorKeywords);
    }

    if neutral_request {
        let emotion = match emotion {
            Emotion::Frustrated | Emotion::Angry | Emotion::Excited | Emotion::Happy => emotion,
            _ => Emotion::Neutral,
        };
        return Decision {
            sentiment: Sentiment::Neutral,
            score: 0.0,
            emotion,
            rule: DecisionRule::NeutralRequest,
        };
    }

    if base.sentiment == Sentiment::Neutral {
        return decision(Sentiment::Neutral, 0.0, DecisionRule::UncertainBase);
    }

    if emotion.is_negative() && score > 0.0 {
        return decision(Sentiment::Negative, -score.abs(), DecisionRule::EmotionCrossCheck);
    }

    if score > POLARITY_THRESHOLD {
        decision(Sentiment::Positive, score, DecisionRule::ScoreThreshold)
    } else if score < -POLARITY_THRESHOLD {
        decision(Sentiment::Negative, score, DecisionRule::ScoreThreshold)
    } else {
        decision(Sentiment::Neutral, 0.0, DecisionRule::ScoreThreshold)
    }
}

/// Combines raw model output and keyword policy into a normalized result
pub struct SentimentNormalizer {
    policy: KeywordPolicy,
}

impl SentimentNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_policy(KeywordPolicy::new()?))
    }

    pub fn with_policy(policy: KeywordPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &KeywordPolicy {
        &self.policy
    }

    /// Normalize one item
    pub fn normalize(
        &self,
        content: &str,
        raw: &RawClassification,
        emotion_theme: &EmotionTheme,
    ) -> SentimentAnalysisResult {
        let base = BasePolarity::from_raw(raw);
        let signals = self.policy.signals(content);
        let neutral_request = is_neutral_request(&base, &signals);
        let decision = decide(&base, &signals, neutral_request, emotion_theme.emotion);

        tracing::debug!(
            rule = ?decision.rule,
            base_sentiment = %base.sentiment,
            base_score = base.score,
            final_sentiment = %decision.sentiment,
            final_score = decision.score,
            "normalized sentiment"
        );

        SentimentAnalysisResult::new(
            decision.sentiment,
            decision.score,
            base.confidence,
            decision.emotion,
            emotion_theme.theme,
        )
    }
}
