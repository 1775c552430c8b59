//! Feedlens Classifiers
//!
//! Turns raw feedback text into a normalized sentiment analysis result.
//!
//! The pipeline per item:
//! - Remote calls: a binary sentiment classifier and a chat model asked for emotion and theme
//! - Keyword policy: local substring signals (errors, urgency, requests, praise)
//! - Normalizer: an ordered chain of overrides folding everything into one result
//!
//! Batches run through the [`BatchOrchestrator`], which keeps each request
//! under the hosted endpoints' outbound call ceiling.

pub mod analyzer;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod extract;
pub mod keywords;
pub mod normalizer;
pub mod prompts;
pub mod remote;
pub mod theme;

pub use analyzer::{SentimentAnalyzer, CALLS_PER_ITEM};
pub use batch::{admission_limit, BatchOrchestrator, BatchOutcome, CallBudget};
pub use classifier::{BinaryClassifier, ChatModel, FeedbackAnalyzer, RawClassification, RawLabel};
pub use config::{BatchConfig, RemoteConfig};
pub use extract::{theme_from_reply, EmotionTheme, ReplyParser};
pub use keywords::{KeywordPolicy, KeywordSignals};
pub use normalizer::{BasePolarity, Decision, DecisionRule, SentimentNormalizer};
pub use remote::WorkersAiClient;
pub use theme::ThemeClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::SentimentAnalyzer;
    pub use crate::batch::{BatchOrchestrator, BatchOutcome};
    pub use crate::classifier::{BinaryClassifier, ChatModel, FeedbackAnalyzer, RawClassification};
    pub use crate::config::{BatchConfig, RemoteConfig};
    pub use crate::normalizer::SentimentNormalizer;
    pub use crate::remote::WorkersAiClient;
    pub use crate::theme::ThemeClassifier;
}
