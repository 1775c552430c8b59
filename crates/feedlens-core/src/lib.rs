//! Feedlens Core
//!
//! Core types and utilities shared across feedlens components.
//!
//! This crate provides:
//! - Feedback items as they arrive from ingestion sources
//! - The closed emotion and theme catalogs
//! - The normalized sentiment analysis result and its defensive default
//! - Error types and result handling

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod feedback;

pub use analysis::{Sentiment, SentimentAnalysisResult, DEFAULT_URGENCY};
pub use catalog::{Emotion, Theme};
pub use error::{Error, Result};
pub use feedback::{FeedbackItem, FeedbackSource};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{Sentiment, SentimentAnalysisResult};
    pub use crate::catalog::{Emotion, Theme};
    pub use crate::error::{Error, Result};
    pub use crate::feedback::{FeedbackItem, FeedbackSource};
}
