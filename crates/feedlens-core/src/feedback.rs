//! Feedback items as delivered by ingestion sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where a feedback item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackSource {
    /// Issue trackers (GitHub issues and the like)
    #[serde(alias = "github")]
    IssueTracker,
    /// Email inboxes
    #[serde(alias = "gmail")]
    Email,
    /// Chat platforms
    #[serde(alias = "discord", alias = "slack")]
    Chat,
    /// Social media
    #[serde(alias = "twitter")]
    Social,
    /// Anything else
    #[default]
    #[serde(other)]
    Other,
}

impl FeedbackSource {
    /// Wire name of this source
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssueTracker => "issue-tracker",
            Self::Email => "email",
            Self::Chat => "chat",
            Self::Social => "social",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of user feedback.
///
/// Created by ingestion and treated as read-only by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    /// Identifier, unique within a batch
    pub id: String,

    /// Originating channel
    #[serde(default)]
    pub source: FeedbackSource,

    /// Feedback text
    pub content: String,

    /// Author handle or name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// When the feedback was written
    pub timestamp: DateTime<Utc>,

    /// Free-form metadata, may carry a `theme` hint
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl FeedbackItem {
    /// Create a feedback item timestamped now
    pub fn new(id: impl Into<String>, source: FeedbackSource, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source,
            content: content.into(),
            author: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach a pre-assigned theme hint
    pub fn with_theme_hint(mut self, theme: impl Into<String>) -> Self {
        self.metadata
            .insert("theme".to_string(), serde_json::Value::String(theme.into()));
        self
    }

    /// Pre-assigned theme hint from metadata, if any
    pub fn theme_hint(&self) -> Option<&str> {
        self.metadata.get("theme").and_then(|v| v.as_str())
    }
}
