//! Parsing of free-text chat model replies into catalog members

use feedlens_core::{Emotion, Error, Result, Theme};
use regex::Regex;

/// Emotion and theme extracted from a combined reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmotionTheme {
    pub emotion: Emotion,
    pub theme: Theme,
}

impl EmotionTheme {
    pub fn new(emotion: Emotion, theme: Theme) -> Self {
        Self { emotion, theme }
    }
}

/// Extracts `emotion: <word>` and `theme: <category>` lines from chat replies
pub struct ReplyParser {
    emotion_line: Regex,
    theme_line: Regex,
}

impl ReplyParser {
    /// Compile the line patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            emotion_line: Regex::new(r"(?i)emotion:\s*([A-Za-z0-9_]+)")
                .map_err(|e| Error::internal(format!("Failed to compile emotion regex: {e}")))?,
            theme_line: Regex::new(r"(?i)theme:\s*([^\n]+)")
                .map_err(|e| Error::internal(format!("Failed to compile theme regex: {e}")))?,
        })
    }

    /// Parse a combined reply.
    ///
    /// Never fails: a missing or invalid emotion is neutral, a missing or
    /// non-catalog theme is Other.
    pub fn parse(&self, text: &str) -> EmotionTheme {
        let emotion = self
            .emotion_line
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| Emotion::coerce(m.as_str()))
            .unwrap_or_default();

        let theme = self
            .theme_line
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| Theme::coerce(m.as_str().trim()))
            .unwrap_or_default();

        EmotionTheme { emotion, theme }
    }
}

/// Map a theme-only reply onto the catalog.
///
/// An exact catalog name anywhere in the reply wins; otherwise loose
/// keywords in the reply pick a category, checked in a fixed order.
pub fn theme_from_reply(reply: &str) -> Theme {
    if let Some(theme) = Theme::find_in(reply) {
        return theme;
    }

    let lowered = reply.trim().to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    if any(&["api", "performance", "timeout", "error"]) {
        Theme::ApiPerformanceIssues
    } else if any(&["billing", "invoice", "payment"]) {
        Theme::BillingUiConfusion
    } else if any(&["documentation", "docs", "document"]) {
        Theme::DocumentationGaps
    } else if any(&["feature", "request", "add"]) {
        Theme::FeatureRequests
    } else if any(&["mobile", "phone", "responsive"]) {
        Theme::MobileAppBugs
    } else if any(&["dark", "theme"]) {
        Theme::DarkModeRequests
    } else if any(&["typescript", "types"]) {
        Theme::TypeScriptSdkFeatureRequest
    } else if any(&["support", "help"]) {
        Theme::CustomerSupportPraise
    } else if any(&["ai", "workers ai"]) {
        Theme::WorkersAiPraise
    } else if any(&["praise", "great", "amazing", "love"]) {
        Theme::ProductPraise
    } else {
        Theme::Other
    }
}
