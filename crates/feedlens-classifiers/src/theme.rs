//! Standalone theme classification

use crate::classifier::ChatModel;
use crate::extract::theme_from_reply;
use crate::prompts::{theme_prompt, THEME_SYSTEM_PROMPT};
use feedlens_core::{FeedbackItem, Theme};
use std::sync::Arc;
use tracing::{debug, warn};

/// Assigns a catalog theme to feedback with one chat call
pub struct ThemeClassifier {
    chat: Arc<dyn ChatModel>,
}

impl ThemeClassifier {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }

    /// Classify into the theme catalog. Never fails; errors map to Other.
    pub async fn classify_theme(&self, item: &FeedbackItem) -> Theme {
        if item.content.trim().is_empty() {
            return Theme::Other;
        }

        match self
            .chat
            .chat_complete(THEME_SYSTEM_PROMPT, &theme_prompt(&item.content))
            .await
        {
            Ok(reply) => {
                let theme = theme_from_reply(&reply);
                debug!(item_id = %item.id, theme = %theme, "classified theme");
                theme
            }
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "theme classification failed");
                Theme::Other
            }
        }
    }
}
