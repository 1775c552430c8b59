//! Prompt templates for the chat model

use feedlens_core::{Emotion, Theme};

pub const EMOTION_THEME_SYSTEM_PROMPT: &str =
    "You are an emotion and theme detection expert. Respond with emotion and theme in the exact format requested.";

pub const THEME_SYSTEM_PROMPT: &str =
    "You are a feedback classification expert. Respond with only a single category name, exactly as provided in the list.";

/// Short description shown next to each category in the theme-only prompt
fn theme_hint(theme: Theme) -> &'static str {
    match theme {
        Theme::ApiPerformanceIssues => "timeouts, errors, slow responses, rate limiting",
        Theme::AuthenticationIssues => "login problems, security concerns",
        Theme::BillingUiConfusion => "billing dashboard, invoice issues, payment problems",
        Theme::CustomerSupportPraise => "positive feedback about support team",
        Theme::DarkModeRequests => "dark theme, theme preferences",
        Theme::DocumentationGaps => "missing docs, unclear instructions, need examples",
        Theme::FeatureRequests => "new features, enhancements, improvements",
        Theme::MobileAppBugs => "mobile issues, responsive design problems",
        Theme::PerformanceImprovements => "speed, optimization, efficiency",
        Theme::ProductPraise => "general positive feedback, appreciation",
        Theme::TypeScriptSdkFeatureRequest => "TypeScript support, type safety",
        Theme::WorkersAiPraise => "positive feedback about AI features",
        Theme::UiUxImprovements => "design, user experience, interface",
        Theme::Other => "anything that doesn't fit above categories",
    }
}

/// Combined emotion + theme prompt (one outbound call)
pub fn emotion_theme_prompt(content: &str) -> String {
    let emotions = Emotion::ALL
        .iter()
        .map(|e| e.as_str())
        .collect::<Vec<_>>();
    let (last, rest) = emotions.split_last().map_or(("", &[][..]), |(l, r)| (*l, r));
    let themes = Theme::ALL
        .iter()
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following feedback and provide:\n\
         1. Primary emotion (ONE word): {}, or {last}\n\
         2. Theme category (ONE category from the list below)\n\
         \n\
         Theme categories:\n\
         {themes}\n\
         \n\
         Feedback: \"{content}\"\n\
         \n\
         Respond in this exact format (one line):\n\
         emotion: [emotion word]\n\
         theme: [theme category]",
        rest.join(", ")
    )
}

/// Theme-only prompt
pub fn theme_prompt(content: &str) -> String {
    let themes = Theme::ALL
        .iter()
        .map(|t| format!("- {t} ({})", theme_hint(*t)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following feedback and classify it into ONE of these theme categories. Choose the most appropriate category:\n\
         \n\
         Categories:\n\
         {themes}\n\
         \n\
         Feedback: \"{content}\"\n\
         \n\
         Respond with ONLY the category name (exactly as listed above, case-sensitive):"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_theme_prompt_lists_catalogs() {
        let prompt = emotion_theme_prompt("Dark mode please");
        assert!(prompt.contains("frustrated, excited, confused, angry, happy, or neutral"));
        assert!(prompt.contains("- TypeScript SDK Feature Request\n"));
        assert!(prompt.contains("Feedback: \"Dark mode please\""));
        assert!(prompt.ends_with("emotion: [emotion word]\ntheme: [theme category]"));
    }

    #[test]
    fn test_theme_prompt_has_hints() {
        let prompt = theme_prompt("Invoices are confusing");
        assert!(prompt.contains(
            "- Billing UI Confusion (billing dashboard, invoice issues, payment problems)"
        ));
        assert!(prompt.contains("- Other (anything that doesn't fit above categories)"));
    }
}
