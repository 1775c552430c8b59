//! Closed emotion and theme catalogs
//!
//! Model output is free text; everything downstream only ever sees members
//! of these two sets. Unknown values coerce to [`Emotion::Neutral`] and
//! [`Theme::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary emotion of a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Frustrated,
    Excited,
    Confused,
    Angry,
    Happy,
    #[default]
    #[serde(other)]
    Neutral,
}

impl Emotion {
    /// Every catalog member, in prompt order
    pub const ALL: [Emotion; 6] = [
        Emotion::Frustrated,
        Emotion::Excited,
        Emotion::Confused,
        Emotion::Angry,
        Emotion::Happy,
        Emotion::Neutral,
    ];

    /// Catalog string for this emotion
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frustrated => "frustrated",
            Self::Excited => "excited",
            Self::Confused => "confused",
            Self::Angry => "angry",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
        }
    }

    /// Exact (case-insensitive) lookup
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        Self::ALL.into_iter().find(|e| e.as_str() == label)
    }

    /// Lookup that falls back to neutral for anything outside the catalog
    pub fn coerce(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }

    /// happy or excited
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Happy | Self::Excited)
    }

    /// angry or frustrated
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Angry | Self::Frustrated)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topical theme of a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Theme {
    #[serde(rename = "API Performance Issues")]
    ApiPerformanceIssues,
    #[serde(rename = "Authentication Issues")]
    AuthenticationIssues,
    #[serde(rename = "Billing UI Confusion")]
    BillingUiConfusion,
    #[serde(rename = "Customer Support Praise")]
    CustomerSupportPraise,
    #[serde(rename = "Dark Mode Requests")]
    DarkModeRequests,
    #[serde(rename = "Documentation Gaps")]
    DocumentationGaps,
    #[serde(rename = "Feature Requests")]
    FeatureRequests,
    #[serde(rename = "Mobile App Bugs")]
    MobileAppBugs,
    #[serde(rename = "Performance Improvements")]
    PerformanceImprovements,
    #[serde(rename = "Product Praise")]
    ProductPraise,
    #[serde(rename = "TypeScript SDK Feature Request")]
    TypeScriptSdkFeatureRequest,
    #[serde(rename = "Workers AI Praise")]
    WorkersAiPraise,
    #[serde(rename = "UI/UX Improvements")]
    UiUxImprovements,
    #[default]
    #[serde(other)]
    Other,
}

impl Theme {
    /// Every catalog member, in prompt order
    pub const ALL: [Theme; 14] = [
        Theme::ApiPerformanceIssues,
        Theme::AuthenticationIssues,
        Theme::BillingUiConfusion,
        Theme::CustomerSupportPraise,
        Theme::DarkModeRequests,
        Theme::DocumentationGaps,
        Theme::FeatureRequests,
        Theme::MobileAppBugs,
        Theme::PerformanceImprovements,
        Theme::ProductPraise,
        Theme::TypeScriptSdkFeatureRequest,
        Theme::WorkersAiPraise,
        Theme::UiUxImprovements,
        Theme::Other,
    ];

    /// Exact catalog string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiPerformanceIssues => "API Performance Issues",
            Self::AuthenticationIssues => "Authentication Issues",
            Self::BillingUiConfusion => "Billing UI Confusion",
            Self::CustomerSupportPraise => "Customer Support Praise",
            Self::DarkModeRequests => "Dark Mode Requests",
            Self::DocumentationGaps => "Documentation Gaps",
            Self::FeatureRequests => "Feature Requests",
            Self::MobileAppBugs => "Mobile App Bugs",
            Self::PerformanceImprovements => "Performance Improvements",
            Self::ProductPraise => "Product Praise",
            Self::TypeScriptSdkFeatureRequest => "TypeScript SDK Feature Request",
            Self::WorkersAiPraise => "Workers AI Praise",
            Self::UiUxImprovements => "UI/UX Improvements",
            Self::Other => "Other",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == label)
    }

    /// Lookup that falls back to Other for anything outside the catalog
    pub fn coerce(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }

    /// Leftmost catalog name appearing in `text`; ties go to catalog order
    pub fn find_in(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter_map(|t| text.find(t.as_str()).map(|pos| (pos, t)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, t)| t)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
