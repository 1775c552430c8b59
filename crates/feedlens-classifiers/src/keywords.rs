//! Keyword policy over feedback text
//!
//! Plain substring containment against lowercase phrase tables. There are
//! deliberately no word boundaries: "cant" and "can't" both match, and
//! "add" matches inside "address".

use aho_corasick::{AhoCorasick, MatchKind};
use feedlens_core::{Error, Result};

const ERROR_KEYWORDS: &[&str] = &[
    "error", "errors", "broken", "down", "crash", "failed", "failure", "bug", "bugs", "issue",
    "issues", "problem", "problems", "not working", "doesn't work", "can't", "cant", "cannot",
    "403", "404", "500", "502", "503", "504",
];

/// Error vocabulary without the bare issue/problem words
const NARROW_ERROR_KEYWORDS: &[&str] = &[
    "error", "errors", "broken", "down", "crash", "failed", "failure", "bug", "bugs",
    "not working", "doesn't work", "can't", "cant", "cannot", "403", "404", "500", "502", "503",
    "504",
];

/// Leading space keeps "tissue" and the like out
const ISSUE_KEYWORDS: &[&str] = &[" issue", " issues", " problem", " problems"];

const URGENT_KEYWORDS: &[&str] = &[
    "urgent", "asap", "immediate", "critical", "emergency", "blocking", "broken", "not working",
];

const REQUEST_KEYWORDS: &[&str] = &[
    "request", "add", "feature", "support", "need", "would be nice", "can you", "please add",
    "suggestion", "improvement", "would love", "could you",
];

const STRONG_EMOTION_KEYWORDS: &[&str] = &[
    "love", "amazing", "incredible", "fantastic", "hate", "terrible", "awful", "horrible",
    "disgusting",
];

/// Request idioms that contain a strong-emotion word without being emotional
const EMOTION_IDIOMS: &[&str] = &["would love"];

const POSITIVE_CONTEXT_KEYWORDS: &[&str] = &[
    "resolved", "fixed", "solved", "helped", "great", "excellent", "amazing", "phenomenal",
    "wonderful", "fantastic", "perfect", "love", "thanks", "thank you", "appreciate", "helpful",
    "quick", "fast", "easy",
];

/// Boolean keyword signals for one piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeywordSignals {
    pub error: bool,
    pub urgent: bool,
    pub request: bool,
    pub strong_emotion: bool,
    pub positive_context: bool,
    /// Narrow error check used by the final decision
    pub error_narrow: bool,
}

/// Compiled keyword tables
pub struct KeywordPolicy {
    error: AhoCorasick,
    narrow_error: AhoCorasick,
    issue: AhoCorasick,
    urgent: AhoCorasick,
    request: AhoCorasick,
    strong_emotion: AhoCorasick,
    positive_context: AhoCorasick,
}

impl KeywordPolicy {
    /// Compile all keyword tables
    pub fn new() -> Result<Self> {
        Ok(Self {
            error: build("error", ERROR_KEYWORDS)?,
            narrow_error: build("narrow error", NARROW_ERROR_KEYWORDS)?,
            issue: build("issue", ISSUE_KEYWORDS)?,
            urgent: build("urgent", URGENT_KEYWORDS)?,
            request: build("request", REQUEST_KEYWORDS)?,
            strong_emotion: build_strong_emotion()?,
            positive_context: build("positive context", POSITIVE_CONTEXT_KEYWORDS)?,
        })
    }

    pub fn has_error_signal(&self, content: &str) -> bool {
        self.error.is_match(&content.to_lowercase())
    }

    pub fn has_urgent_signal(&self, content: &str) -> bool {
        self.urgent.is_match(&content.to_lowercase())
    }

    pub fn has_request_signal(&self, content: &str) -> bool {
        self.request.is_match(&content.to_lowercase())
    }

    pub fn has_strong_emotion_signal(&self, content: &str) -> bool {
        self.strong_emotion_lowered(&content.to_lowercase())
    }

    pub fn has_positive_context_signal(&self, content: &str) -> bool {
        self.positive_context.is_match(&content.to_lowercase())
    }

    /// Narrow error vocabulary, plus issue/problem words only when no
    /// positive context is present
    pub fn has_error_keywords_narrow(&self, content: &str) -> bool {
        let lowered = content.to_lowercase();
        self.narrow_error_lowered(&lowered, self.positive_context.is_match(&lowered))
    }

    /// Evaluate every signal with a single lowercase pass
    pub fn signals(&self, content: &str) -> KeywordSignals {
        let lowered = content.to_lowercase();
        let positive_context = self.positive_context.is_match(&lowered);

        KeywordSignals {
            error: self.error.is_match(&lowered),
            urgent: self.urgent.is_match(&lowered),
            request: self.request.is_match(&lowered),
            strong_emotion: self.strong_emotion_lowered(&lowered),
            positive_context,
            error_narrow: self.narrow_error_lowered(&lowered, positive_context),
        }
    }

    /// Idiom matches consume their text, so "would love" alone is not strong emotion
    fn strong_emotion_lowered(&self, lowered: &str) -> bool {
        self.strong_emotion
            .find_iter(lowered)
            .any(|m| m.pattern().as_usize() < STRONG_EMOTION_KEYWORDS.len())
    }

    fn narrow_error_lowered(&self, lowered: &str, positive_context: bool) -> bool {
        self.narrow_error.is_match(lowered) || (!positive_context && self.issue.is_match(lowered))
    }
}

fn build_strong_emotion() -> Result<AhoCorasick> {
    let phrases = STRONG_EMOTION_KEYWORDS.iter().chain(EMOTION_IDIOMS);
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(phrases)
        .map_err(|e| Error::internal(format!("Failed to build strong emotion keyword matcher: {e}")))
}

fn build(table: &str, phrases: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::new(phrases)
        .map_err(|e| Error::internal(format!("Failed to build {table} keyword matcher: {e}")))
}
