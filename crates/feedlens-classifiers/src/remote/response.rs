//! Response decoding for hosted model calls
//!
//! The inference API wraps payloads in a `{"result": ...}` envelope and the
//! payload itself comes in several shapes depending on the model. Each shape
//! is an explicit variant; anything else lands in a fallback variant.

use crate::classifier::{RawClassification, RawLabel};
use feedlens_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Strip the `{"result": ...}` envelope when present and non-empty
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("result") {
            Some(inner) if is_truthy(&inner) => inner,
            Some(inner) => {
                map.insert("result".to_string(), inner);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One label/score pair
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

/// Known shapes of a binary classifier payload
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ClassificationPayload {
    /// `[{"label": "POSITIVE", "score": 0.9}, {"label": "NEGATIVE", "score": 0.1}]`
    Scores(Vec<LabelScore>),

    /// `{"data": [...]}`
    Wrapped { data: Vec<LabelScore> },

    /// `{"label": "POSITIVE", "score": 0.9}`
    Single(LabelScore),

    /// Anything else
    Unrecognized(Value),
}

impl ClassificationPayload {
    /// Decode an unwrapped payload value
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Self::Unrecognized(value))
    }

    /// Reduce to a raw classification.
    ///
    /// The unrecognized shape decodes to NEUTRAL / 0.5. An empty score list
    /// has no winner and is a parse error.
    pub fn into_raw(self) -> Result<RawClassification> {
        match self {
            Self::Scores(scores) | Self::Wrapped { data: scores } => from_score_list(&scores),
            Self::Single(single) => {
                let label = RawLabel::from_model_label(&single.label);
                let positive_score = if label == RawLabel::Positive { single.score } else { 0.0 };
                let negative_score = if label == RawLabel::Negative { single.score } else { 0.0 };
                Ok(RawClassification {
                    label,
                    score: single.score,
                    positive_score,
                    negative_score,
                })
            }
            Self::Unrecognized(_) => Ok(RawClassification::undetermined()),
        }
    }
}

fn from_score_list(scores: &[LabelScore]) -> Result<RawClassification> {
    let score_of = |wanted: &str| {
        scores
            .iter()
            .find(|s| s.label == wanted)
            .map(|s| s.score)
            .unwrap_or(0.0)
    };

    // First entry wins ties
    let winner = scores
        .iter()
        .reduce(|max, current| if current.score > max.score { current } else { max })
        .ok_or_else(|| Error::parse("classifier returned an empty label list"))?;

    Ok(RawClassification {
        label: RawLabel::from_model_label(&winner.label),
        score: winner.score,
        positive_score: score_of("POSITIVE"),
        negative_score: score_of("NEGATIVE"),
    })
}

/// Known shapes of a chat model payload
#[derive(Debug, Clone, PartialEq)]
pub enum ChatPayload {
    /// `{"response": "..."}`
    Response(String),

    /// Bare string payload
    Text(String),

    /// `{"choices": [{"message": {"content": "..."}}]}` or `{"choices": [{"text": "..."}]}`
    Choices(String),

    /// Anything else, kept as its JSON text
    Unrecognized(String),
}

impl ChatPayload {
    /// Decode an unwrapped payload value
    pub fn from_value(value: Value) -> Self {
        if let Some(response) = value.get("response").filter(|r| is_truthy(r)) {
            return Self::Response(value_text(response));
        }
        if let Value::String(text) = value {
            return Self::Text(text);
        }
        if let Some(first) = value
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .filter(|c| is_truthy(c))
        {
            let text = first
                .get("message")
                .and_then(|m| m.get("content"))
                .filter(|c| is_truthy(c))
                .or_else(|| first.get("text").filter(|t| is_truthy(t)))
                .map(value_text)
                .unwrap_or_default();
            return Self::Choices(text);
        }
        Self::Unrecognized(value.to_string())
    }

    /// The reply text carried by this payload
    pub fn into_text(self) -> String {
        match self {
            Self::Response(text) | Self::Text(text) | Self::Choices(text) | Self::Unrecognized(text) => text,
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
