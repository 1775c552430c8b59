//! Hosted model clients
//!
//! Adapters that turn HTTP calls against the inference API into the
//! [`BinaryClassifier`](crate::BinaryClassifier) and
//! [`ChatModel`](crate::ChatModel) traits.

pub mod response;
mod workers_ai;

pub use response::{ChatPayload, ClassificationPayload, LabelScore};
pub use workers_ai::{ChatMessage, WorkersAiClient};
