//! Error types for feedlens

/// Result type alias using feedlens's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for feedlens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Outbound call to a hosted model failed (network, non-2xx, malformed body)
    #[error("remote call error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteCall {
        /// Upstream HTTP status, when a response was received
        status: Option<u16>,
        /// Upstream message or transport error text
        message: String,
    },

    /// Model output did not match the expected format
    #[error("parse error: {0}")]
    Parse(String),

    /// Missing or invalid input
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors (including missing credentials)
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence collaborator errors
    #[error("store error: {0}")]
    Store(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a remote call error without an upstream status
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteCall {
            status: None,
            message: msg.into(),
        }
    }

    /// Create a remote call error carrying the upstream status
    pub fn remote_status(status: u16, msg: impl Into<String>) -> Self {
        Self::RemoteCall {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from a hosted model call
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteCall { .. })
    }
}
