//! Error types for the evidence viewport engine.

use thiserror::Error;

/// Errors produced by the engine's fallible operations.
///
/// The engine recovers from all of these internally; they surface only at
/// the screenshot-normalization boundary. Resolution, mapping, and gesture
/// handling degrade to fallbacks instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    /// Screenshot payload was empty
    #[error("empty screenshot payload")]
    EmptyScreenshot,

    /// Screenshot payload is neither a data URI nor base64 data
    #[error("malformed screenshot encoding: {message}")]
    MalformedEncoding {
        /// Description of what made the payload invalid
        message: String,
    },
}

impl EvidenceError {
    /// Create a malformed encoding error with a message.
    pub fn malformed_encoding(message: impl Into<String>) -> Self {
        Self::MalformedEncoding {
            message: message.into(),
        }
    }
}
