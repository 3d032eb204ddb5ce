// ABOUTME: Error types for route and workout persistence collaborators
// ABOUTME: Distinguishes rejections, transport failures, timeouts, and encoding problems

use thiserror::Error;

use super::ErrorCode;

/// Failure reported while persisting a finished session
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    /// The remote API answered with an error status
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// Status code returned by the API
        status: u16,
        /// Message returned by the API
        message: String,
    },

    /// The request never got a response (network down, connection reset)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The call did not complete within the configured timeout
    #[error("no response after {seconds}s")]
    Timeout {
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The record could not be encoded
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The local outbox could not be written or read
    #[error("outbox storage failed: {0}")]
    Storage(String),
}

impl PersistenceError {
    /// Error code used when converting into `AppError`
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected { .. } | Self::Transport(_) => ErrorCode::ExternalServiceError,
            Self::Timeout { .. } => ErrorCode::ExternalServiceTimeout,
            Self::Serialization(_) => ErrorCode::SerializationError,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Client-side rejections (4xx other than 408/429) and encoding failures
    /// will fail the same way again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Rejected { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            Self::Transport(_) | Self::Timeout { .. } | Self::Storage(_) => true,
            Self::Serialization(_) => false,
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
