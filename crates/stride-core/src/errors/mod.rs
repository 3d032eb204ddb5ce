// ABOUTME: Unified error handling with standard error codes for the tracking platform
// ABOUTME: Defines AppError, ErrorCode, and AppResult plus domain-specific error modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Unified Error Handling System
//!
//! Domain errors (`SessionError`, `PersistenceError`, `SensorError`) are
//! precise `thiserror` enums. Each converts into the unified `AppError`,
//! which carries a stable `ErrorCode` for callers that only need to
//! classify the failure.

/// Persistence collaborator errors
pub mod persistence;
/// Location and step sensor errors
pub mod sensor;
/// Tracking session state machine errors
pub mod session;

pub use persistence::PersistenceError;
pub use sensor::{SensorError, SensorKind};
pub use session::SessionError;

use std::error::Error;
use std::{fmt, io};

use serde::{Deserialize, Serialize};

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input rejected by validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Numeric value outside the accepted range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Session lifecycle (4000-4999)
    /// Requested transition is not valid from the current state
    #[serde(rename = "INVALID_STATE_TRANSITION")]
    InvalidStateTransition = 4000,
    /// Session already reached a terminal state
    #[serde(rename = "SESSION_CLOSED")]
    SessionClosed = 4001,

    // External collaborators (5000-5999)
    /// A persistence collaborator reported an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// A persistence collaborator did not answer in time
    #[serde(rename = "EXTERNAL_SERVICE_TIMEOUT")]
    ExternalServiceTimeout = 5001,
    /// A device sensor is missing or could not be registered
    #[serde(rename = "SENSOR_UNAVAILABLE")]
    SensorUnavailable = 5100,

    // Configuration (6000-6999)
    /// Configuration is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Data serialization/deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
    /// Local storage (outbox) failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidStateTransition => "The tracking session cannot do that right now",
            Self::SessionClosed => "The tracking session is already closed",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceTimeout => "An external service did not respond in time",
            Self::SensorUnavailable => "A device sensor is unavailable",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::StorageError => "Storage operation failed",
        }
    }

    /// Whether retrying the same operation later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError | Self::ExternalServiceTimeout | Self::StorageError
        )
    }
}

/// Unified error type for the application
#[derive(Debug)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Storage error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        let code = match &error {
            SessionError::InvalidTransition { .. } | SessionError::NothingToSave => {
                ErrorCode::InvalidStateTransition
            }
            SessionError::AlreadyTerminal { .. } | SessionError::ControllerStopped => {
                ErrorCode::SessionClosed
            }
            SessionError::SaveFailed { source } => source.code(),
            SessionError::LocationUnavailable { .. } => ErrorCode::SensorUnavailable,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<PersistenceError> for AppError {
    fn from(error: PersistenceError) -> Self {
        Self::new(error.code(), error.to_string()).with_source(error)
    }
}

impl From<SensorError> for AppError {
    fn from(error: SensorError) -> Self {
        Self::new(ErrorCode::SensorUnavailable, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
