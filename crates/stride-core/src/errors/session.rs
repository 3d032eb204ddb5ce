// ABOUTME: Error types for the tracking session state machine
// ABOUTME: Covers rejected transitions, terminal sessions, and failed saves

use thiserror::Error;

use super::persistence::PersistenceError;
use super::sensor::SensorError;
use crate::models::{SessionAction, SessionStatus};

/// Errors returned by tracking session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The action is not valid in the current status (e.g. pause while paused)
    #[error("cannot {action} a session that is {from}")]
    InvalidTransition {
        /// Status the session was in
        from: SessionStatus,
        /// Action that was attempted
        action: SessionAction,
    },

    /// The session already finished or was cancelled
    #[error("session is already {status}")]
    AlreadyTerminal {
        /// Terminal status of the session
        status: SessionStatus,
    },

    /// The workout entry could not be persisted; session data is retained
    #[error("session could not be saved")]
    SaveFailed {
        /// Failure reported by the workout persistence collaborator
        #[from]
        source: PersistenceError,
    },

    /// Location updates could not be started, so the session stayed idle
    #[error("location updates unavailable: {source}")]
    LocationUnavailable {
        /// Registration failure reported by the location provider
        #[from]
        source: SensorError,
    },

    /// `retry_save` was called with no pending activity
    #[error("no finished activity is waiting to be saved")]
    NothingToSave,

    /// The controller task is no longer running
    #[error("tracking controller has stopped")]
    ControllerStopped,
}

impl SessionError {
    /// Shorthand for an invalid transition
    #[must_use]
    pub const fn invalid(from: SessionStatus, action: SessionAction) -> Self {
        Self::InvalidTransition { from, action }
    }
}
