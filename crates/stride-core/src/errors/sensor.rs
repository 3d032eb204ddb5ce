// ABOUTME: Error types for location and step sensor registration
// ABOUTME: Sensor failures degrade tracking instead of failing the session

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Device sensors feeding a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// GPS / fused location provider
    Location,
    /// Hardware cumulative step counter
    StepCounter,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location => write!(f, "location"),
            Self::StepCounter => write!(f, "step counter"),
        }
    }
}

/// Sensor registration failures
#[derive(Debug, Clone, Error)]
pub enum SensorError {
    /// The device has no such sensor
    #[error("{sensor} sensor is not available on this device")]
    Unavailable {
        /// Missing sensor
        sensor: SensorKind,
    },

    /// The user has not granted access to the sensor
    #[error("permission for {sensor} sensor was denied")]
    PermissionDenied {
        /// Sensor lacking permission
        sensor: SensorKind,
    },

    /// The platform refused the listener registration
    #[error("failed to register {sensor} listener: {reason}")]
    Registration {
        /// Sensor being registered
        sensor: SensorKind,
        /// Platform-provided reason
        reason: String,
    },
}

impl SensorError {
    /// Sensor the error refers to
    #[must_use]
    pub const fn sensor(&self) -> SensorKind {
        match self {
            Self::Unavailable { sensor }
            | Self::PermissionDenied { sensor }
            | Self::Registration { sensor, .. } => *sensor,
        }
    }
}
