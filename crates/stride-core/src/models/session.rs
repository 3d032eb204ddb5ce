// ABOUTME: Tracking session status, lifecycle actions, and observable snapshots
// ABOUTME: Snapshots are what the UI layer observes after every session mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityType, Coordinate};

/// Lifecycle status of a tracking session
///
/// `Idle → Active ⇄ Paused → Finished | Cancelled`. `Finished` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created, not started
    #[default]
    Idle,
    /// Timer and sensors running
    Active,
    /// Timer and sensors stopped, counters frozen
    Paused,
    /// Saved (or save attempted); terminal
    Finished,
    /// Discarded without persisting; terminal
    Cancelled,
}

impl SessionStatus {
    /// No further transitions are possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    /// Session was started and not yet closed
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Lifecycle operations, used in transition errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// Begin tracking
    Start,
    /// Suspend tracking
    Pause,
    /// Continue after a pause
    Resume,
    /// Stop and persist
    Finish,
    /// Stop and discard
    Cancel,
    /// Re-submit a finished activity whose save failed
    RetrySave,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Finish => "finish",
            Self::Cancel => "cancel",
            Self::RetrySave => "retry saving",
        };
        f.write_str(name)
    }
}

/// Read-only view of a session's aggregated state and live metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier, stable for the lifetime of one session
    pub session_id: Uuid,
    /// Lifecycle status
    pub status: SessionStatus,
    /// Activity being tracked
    pub activity_type: ActivityType,
    /// When `start` was called
    pub started_at: Option<DateTime<Utc>>,
    /// Seconds the timer has run (excludes paused time)
    pub elapsed_seconds: u64,
    /// Accumulated filtered distance in meters
    pub distance_meters: f64,
    /// Steps since the session baseline
    pub step_count: u64,
    /// Number of points in the route polyline
    pub track_point_count: usize,
    /// Last displayed position
    pub current_position: Option<Coordinate>,
    /// Live calorie estimate (kcal)
    pub calories: u32,
    /// Average speed over elapsed time (km/h)
    pub speed_kmh: f64,
    /// Average pace, `m:ss /km`, or a placeholder before enough distance
    pub pace: String,
    /// A finished activity is waiting for a successful save
    pub save_pending: bool,
}

impl SessionSnapshot {
    /// Distance in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}
