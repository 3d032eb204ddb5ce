// ABOUTME: Deterministic replay of recorded sensor scripts through a tracking session
// ABOUTME: Uses a virtual clock so fix ages and timer ticks match the recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Replay
//!
//! A script is a JSON document of timestamped sensor and lifecycle events:
//!
//! ```json
//! {
//!   "activity_type": "running",
//!   "events": [
//!     { "type": "fix", "lat": 52.52, "lng": 13.405, "accuracy": 8.0 },
//!     { "type": "steps", "total": 1000 },
//!     { "type": "tick", "seconds": 30 },
//!     { "type": "pause" },
//!     { "type": "resume" }
//!   ]
//! }
//! ```
//!
//! Ticks advance the virtual clock (and the session timer while active).
//! A fix is stamped `age_seconds` before the current virtual time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stride_core::errors::SessionError;
use stride_core::models::{ActivityType, FinishedActivity, LocationFix, RouteRecord, WorkoutEntry};
use stride_intelligence::FixOutcome;

use crate::config::TrackingConfig;
use crate::recorder::{build_route_record, build_workout_entry};
use crate::session::TrackingSession;

const fn default_accuracy() -> f64 {
    5.0
}

const fn one_second() -> u64 {
    1
}

/// `at` moved by `seconds`, saturating at the representable range
fn shifted(at: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    Duration::try_seconds(seconds)
        .and_then(|offset| at.checked_add_signed(offset))
        .unwrap_or(at)
}

/// One recorded event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Location fix
    Fix {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lng: f64,
        /// Altitude in meters
        #[serde(default)]
        alt: f64,
        /// Accuracy radius in meters
        #[serde(default = "default_accuracy")]
        accuracy: f64,
        /// How long before delivery the fix was measured
        #[serde(default)]
        age_seconds: i64,
    },
    /// Cumulative hardware step count
    Steps {
        /// Raw counter value
        total: u64,
    },
    /// Time passing
    Tick {
        /// Seconds elapsed
        #[serde(default = "one_second")]
        seconds: u64,
    },
    /// User paused
    Pause,
    /// User resumed
    Resume,
}

/// A recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Activity recorded, if the script names one
    #[serde(default)]
    pub activity_type: Option<ActivityType>,
    /// Events in delivery order
    pub events: Vec<ReplayEvent>,
}

impl ReplayScript {
    /// Parse a script from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid script
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// How the filter classified the replayed fixes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixTally {
    /// First retained fix
    pub seeded: usize,
    /// Fixes that added distance
    pub moved: usize,
    /// Retained fixes below the jitter threshold
    pub jitter: usize,
    /// Retained fixes above the jump threshold
    pub jump: usize,
    /// Fixes discarded before touching the session
    pub rejected: usize,
    /// Fixes delivered while the session was not active
    pub ignored: usize,
}

impl FixTally {
    fn record(&mut self, outcome: Option<FixOutcome>) {
        match outcome {
            None => self.ignored += 1,
            Some(FixOutcome::Seeded) => self.seeded += 1,
            Some(FixOutcome::Moved { .. }) => self.moved += 1,
            Some(FixOutcome::Jitter { .. }) => self.jitter += 1,
            Some(FixOutcome::Jump { .. }) => self.jump += 1,
            Some(FixOutcome::Rejected(_)) => self.rejected += 1,
        }
    }
}

/// Everything a replay produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Packaged session
    pub activity: FinishedActivity,
    /// Route record that would be persisted
    pub route: Option<RouteRecord>,
    /// Workout entry that would be persisted
    pub workout: WorkoutEntry,
    /// Filter classification of every fix
    pub fixes: FixTally,
}

/// Run `script` through a fresh session starting at `started_at`
///
/// # Errors
///
/// Returns an error if a pause or resume marker is invalid at its position
pub fn replay(
    script: &ReplayScript,
    activity_type: ActivityType,
    config: &TrackingConfig,
    weight_kg: f64,
    started_at: DateTime<Utc>,
) -> Result<ReplayReport, SessionError> {
    let mut session = TrackingSession::new(config.geo_filter.clone(), weight_kg);
    let mut now = started_at;
    let mut fixes = FixTally::default();

    session.start(activity_type, now)?;

    for event in &script.events {
        match *event {
            ReplayEvent::Fix {
                lat,
                lng,
                alt,
                accuracy,
                age_seconds,
            } => {
                let fix = LocationFix::new(
                    lat,
                    lng,
                    alt,
                    accuracy,
                    shifted(now, age_seconds.saturating_neg()),
                );
                fixes.record(session.apply_fix(&fix, now));
            }
            ReplayEvent::Steps { total } => {
                session.apply_step_reading(total);
            }
            ReplayEvent::Tick { seconds } => {
                session.advance(seconds);
                now = shifted(now, i64::try_from(seconds).unwrap_or(i64::MAX));
            }
            ReplayEvent::Pause => session.pause()?,
            ReplayEvent::Resume => session.resume()?,
        }
    }

    let activity = session.finish(now)?;
    Ok(ReplayReport {
        route: build_route_record(&activity),
        workout: build_workout_entry(&activity),
        activity,
        fixes,
    })
}
