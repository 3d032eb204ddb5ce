// ABOUTME: Location fix filter deciding which fixes move position and distance
// ABOUTME: Rejects inaccurate, stale, and malformed fixes; classifies jitter and jumps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Location Fix Filtering
//!
//! Every fix passes three gates before it may touch session state:
//!
//! 1. **Well-formed**: finite, in-range coordinates and a non-negative accuracy
//! 2. **Accurate**: accuracy radius at most `max_accuracy_meters` (50 m)
//! 3. **Fresh**: no older than `max_fix_age` (10 s) when it arrives
//!
//! A fix that passes is *retained*: it becomes the current position and
//! the new reference point. Whether it also adds distance depends on the
//! great-circle delta from the previous retained fix:
//!
//! | delta                      | outcome  | distance |
//! |----------------------------|----------|----------|
//! | no previous fix            | `Seeded` | 0        |
//! | `< min_delta` (3 m)        | `Jitter` | 0        |
//! | `min_delta ..= max_delta`  | `Moved`  | delta    |
//! | `> max_delta` (100 m)      | `Jump`   | 0        |
//!
//! The reference point advances on jitter and jumps too, so one glitch
//! cannot poison every later delta. The cost is that a legitimate burst
//! of more than 100 m between two fixes is never counted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stride_core::models::LocationFix;
use tracing::{debug, trace};

use crate::config::GeoFilterConfig;
use crate::geo::haversine_distance;

/// Why a fix was discarded before touching session state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixRejection {
    /// Non-finite or out-of-range values
    Malformed,
    /// Accuracy radius too large
    Inaccurate {
        /// Reported accuracy radius (meters)
        accuracy_meters: f64,
    },
    /// Delivered too long after it was measured
    Stale {
        /// Age on arrival (milliseconds)
        age_millis: i64,
    },
}

/// Result of running one fix through the filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixOutcome {
    /// Discarded; position, track and distance untouched
    Rejected(FixRejection),
    /// First retained fix; seeds position only
    Seeded,
    /// Retained, movement below the jitter threshold
    Jitter {
        /// Distance from the previous retained fix (meters)
        delta_meters: f64,
    },
    /// Retained, counted movement
    Moved {
        /// Distance from the previous retained fix (meters)
        delta_meters: f64,
    },
    /// Retained, movement above the jump threshold
    Jump {
        /// Distance from the previous retained fix (meters)
        delta_meters: f64,
    },
}

impl FixOutcome {
    /// Meters to add to the session distance
    #[must_use]
    pub const fn distance_delta(&self) -> f64 {
        match self {
            Self::Moved { delta_meters } => *delta_meters,
            _ => 0.0,
        }
    }

    /// Whether the fix becomes a track point and the current position
    #[must_use]
    pub const fn is_retained(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Stateful location filter owned by one tracking session
#[derive(Debug, Clone, Default)]
pub struct GeoFilter {
    config: GeoFilterConfig,
    last_retained: Option<LocationFix>,
}

impl GeoFilter {
    /// Create a filter with the given thresholds
    #[must_use]
    pub const fn new(config: GeoFilterConfig) -> Self {
        Self {
            config,
            last_retained: None,
        }
    }

    /// Thresholds in use
    #[must_use]
    pub const fn config(&self) -> &GeoFilterConfig {
        &self.config
    }

    /// Reference fix for the next delta
    #[must_use]
    pub const fn last_retained(&self) -> Option<&LocationFix> {
        self.last_retained.as_ref()
    }

    /// Forget the reference fix (new session)
    pub fn reset(&mut self) {
        self.last_retained = None;
    }

    /// Check a fix against the accuracy, freshness and sanity gates
    #[must_use]
    pub fn check(&self, fix: &LocationFix, now: DateTime<Utc>) -> Option<FixRejection> {
        if !fix.is_well_formed() {
            return Some(FixRejection::Malformed);
        }
        if fix.accuracy_meters > self.config.max_accuracy_meters {
            return Some(FixRejection::Inaccurate {
                accuracy_meters: fix.accuracy_meters,
            });
        }
        let age_millis = fix.age(now).num_milliseconds();
        if age_millis > self.config.max_fix_age_millis() {
            return Some(FixRejection::Stale { age_millis });
        }
        None
    }

    /// Classify a fix and, when retained, make it the new reference point
    pub fn evaluate(&mut self, fix: &LocationFix, now: DateTime<Utc>) -> FixOutcome {
        if let Some(rejection) = self.check(fix, now) {
            trace!(?rejection, "location fix rejected");
            return FixOutcome::Rejected(rejection);
        }

        let outcome = self.last_retained.map_or(FixOutcome::Seeded, |previous| {
            let delta_meters = haversine_distance(previous.coordinate(), fix.coordinate());
            if delta_meters < self.config.min_delta_meters {
                FixOutcome::Jitter { delta_meters }
            } else if delta_meters > self.config.max_delta_meters {
                debug!(delta_meters, "location jump ignored for distance");
                FixOutcome::Jump { delta_meters }
            } else {
                FixOutcome::Moved { delta_meters }
            }
        });

        self.last_retained = Some(*fix);
        outcome
    }
}
