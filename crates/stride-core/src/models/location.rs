// ABOUTME: Location fix, track point, and coordinate models
// ABOUTME: Raw fixes are ephemeral; accepted fixes fold into immutable track points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::geo::{MAX_LATITUDE, MAX_LONGITUDE};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within the valid latitude/longitude ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= MAX_LATITUDE
            && self.longitude.abs() <= MAX_LONGITUDE
    }
}

/// A raw position report from the location provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f64,
    /// Horizontal accuracy radius in meters
    pub accuracy_meters: f64,
    /// When the fix was measured
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Create a fix
    #[must_use]
    pub const fn new(
        latitude: f64,
        longitude: f64,
        altitude: f64,
        accuracy_meters: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            accuracy_meters,
            timestamp,
        }
    }

    /// Horizontal position of the fix
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Time between measurement and `now`; negative for fixes stamped in the future
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    /// Coordinates in range and a finite, non-negative accuracy
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.coordinate().is_valid()
            && self.altitude.is_finite()
            && self.accuracy_meters.is_finite()
            && self.accuracy_meters >= 0.0
    }
}

/// A position retained in the session's route polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: f64,
    /// Measurement time in milliseconds since the Unix epoch
    pub timestamp_millis: i64,
}

impl TrackPoint {
    /// Horizontal position of the point
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// `[lat, lng, alt, timestamp_millis]` as sent to the route API
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.latitude,
            self.longitude,
            self.altitude,
            self.timestamp_millis as f64,
        ]
    }
}

impl From<&LocationFix> for TrackPoint {
    fn from(fix: &LocationFix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            altitude: fix.altitude,
            timestamp_millis: fix.timestamp.timestamp_millis(),
        }
    }
}
