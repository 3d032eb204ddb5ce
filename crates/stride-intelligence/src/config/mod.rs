// ABOUTME: Configuration for tracking algorithms with validated defaults
// ABOUTME: Location filter thresholds consumed by GeoFilter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

mod error;

pub use error::ConfigError;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stride_core::constants::geo_filter;

/// Thresholds deciding which location fixes move the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFilterConfig {
    /// Reject fixes whose accuracy radius exceeds this (meters)
    pub max_accuracy_meters: f64,
    /// Reject fixes older than this on arrival
    pub max_fix_age: Duration,
    /// Deltas below this are jitter (meters)
    pub min_delta_meters: f64,
    /// Deltas above this are jumps (meters)
    pub max_delta_meters: f64,
}

impl Default for GeoFilterConfig {
    fn default() -> Self {
        Self {
            max_accuracy_meters: geo_filter::MAX_ACCURACY_METERS,
            max_fix_age: Duration::from_secs(geo_filter::MAX_FIX_AGE_SECS.unsigned_abs()),
            min_delta_meters: geo_filter::MIN_DELTA_METERS,
            max_delta_meters: geo_filter::MAX_DELTA_METERS,
        }
    }
}

impl GeoFilterConfig {
    /// Validate threshold ordering and signs
    ///
    /// # Errors
    ///
    /// Returns an error if a threshold is not positive or the delta window is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_accuracy_meters.is_finite() && self.max_accuracy_meters > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "max_accuracy_meters must be a positive number",
            ));
        }
        if self.max_fix_age.is_zero() {
            return Err(ConfigError::ValueOutOfRange("max_fix_age must be non-zero"));
        }
        if !(self.min_delta_meters.is_finite() && self.min_delta_meters >= 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "min_delta_meters must be zero or positive",
            ));
        }
        if !(self.max_delta_meters.is_finite() && self.max_delta_meters > self.min_delta_meters) {
            return Err(ConfigError::InvalidRange(
                "max_delta_meters must be greater than min_delta_meters",
            ));
        }
        Ok(())
    }

    /// Maximum fix age in whole milliseconds
    #[must_use]
    pub fn max_fix_age_millis(&self) -> i64 {
        i64::try_from(self.max_fix_age.as_millis()).unwrap_or(i64::MAX)
    }
}
