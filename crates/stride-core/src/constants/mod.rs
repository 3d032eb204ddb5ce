// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for location filtering, timers, calories, and persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace. Runtime configuration types use these as their defaults.

/// Location fix filtering thresholds
pub mod geo_filter {
    /// Fixes with a horizontal accuracy worse than this are discarded (meters)
    pub const MAX_ACCURACY_METERS: f64 = 50.0;

    /// Fixes older than this when they reach the session are discarded (seconds)
    pub const MAX_FIX_AGE_SECS: i64 = 10;

    /// Deltas below this are GPS jitter and do not add distance (meters)
    pub const MIN_DELTA_METERS: f64 = 3.0;

    /// Deltas above this are treated as a position jump and do not add distance (meters)
    pub const MAX_DELTA_METERS: f64 = 100.0;
}

/// Geodesy
pub mod geo {
    /// Mean Earth radius used for great-circle distances (meters)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

    /// Valid latitude range (degrees)
    pub const MAX_LATITUDE: f64 = 90.0;

    /// Valid longitude range (degrees)
    pub const MAX_LONGITUDE: f64 = 180.0;
}

/// Session timing and sensor subscription parameters
pub mod timing {
    /// Elapsed-time timer period (milliseconds)
    pub const TIMER_PERIOD_MS: u64 = 1_000;

    /// Requested interval between location updates (milliseconds)
    pub const LOCATION_INTERVAL_MS: u64 = 2_000;

    /// Requested minimum displacement between location updates (meters)
    pub const LOCATION_MIN_DISTANCE_METERS: f64 = 10.0;

    /// Capacity of the command channel feeding the session controller
    pub const COMMAND_CHANNEL_CAPACITY: usize = 32;

    /// Capacity of sensor channels handed to providers
    pub const SENSOR_CHANNEL_CAPACITY: usize = 64;
}

/// Energy expenditure estimation
pub mod calories {
    /// Body weight used when the profile service has none (kilograms)
    pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

    /// Rough energy per step used as the low-GPS fallback (kcal)
    pub const KCAL_PER_STEP: f64 = 0.04;

    /// Calories per minute credited when the estimator produced nothing
    pub const FALLBACK_KCAL_PER_MINUTE: u32 = 5;

    /// Plausible body weight bounds accepted from configuration (kilograms)
    pub const MIN_WEIGHT_KG: f64 = 20.0;

    /// Plausible body weight bounds accepted from configuration (kilograms)
    pub const MAX_WEIGHT_KG: f64 = 400.0;
}

/// Session persistence
pub mod persistence {
    /// Category attached to generated workout entries
    pub const WORKOUT_CATEGORY: &str = "cardio";

    /// Shortest duration recorded for a workout entry (minutes)
    pub const MIN_WORKOUT_MINUTES: u32 = 1;

    /// Timeout applied to each persistence call (seconds)
    pub const PERSIST_TIMEOUT_SECS: u64 = 30;

    /// Retries after the first failed persistence attempt
    pub const MAX_RETRIES: u32 = 2;

    /// Initial retry backoff (milliseconds), doubled per attempt
    pub const INITIAL_BACKOFF_MS: u64 = 500;

    /// File extension for activities parked in the outbox
    pub const OUTBOX_EXTENSION: &str = "json";
}

/// Display formatting
pub mod display {
    /// Pace shown before enough distance is covered
    pub const PACE_PLACEHOLDER: &str = "--:--";

    /// Minimum distance before a pace is shown (kilometers)
    pub const MIN_PACE_DISTANCE_KM: f64 = 0.01;
}

/// Service identification for structured logs
pub mod service_names {
    /// Service name used by the logging layer
    pub const STRIDE_TRACKER: &str = "stride-tracker";
}
