// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, location fix builders, and a wired tracking controller rig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `stride_tracker`

use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::{DateTime, Utc};
use stride_tracker::config::{RecorderConfig, TrackingConfig};
use stride_tracker::constants::geo::EARTH_RADIUS_METERS;
use stride_tracker::models::{Coordinate, LocationFix};
use stride_tracker::recorder::{InMemoryRouteStore, InMemoryWorkoutStore, SessionRecorder};
use stride_tracker::sensors::{ScriptedLocationProvider, ScriptedStepSensor};
use stride_tracker::session::{TrackingController, TrackingDependencies, TrackingHandle};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Alexanderplatz, Berlin
pub const ORIGIN: Coordinate = Coordinate::new(52.5219, 13.4132);

/// Coordinate `meters` due north of `from`
pub fn north_of(from: Coordinate, meters: f64) -> Coordinate {
    let degrees = (meters / EARTH_RADIUS_METERS).to_degrees();
    Coordinate::new(from.latitude + degrees, from.longitude)
}

/// Fix at `coordinate` with the given accuracy and timestamp
pub fn fix_at(
    coordinate: Coordinate,
    accuracy_meters: f64,
    timestamp: DateTime<Utc>,
) -> LocationFix {
    LocationFix::new(
        coordinate.latitude,
        coordinate.longitude,
        34.0,
        accuracy_meters,
        timestamp,
    )
}

/// Accurate fix measured just now
pub fn fresh_fix(coordinate: Coordinate) -> LocationFix {
    fix_at(coordinate, 5.0, Utc::now())
}

/// Recorder settings with short backoff for tests
pub fn fast_recorder_config() -> RecorderConfig {
    RecorderConfig {
        persist_timeout: Duration::from_secs(2),
        max_retries: 2,
        initial_backoff: Duration::from_millis(10),
        outbox_dir: None,
    }
}

/// Tracking configuration with fast persistence settings
pub fn test_config() -> TrackingConfig {
    TrackingConfig {
        recorder: fast_recorder_config(),
        ..TrackingConfig::default()
    }
}

/// A controller wired to scripted sensors and in-memory stores
pub struct TestRig {
    pub handle: TrackingHandle,
    pub location: Arc<ScriptedLocationProvider>,
    pub steps: Arc<ScriptedStepSensor>,
    pub routes: Arc<InMemoryRouteStore>,
    pub workouts: Arc<InMemoryWorkoutStore>,
}

impl TestRig {
    /// Rig with working sensors, 70 kg user
    pub fn spawn() -> Self {
        Self::with_sensors(ScriptedLocationProvider::new(), ScriptedStepSensor::new())
    }

    /// Rig with the given sensors, 70 kg user
    pub fn with_sensors(location: ScriptedLocationProvider, steps: ScriptedStepSensor) -> Self {
        init_test_logging();
        let config = test_config();
        let location = Arc::new(location);
        let steps = Arc::new(steps);
        let routes = Arc::new(InMemoryRouteStore::new());
        let workouts = Arc::new(InMemoryWorkoutStore::new());

        let recorder = SessionRecorder::new(
            routes.clone(),
            workouts.clone(),
            config.recorder.clone(),
        );
        let deps = TrackingDependencies {
            location: location.clone(),
            steps: steps.clone(),
            recorder,
        };
        let handle = TrackingController::spawn(config, 70.0, deps).unwrap();

        Self {
            handle,
            location,
            steps,
            routes,
            workouts,
        }
    }
}
