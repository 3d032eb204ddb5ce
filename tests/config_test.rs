// ABOUTME: Tests for loading tracking configuration from STRIDE_* environment variables
// ABOUTME: Defaults, overrides, parse failures, and validation of loaded values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serial_test::serial;
use stride_tracker::config::{ConfigError, TrackingConfig};

const VARS: [&str; 12] = [
    "STRIDE_MAX_ACCURACY_M",
    "STRIDE_MAX_FIX_AGE_SECS",
    "STRIDE_MIN_DELTA_M",
    "STRIDE_MAX_DELTA_M",
    "STRIDE_TIMER_PERIOD_MS",
    "STRIDE_LOCATION_INTERVAL_MS",
    "STRIDE_LOCATION_MIN_DISTANCE_M",
    "STRIDE_DEFAULT_WEIGHT_KG",
    "STRIDE_PERSIST_TIMEOUT_SECS",
    "STRIDE_PERSIST_MAX_RETRIES",
    "STRIDE_PERSIST_BACKOFF_MS",
    "STRIDE_OUTBOX_DIR",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_without_overrides_matches_defaults() {
    clear_env();

    let config = TrackingConfig::from_env().unwrap();

    assert_eq!(config, TrackingConfig::default());
}

#[test]
#[serial]
fn test_from_env_applies_overrides() {
    clear_env();
    env::set_var("STRIDE_MAX_ACCURACY_M", "25");
    env::set_var("STRIDE_MAX_FIX_AGE_SECS", "5");
    env::set_var("STRIDE_MIN_DELTA_M", "2.5");
    env::set_var("STRIDE_MAX_DELTA_M", " 80 ");
    env::set_var("STRIDE_TIMER_PERIOD_MS", "500");
    env::set_var("STRIDE_LOCATION_INTERVAL_MS", "1000");
    env::set_var("STRIDE_DEFAULT_WEIGHT_KG", "82.5");
    env::set_var("STRIDE_PERSIST_TIMEOUT_SECS", "10");
    env::set_var("STRIDE_PERSIST_MAX_RETRIES", "4");
    env::set_var("STRIDE_PERSIST_BACKOFF_MS", "250");
    env::set_var("STRIDE_OUTBOX_DIR", "/var/lib/stride/outbox");

    let config = TrackingConfig::from_env().unwrap();
    clear_env();

    assert!((config.geo_filter.max_accuracy_meters - 25.0).abs() < f64::EPSILON);
    assert_eq!(config.geo_filter.max_fix_age, Duration::from_secs(5));
    assert!((config.geo_filter.min_delta_meters - 2.5).abs() < f64::EPSILON);
    assert!((config.geo_filter.max_delta_meters - 80.0).abs() < f64::EPSILON);
    assert_eq!(config.timer_period, Duration::from_millis(500));
    assert_eq!(config.location_request.interval, Duration::from_secs(1));
    assert!((config.default_weight_kg - 82.5).abs() < f64::EPSILON);
    assert_eq!(config.recorder.persist_timeout, Duration::from_secs(10));
    assert_eq!(config.recorder.max_retries, 4);
    assert_eq!(config.recorder.initial_backoff, Duration::from_millis(250));
    assert_eq!(
        config.recorder.outbox_dir,
        Some(PathBuf::from("/var/lib/stride/outbox"))
    );
}

#[test]
#[serial]
fn test_blank_outbox_dir_disables_outbox() {
    clear_env();
    env::set_var("STRIDE_OUTBOX_DIR", "   ");

    let config = TrackingConfig::from_env().unwrap();
    clear_env();

    assert!(config.recorder.outbox_dir.is_none());
}

#[test]
#[serial]
fn test_unparsable_value_names_the_variable() {
    clear_env();
    env::set_var("STRIDE_TIMER_PERIOD_MS", "fast");

    let err = TrackingConfig::from_env().unwrap_err();
    clear_env();

    match err {
        ConfigError::Parse(message) => assert!(message.contains("STRIDE_TIMER_PERIOD_MS=fast")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_loaded_values_are_validated() {
    clear_env();
    env::set_var("STRIDE_DEFAULT_WEIGHT_KG", "7");

    let err = TrackingConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(err, ConfigError::ValueOutOfRange(_)));
}

#[test]
#[serial]
fn test_inverted_delta_window_from_env_rejected() {
    clear_env();
    env::set_var("STRIDE_MIN_DELTA_M", "120");

    let err = TrackingConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(err, ConfigError::InvalidRange(_)));
}

#[test]
#[serial]
fn test_zero_timeout_rejected() {
    clear_env();
    env::set_var("STRIDE_PERSIST_TIMEOUT_SECS", "0");

    let result = TrackingConfig::from_env();
    clear_env();

    assert!(result.is_err());
}
