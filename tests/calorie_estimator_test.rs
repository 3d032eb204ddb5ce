// ABOUTME: Tests for MET-based calorie estimation and the per-step fallback
// ABOUTME: Checks band selection per activity, band edges, and the max-of-two rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use stride_tracker::intelligence::{CalorieEstimator, CalorieInput};
use stride_tracker::models::ActivityType;

fn input(
    activity_type: ActivityType,
    elapsed_seconds: u64,
    distance_meters: f64,
    step_count: u64,
) -> CalorieInput {
    CalorieInput {
        activity_type,
        elapsed_seconds,
        distance_meters,
        step_count,
        weight_kg: 70.0,
    }
}

#[test]
fn test_running_ten_kmh_for_an_hour() {
    let estimate = CalorieEstimator::estimate(&input(ActivityType::Running, 3600, 10_000.0, 0));

    assert!((estimate.speed_kmh - 10.0).abs() < 1e-9);
    assert!((estimate.met - 9.8).abs() < 1e-9);
    assert_eq!(estimate.met_calories, 686);
    assert_eq!(estimate.step_calories, 0);
    assert_eq!(estimate.calories, 686);
}

#[test]
fn test_steps_win_when_larger() {
    let estimate =
        CalorieEstimator::estimate(&input(ActivityType::Running, 3600, 10_000.0, 20_000));

    assert_eq!(estimate.met_calories, 686);
    assert_eq!(estimate.step_calories, 800);
    assert_eq!(estimate.calories, 800);
}

#[test]
fn test_zero_elapsed_is_zero() {
    let estimate = CalorieEstimator::estimate(&input(ActivityType::Cycling, 0, 5_000.0, 0));

    assert!(estimate.speed_kmh.abs() < f64::EPSILON);
    assert_eq!(estimate.met_calories, 0);
    assert_eq!(estimate.calories, 0);
}

#[test]
fn test_treadmill_session_uses_step_estimate() {
    // No GPS distance indoors: speed 0 selects the lowest band
    let estimate = CalorieEstimator::estimate(&input(ActivityType::Walking, 1800, 0.0, 3000));

    assert!((estimate.met - 2.0).abs() < 1e-9);
    assert_eq!(estimate.met_calories, 70);
    assert_eq!(estimate.step_calories, 120);
    assert_eq!(estimate.calories, 120);
}

#[test]
fn test_walking_bands() {
    let met = |speed| CalorieEstimator::met_for(ActivityType::Walking, speed);

    assert!((met(2.0) - 2.0).abs() < 1e-9);
    assert!((met(3.0) - 2.0).abs() < 1e-9);
    assert!((met(4.5) - 3.5).abs() < 1e-9);
    assert!((met(6.0) - 4.3).abs() < 1e-9);
    assert!((met(7.0) - 5.0).abs() < 1e-9);
}

#[test]
fn test_running_bands() {
    let met = |speed| CalorieEstimator::met_for(ActivityType::Running, speed);

    assert!((met(7.5) - 8.3).abs() < 1e-9);
    assert!((met(10.0) - 9.8).abs() < 1e-9);
    assert!((met(10.01) - 11.0).abs() < 1e-9);
    assert!((met(12.0) - 11.0).abs() < 1e-9);
    assert!((met(15.0) - 12.8).abs() < 1e-9);
}

#[test]
fn test_cycling_bands() {
    let met = |speed| CalorieEstimator::met_for(ActivityType::Cycling, speed);

    assert!((met(12.0) - 4.0).abs() < 1e-9);
    assert!((met(18.0) - 6.8).abs() < 1e-9);
    assert!((met(25.0) - 8.0).abs() < 1e-9);
}

#[test]
fn test_weight_scales_met_estimate() {
    let light = CalorieInput {
        weight_kg: 50.0,
        ..input(ActivityType::Cycling, 3600, 25_000.0, 0)
    };
    let heavy = CalorieInput {
        weight_kg: 100.0,
        ..light
    };

    assert_eq!(CalorieEstimator::calories(&light), 400);
    assert_eq!(CalorieEstimator::calories(&heavy), 800);
}

#[test]
fn test_speed_kmh() {
    assert!((CalorieEstimator::speed_kmh(1800, 5_000.0) - 10.0).abs() < 1e-9);
    assert!(CalorieEstimator::speed_kmh(0, 5_000.0).abs() < f64::EPSILON);
}

#[test]
fn test_speed_on_band_edge_takes_lower_band() {
    let edges = [
        (ActivityType::Walking, 3.0, 2.0, 3.5),
        (ActivityType::Walking, 5.0, 3.5, 4.3),
        (ActivityType::Walking, 6.5, 4.3, 5.0),
        (ActivityType::Running, 8.0, 8.3, 9.8),
        (ActivityType::Running, 10.0, 9.8, 11.0),
        (ActivityType::Running, 12.0, 11.0, 12.8),
        (ActivityType::Cycling, 16.0, 4.0, 6.8),
        (ActivityType::Cycling, 20.0, 6.8, 8.0),
    ];

    for (activity_type, edge, on_edge, above_edge) in edges {
        let at = CalorieEstimator::met_for(activity_type, edge);
        let past = CalorieEstimator::met_for(activity_type, edge + 0.001);
        assert!((at - on_edge).abs() < 1e-9, "{activity_type} at {edge}");
        assert!((past - above_edge).abs() < 1e-9, "{activity_type} past {edge}");
    }
}
