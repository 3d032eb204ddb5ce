// ABOUTME: Tests for the async tracking controller driving scripted sensors on a paused clock
// ABOUTME: Covers timer ticks, sensor teardown, save failure and retry, and location requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{fresh_fix, north_of, TestRig, ORIGIN};
use stride_tracker::config::ConfigError;
use stride_tracker::errors::{PersistenceError, SensorError, SessionError};
use stride_tracker::models::{ActivityType, SessionStatus};
use stride_tracker::profile::StaticProfile;
use stride_tracker::recorder::{
    InMemoryRouteStore, InMemoryWorkoutStore, Outbox, RouteOutcome, SessionRecorder,
};
use stride_tracker::sensors::{ScriptedLocationProvider, ScriptedStepSensor};
use stride_tracker::session::{TrackingController, TrackingDependencies};
use tokio::time::sleep;

fn unavailable() -> PersistenceError {
    PersistenceError::Rejected {
        status: 503,
        message: "service unavailable".to_owned(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_start_subscribes_and_timer_ticks() {
    let rig = TestRig::spawn();

    let snapshot = rig.handle.start(ActivityType::Running).await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Active);
    assert!(rig.location.is_subscribed().await);
    assert!(rig.steps.is_subscribed().await);
    let request = rig.location.last_request().await.unwrap();
    assert_eq!(request.interval, Duration::from_secs(2));

    sleep(Duration::from_millis(3_500)).await;

    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.elapsed_seconds, 3);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_timer_and_sensors() {
    let rig = TestRig::spawn();
    rig.handle.start(ActivityType::Running).await.unwrap();
    sleep(Duration::from_millis(2_500)).await;

    let paused = rig.handle.pause().await.unwrap();
    assert_eq!(paused.status, SessionStatus::Paused);
    assert_eq!(paused.elapsed_seconds, 2);
    assert!(!rig.location.is_subscribed().await);
    assert!(!rig.steps.is_subscribed().await);

    // Nothing can be delivered after teardown
    assert!(!rig.location.push(fresh_fix(ORIGIN)).await);
    assert!(!rig.steps.push(500).await);

    sleep(Duration::from_secs(10)).await;
    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.elapsed_seconds, 2);
    assert_eq!(snapshot.track_point_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_resume_resubscribes_and_keeps_counters() {
    let rig = TestRig::spawn();
    rig.handle.start(ActivityType::Walking).await.unwrap();
    assert!(rig.steps.push(1000).await);
    assert!(rig.steps.push(1050).await);
    sleep(Duration::from_millis(1_500)).await;
    rig.handle.pause().await.unwrap();

    let resumed = rig.handle.resume().await.unwrap();
    assert_eq!(resumed.status, SessionStatus::Active);
    assert_eq!(resumed.step_count, 50);
    assert_eq!(rig.location.subscription_count(), 2);
    assert_eq!(rig.steps.subscription_count(), 2);

    assert!(rig.steps.push(1080).await);
    sleep(Duration::from_millis(1_500)).await;

    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.step_count, 80);
    assert_eq!(snapshot.elapsed_seconds, 2);
}

#[tokio::test(start_paused = true)]
async fn test_fixes_accumulate_distance() {
    let rig = TestRig::spawn();
    rig.handle.start(ActivityType::Running).await.unwrap();
    let mut updates = rig.handle.subscribe();

    let second = north_of(ORIGIN, 12.0);
    assert!(rig.location.push(fresh_fix(ORIGIN)).await);
    assert!(rig.location.push(fresh_fix(second)).await);

    let snapshot = rig.handle.snapshot().await.unwrap();
    assert!((snapshot.distance_meters - 12.0).abs() < 1e-6);
    assert_eq!(snapshot.track_point_count, 2);
    assert_eq!(snapshot.current_position, Some(second));

    assert!(updates.has_changed().unwrap());
    let published = updates.borrow_and_update().clone();
    assert_eq!(published, rig.handle.latest());
    assert_eq!(published.track_point_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_commands_are_rejected() {
    let rig = TestRig::spawn();

    assert!(matches!(
        rig.handle.pause().await,
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        rig.handle.resume().await,
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        rig.handle.finish().await,
        Err(SessionError::InvalidTransition { .. })
    ));

    rig.handle.start(ActivityType::Running).await.unwrap();
    rig.handle.pause().await.unwrap();
    assert!(rig.handle.pause().await.is_err());
    assert_eq!(
        rig.handle.snapshot().await.unwrap().status,
        SessionStatus::Paused
    );
}

#[tokio::test(start_paused = true)]
async fn test_finish_saves_route_and_workout() {
    let rig = TestRig::spawn();
    rig.handle.start(ActivityType::Running).await.unwrap();
    rig.location.push(fresh_fix(ORIGIN)).await;
    rig.location.push(fresh_fix(north_of(ORIGIN, 50.0))).await;
    sleep(Duration::from_millis(125_500)).await;

    let receipt = rig.handle.finish().await.unwrap();

    assert_eq!(receipt.route, RouteOutcome::Saved);
    assert_eq!(receipt.workout.duration_minutes, 2);
    assert_eq!(receipt.workout.title, "GPS Running – 0.05 km");
    assert_eq!(receipt.workout.notes, "2 min 5 sec · tracked with GPS");
    assert_eq!(rig.routes.routes().await.len(), 1);
    assert_eq!(rig.workouts.entries().await.len(), 1);
    assert!(!rig.location.is_subscribed().await);
    assert!(!rig.steps.is_subscribed().await);

    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Finished);
    assert!(!snapshot.save_pending);
}

#[tokio::test(start_paused = true)]
async fn test_finish_without_fixes_skips_route() {
    let rig = TestRig::spawn();
    rig.handle.start(ActivityType::Walking).await.unwrap();

    let receipt = rig.handle.finish().await.unwrap();

    assert_eq!(receipt.route, RouteOutcome::NoRoute);
    assert_eq!(rig.routes.call_count(), 0);
    // Nothing elapsed: one minute floor, five kcal per minute fallback
    assert_eq!(receipt.workout.duration_minutes, 1);
    assert_eq!(receipt.workout.calories_burned, 5);
}

#[tokio::test(start_paused = true)]
async fn test_save_failure_then_retry() {
    let rig = TestRig::spawn();
    rig.workouts.fail_next(unavailable(), 3).await;
    rig.handle.start(ActivityType::Cycling).await.unwrap();
    rig.location.push(fresh_fix(ORIGIN)).await;
    sleep(Duration::from_secs(61)).await;

    let err = rig.handle.finish().await.unwrap_err();
    assert!(matches!(err, SessionError::SaveFailed { .. }));
    assert_eq!(rig.workouts.call_count(), 3);
    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Finished);
    assert!(snapshot.save_pending);
    assert_eq!(rig.routes.routes().await.len(), 1);

    let receipt = rig.handle.retry_save().await.unwrap();

    assert_eq!(receipt.route, RouteOutcome::AlreadySaved);
    assert_eq!(rig.routes.routes().await.len(), 1);
    assert_eq!(rig.workouts.entries().await.len(), 1);
    assert!(!rig.handle.snapshot().await.unwrap().save_pending);
    assert!(matches!(
        rig.handle.retry_save().await,
        Err(SessionError::NothingToSave)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_outbox_flush_does_not_duplicate_workout() {
    let dir = tempfile::tempdir().unwrap();
    let outbox = Outbox::open(dir.path()).await.unwrap();
    let config = common::test_config();
    let workouts = Arc::new(InMemoryWorkoutStore::new());
    let recorder = SessionRecorder::new(
        Arc::new(InMemoryRouteStore::new()),
        workouts.clone(),
        config.recorder.clone(),
    )
    .with_outbox(outbox);
    let deps = TrackingDependencies {
        location: Arc::new(ScriptedLocationProvider::new()),
        steps: Arc::new(ScriptedStepSensor::new()),
        recorder: recorder.clone(),
    };
    let handle = TrackingController::spawn(config, 70.0, deps).unwrap();
    workouts.fail_next(unavailable(), 3).await;
    handle.start(ActivityType::Walking).await.unwrap();
    assert!(matches!(
        handle.finish().await,
        Err(SessionError::SaveFailed { .. })
    ));

    assert_eq!(recorder.flush_outbox().await.unwrap().saved, 1);

    assert!(matches!(
        handle.retry_save().await,
        Err(SessionError::NothingToSave)
    ));
    assert_eq!(workouts.entries().await.len(), 1);
    assert!(!handle.snapshot().await.unwrap().save_pending);
}

#[tokio::test(start_paused = true)]
async fn test_route_failure_does_not_fail_finish() {
    let rig = TestRig::spawn();
    rig.routes.fail_next(unavailable(), 10).await;
    rig.handle.start(ActivityType::Running).await.unwrap();
    rig.location.push(fresh_fix(ORIGIN)).await;

    let receipt = rig.handle.finish().await.unwrap();

    assert!(matches!(receipt.route, RouteOutcome::Failed { .. }));
    assert!(rig.routes.routes().await.is_empty());
    assert_eq!(rig.workouts.entries().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_persists_nothing() {
    let rig = TestRig::spawn();
    rig.handle.start(ActivityType::Running).await.unwrap();
    rig.location.push(fresh_fix(ORIGIN)).await;
    rig.location.push(fresh_fix(north_of(ORIGIN, 20.0))).await;
    sleep(Duration::from_secs(5)).await;

    let snapshot = rig.handle.cancel().await.unwrap();

    assert_eq!(snapshot.status, SessionStatus::Cancelled);
    assert_eq!(snapshot.elapsed_seconds, 0);
    assert!(snapshot.distance_meters.abs() < f64::EPSILON);
    assert!(!rig.location.push(fresh_fix(ORIGIN)).await);
    assert_eq!(rig.routes.call_count(), 0);
    assert_eq!(rig.workouts.call_count(), 0);
    assert!(matches!(
        rig.handle.start(ActivityType::Running).await,
        Err(SessionError::AlreadyTerminal { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_start_fails_without_location_permission() {
    let rig = TestRig::with_sensors(ScriptedLocationProvider::denied(), ScriptedStepSensor::new());

    let err = rig.handle.start(ActivityType::Running).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::LocationUnavailable {
            source: SensorError::PermissionDenied { .. }
        }
    ));
    sleep(Duration::from_secs(3)).await;
    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Idle);
    assert_eq!(snapshot.elapsed_seconds, 0);
    assert!(!rig.steps.is_subscribed().await);
}

#[tokio::test(start_paused = true)]
async fn test_missing_step_sensor_degrades() {
    let rig = TestRig::with_sensors(
        ScriptedLocationProvider::new(),
        ScriptedStepSensor::unavailable(),
    );

    rig.handle.start(ActivityType::Walking).await.unwrap();
    sleep(Duration::from_millis(1_500)).await;

    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Active);
    assert_eq!(snapshot.step_count, 0);
    assert_eq!(snapshot.elapsed_seconds, 1);
}

#[tokio::test(start_paused = true)]
async fn test_request_current_location_shows_last_known() {
    let rig = TestRig::spawn();
    assert_eq!(rig.handle.request_current_location().await.unwrap(), None);

    rig.location.set_last_known(Some(fresh_fix(ORIGIN))).await;
    let shown = rig.handle.request_current_location().await.unwrap();

    assert_eq!(shown, Some(ORIGIN));
    let snapshot = rig.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.current_position, Some(ORIGIN));
    assert_eq!(snapshot.track_point_count, 0);
    assert!(snapshot.distance_meters.abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_request_current_location_after_cancel_rejected() {
    let rig = TestRig::spawn();
    rig.location.set_last_known(Some(fresh_fix(ORIGIN))).await;
    rig.handle.start(ActivityType::Running).await.unwrap();
    rig.handle.cancel().await.unwrap();

    assert!(matches!(
        rig.handle.request_current_location().await,
        Err(SessionError::AlreadyTerminal { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_spawn_for_profile_uses_profile_weight() {
    let routes = Arc::new(InMemoryRouteStore::new());
    let workouts = Arc::new(InMemoryWorkoutStore::new());
    let config = common::test_config();
    let deps = TrackingDependencies {
        location: Arc::new(ScriptedLocationProvider::new()),
        steps: Arc::new(ScriptedStepSensor::new()),
        recorder: SessionRecorder::new(routes, workouts, config.recorder.clone()),
    };
    let profile = StaticProfile::new(Some(100.0));

    let handle = TrackingController::spawn_for_profile(config, &profile, deps)
        .await
        .unwrap();
    handle.start(ActivityType::Cycling).await.unwrap();
    sleep(Duration::from_millis(3_600_500)).await;

    // Stationary cycling for an hour: 4.0 MET x 100 kg
    assert_eq!(handle.snapshot().await.unwrap().calories, 400);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_rejects_zero_timer_period() {
    let mut config = common::test_config();
    config.timer_period = Duration::ZERO;
    let location = Arc::new(ScriptedLocationProvider::new());
    let deps = TrackingDependencies {
        location: location.clone(),
        steps: Arc::new(ScriptedStepSensor::new()),
        recorder: SessionRecorder::new(
            Arc::new(InMemoryRouteStore::new()),
            Arc::new(InMemoryWorkoutStore::new()),
            config.recorder.clone(),
        ),
    };

    let err = TrackingController::spawn(config, 70.0, deps).err().unwrap();

    assert!(matches!(err, ConfigError::ValueOutOfRange(_)));
    assert!(!location.is_subscribed().await);
}

#[tokio::test(start_paused = true)]
async fn test_spawn_for_profile_rejects_invalid_config() {
    let mut config = common::test_config();
    config.recorder.persist_timeout = Duration::ZERO;
    let deps = TrackingDependencies {
        location: Arc::new(ScriptedLocationProvider::new()),
        steps: Arc::new(ScriptedStepSensor::new()),
        recorder: SessionRecorder::new(
            Arc::new(InMemoryRouteStore::new()),
            Arc::new(InMemoryWorkoutStore::new()),
            config.recorder.clone(),
        ),
    };

    let result =
        TrackingController::spawn_for_profile(config, &StaticProfile::new(Some(80.0)), deps).await;

    assert!(matches!(result, Err(ConfigError::ValueOutOfRange(_))));
}
