// ABOUTME: Tracking session state machine aggregating timer, location, and step events
// ABOUTME: Pure synchronous aggregate; the controller serializes every write into it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Tracking Session
//!
//! `Idle → Active ⇄ Paused → Finished | Cancelled`
//!
//! The session owns elapsed time, distance, the route polyline and the
//! step count, and folds every event through [`GeoFilter`], [`StepCounter`]
//! and [`CalorieEstimator`]. It performs no I/O and never spawns tasks:
//! [`controller::TrackingController`] drives it from a single task.
//!
//! Events arriving outside `Active` are ignored. Lifecycle calls that are
//! invalid for the current status return an error and leave every counter
//! untouched.

/// Single-owner async driver for a tracking session
pub mod controller;

pub use controller::{TrackingController, TrackingDependencies, TrackingHandle};

use chrono::{DateTime, Utc};
use stride_core::errors::SessionError;
use stride_core::models::{
    ActivityType, Coordinate, FinishedActivity, LocationFix, SessionAction, SessionSnapshot,
    SessionStatus, TrackPoint,
};
use stride_intelligence::{
    CalorieEstimate, CalorieEstimator, CalorieInput, FixOutcome, GeoFilter, GeoFilterConfig,
    StepCounter,
};
use tracing::debug;
use uuid::Uuid;

use crate::formatters::format_pace;

/// Mutable aggregate of one tracking session
#[derive(Debug, Clone)]
pub struct TrackingSession {
    id: Uuid,
    status: SessionStatus,
    activity_type: ActivityType,
    weight_kg: f64,
    started_at: Option<DateTime<Utc>>,
    elapsed_seconds: u64,
    distance_meters: f64,
    track_points: Vec<TrackPoint>,
    current_position: Option<Coordinate>,
    geo_filter: GeoFilter,
    steps: StepCounter,
    save_pending: bool,
}

impl TrackingSession {
    /// Idle session for a user weighing `weight_kg`
    #[must_use]
    pub fn new(geo_filter: GeoFilterConfig, weight_kg: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: SessionStatus::Idle,
            activity_type: ActivityType::default(),
            weight_kg,
            started_at: None,
            elapsed_seconds: 0,
            distance_meters: 0.0,
            track_points: Vec::new(),
            current_position: None,
            geo_filter: GeoFilter::new(geo_filter),
            steps: StepCounter::new(),
            save_pending: false,
        }
    }

    /// Whether `action` is valid in the current status
    ///
    /// # Errors
    ///
    /// Returns `AlreadyTerminal` for lifecycle calls on a closed session and
    /// `InvalidTransition` for any other status mismatch
    pub fn check(&self, action: SessionAction) -> Result<(), SessionError> {
        let allowed_from: &[SessionStatus] = match action {
            SessionAction::Start => &[SessionStatus::Idle],
            SessionAction::Pause => &[SessionStatus::Active],
            SessionAction::Resume => &[SessionStatus::Paused],
            SessionAction::Finish | SessionAction::Cancel => {
                &[SessionStatus::Active, SessionStatus::Paused]
            }
            SessionAction::RetrySave => &[SessionStatus::Finished],
        };
        if allowed_from.contains(&self.status) {
            Ok(())
        } else if self.status.is_terminal() {
            Err(SessionError::AlreadyTerminal {
                status: self.status,
            })
        } else {
            Err(SessionError::invalid(self.status, action))
        }
    }

    fn transition(&mut self, action: SessionAction, to: SessionStatus) -> Result<(), SessionError> {
        self.check(action)?;
        self.status = to;
        Ok(())
    }

    fn clear_progress(&mut self) {
        self.elapsed_seconds = 0;
        self.distance_meters = 0.0;
        self.track_points.clear();
        self.current_position = None;
        self.geo_filter.reset();
        self.steps.reset();
    }

    /// Begin tracking `activity_type` from zeroed counters
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Idle`
    pub fn start(
        &mut self,
        activity_type: ActivityType,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.transition(SessionAction::Start, SessionStatus::Active)?;
        self.clear_progress();
        self.activity_type = activity_type;
        self.started_at = Some(now);
        Ok(())
    }

    /// Freeze the counters
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Active`
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.transition(SessionAction::Pause, SessionStatus::Paused)
    }

    /// Continue from the frozen counters
    ///
    /// The filter's reference fix and the step baseline are kept, so the
    /// first fix after a resume is measured from the pre-pause position.
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Paused`
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.transition(SessionAction::Resume, SessionStatus::Active)
    }

    /// Discard everything accumulated; nothing is persisted
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Active` or `Paused`
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.transition(SessionAction::Cancel, SessionStatus::Cancelled)?;
        self.clear_progress();
        Ok(())
    }

    /// Close the session and package its result
    ///
    /// # Errors
    ///
    /// Returns an error unless the session is `Active` or `Paused`
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<FinishedActivity, SessionError> {
        self.transition(SessionAction::Finish, SessionStatus::Finished)?;

        Ok(FinishedActivity {
            session_id: self.id,
            activity_type: self.activity_type,
            start_coordinate: self.track_points.first().map(TrackPoint::coordinate),
            end_coordinate: self.track_points.last().map(TrackPoint::coordinate),
            track_points: self.track_points.clone(),
            distance_km: self.distance_km(),
            duration_seconds: self.elapsed_seconds,
            step_count: self.steps.steps(),
            calories_burned: self.calories(),
            started_at: self.started_at.unwrap_or(now),
            finished_at: now,
        })
    }

    /// Advance the timer by one second; ignored unless `Active`
    pub fn tick(&mut self) -> bool {
        self.advance(1)
    }

    /// Advance the timer by `seconds` at once, saturating; ignored unless `Active`
    pub fn advance(&mut self, seconds: u64) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(seconds);
        true
    }

    /// Fold a location fix; `None` when the session is not `Active`
    pub fn apply_fix(&mut self, fix: &LocationFix, now: DateTime<Utc>) -> Option<FixOutcome> {
        if self.status != SessionStatus::Active {
            return None;
        }

        let outcome = self.geo_filter.evaluate(fix, now);
        if outcome.is_retained() {
            self.track_points.push(TrackPoint::from(fix));
            self.current_position = Some(fix.coordinate());
            self.distance_meters += outcome.distance_delta();
        }
        debug!(
            session.id = %self.id,
            ?outcome,
            distance_meters = self.distance_meters,
            "location fix applied"
        );
        Some(outcome)
    }

    /// Fold a cumulative step reading; `None` when the session is not `Active`
    pub fn apply_step_reading(&mut self, raw: u64) -> Option<u64> {
        if self.status != SessionStatus::Active {
            return None;
        }
        Some(self.steps.on_reading(raw))
    }

    /// Stop expecting step readings; the count stays where it is
    pub fn mark_steps_unavailable(&mut self) {
        self.steps.mark_unavailable();
    }

    /// Show a position without touching distance or the route
    ///
    /// Returns `false` once the session is terminal.
    pub fn show_position(&mut self, coordinate: Coordinate) -> bool {
        if self.status.is_terminal() || !coordinate.is_valid() {
            return false;
        }
        self.current_position = Some(coordinate);
        true
    }

    /// Record whether a finished activity still awaits a successful save
    pub fn set_save_pending(&mut self, pending: bool) {
        self.save_pending = pending;
    }

    /// Live calorie estimate with its intermediate values
    #[must_use]
    pub fn calorie_estimate(&self) -> CalorieEstimate {
        CalorieEstimator::estimate(&CalorieInput {
            activity_type: self.activity_type,
            elapsed_seconds: self.elapsed_seconds,
            distance_meters: self.distance_meters,
            step_count: self.steps.steps(),
            weight_kg: self.weight_kg,
        })
    }

    /// Live calorie estimate (kcal)
    #[must_use]
    pub fn calories(&self) -> u32 {
        self.calorie_estimate().calories
    }

    /// Observable view of the current state
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let estimate = self.calorie_estimate();
        SessionSnapshot {
            session_id: self.id,
            status: self.status,
            activity_type: self.activity_type,
            started_at: self.started_at,
            elapsed_seconds: self.elapsed_seconds,
            distance_meters: self.distance_meters,
            step_count: self.steps.steps(),
            track_point_count: self.track_points.len(),
            current_position: self.current_position,
            calories: estimate.calories,
            speed_kmh: estimate.speed_kmh,
            pace: format_pace(self.elapsed_seconds, self.distance_km()),
            save_pending: self.save_pending,
        }
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Lifecycle status
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Tracked activity
    #[must_use]
    pub const fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    /// Body weight used for calories (kilograms)
    #[must_use]
    pub const fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Timer seconds
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Filtered distance (meters)
    #[must_use]
    pub const fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Filtered distance (kilometers)
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Steps since the baseline
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.steps.steps()
    }

    /// Whether step readings are expected
    #[must_use]
    pub const fn steps_available(&self) -> bool {
        self.steps.is_available()
    }

    /// Route polyline in arrival order
    #[must_use]
    pub fn track_points(&self) -> &[TrackPoint] {
        &self.track_points
    }

    /// Last displayed position
    #[must_use]
    pub const fn current_position(&self) -> Option<Coordinate> {
        self.current_position
    }
}
