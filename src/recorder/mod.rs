// ABOUTME: Session recorder packaging finished activities into route and workout records
// ABOUTME: Persists both with timeouts and retries; workout failures park the activity in an outbox
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Session Recorder
//!
//! A finished activity produces up to two records:
//!
//! - a [`RouteRecord`], only when at least one location fix was retained
//! - a [`WorkoutEntry`], always, even for a step-only indoor session
//!
//! The two calls run concurrently. A failed route call is logged and
//! swallowed. The workout call decides whether the session counts as
//! saved; when it fails the activity stays pending (and is parked in the
//! outbox when one is configured) so it can be submitted again.
//!
//! A parked entry is claimed by deleting its outbox file before it is
//! re-submitted. [`SessionRecorder::flush_outbox`] and
//! [`SessionRecorder::resubmit`] both claim first, so only one of them
//! sends the workout entry.

/// Durable outbox for pending saves
pub mod outbox;
/// Persistence collaborator contracts and in-memory implementations
pub mod stores;

pub use outbox::Outbox;
pub use stores::{InMemoryRouteStore, InMemoryWorkoutStore, RouteStore, WorkoutStore};

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stride_core::constants::calories::FALLBACK_KCAL_PER_MINUTE;
use stride_core::constants::persistence::{MIN_WORKOUT_MINUTES, WORKOUT_CATEGORY};
use stride_core::errors::PersistenceError;
use stride_core::models::{FinishedActivity, RouteRecord, TrackPoint, WorkoutEntry};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::RecorderConfig;
use crate::formatters::{duration_note, format_distance_km};
use crate::logging::TrackingLogger;

/// Route record for an activity, or `None` when no fix was retained
#[must_use]
pub fn build_route_record(activity: &FinishedActivity) -> Option<RouteRecord> {
    let start = activity.start_coordinate?;
    let coordinates: Vec<[f64; 4]> = activity
        .track_points
        .iter()
        .map(TrackPoint::as_array)
        .collect();
    let coordinates_json = serde_json::to_string(&coordinates).unwrap_or_else(|_| "[]".to_owned());

    Some(RouteRecord {
        activity_type: activity.activity_type,
        start_latitude: start.latitude,
        start_longitude: start.longitude,
        end_latitude: activity.end_coordinate.map(|end| end.latitude),
        end_longitude: activity.end_coordinate.map(|end| end.longitude),
        coordinates,
        coordinates_json,
        distance_km: activity.distance_km,
        duration_seconds: activity.duration_seconds,
        calories_burned: activity.calories_burned,
        started_at: activity.started_at,
        finished_at: activity.finished_at,
    })
}

/// Workout history entry for an activity
///
/// Duration is whole minutes with a floor of one. When the estimator
/// produced no calories, five per minute are credited instead.
#[must_use]
pub fn build_workout_entry(activity: &FinishedActivity) -> WorkoutEntry {
    let duration_minutes = u32::try_from(activity.duration_seconds / 60)
        .unwrap_or(u32::MAX)
        .max(MIN_WORKOUT_MINUTES);
    let calories_burned = if activity.calories_burned > 0 {
        activity.calories_burned
    } else {
        duration_minutes.saturating_mul(FALLBACK_KCAL_PER_MINUTE)
    };

    WorkoutEntry {
        title: format!(
            "GPS {} – {} km",
            activity.activity_type.display_name(),
            format_distance_km(activity.distance_km)
        ),
        category: WORKOUT_CATEGORY.to_owned(),
        duration_minutes,
        calories_burned,
        notes: format!(
            "{} · tracked with GPS",
            duration_note(activity.duration_seconds)
        ),
        date: activity.finished_at.date_naive(),
    }
}

/// A finished activity that has not been confirmed saved yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSave {
    /// Activity to persist
    pub activity: FinishedActivity,
    /// The route record still has to be sent
    pub route_pending: bool,
    /// This holder wrote the save to the outbox
    #[serde(skip)]
    pub parked: bool,
}

impl PendingSave {
    /// Fresh pending save; the route is pending only if one exists
    #[must_use]
    pub fn new(activity: FinishedActivity) -> Self {
        let route_pending = activity.has_route();
        Self {
            activity,
            route_pending,
            parked: false,
        }
    }
}

/// What happened to the route record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RouteOutcome {
    /// Stored in this submission
    Saved,
    /// No fix was retained, so there is no route
    NoRoute,
    /// Stored by an earlier submission
    AlreadySaved,
    /// Every attempt failed; the failure does not fail the save
    Failed {
        /// Last error message
        reason: String,
    },
}

/// Confirmation of a saved session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Session the records came from
    pub session_id: Uuid,
    /// Identifier assigned by the workout store
    pub workout_id: String,
    /// Workout entry as stored
    pub workout: WorkoutEntry,
    /// Route record outcome
    pub route: RouteOutcome,
}

/// Result of re-submitting the outbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushReport {
    /// Entries saved and removed from the outbox
    pub saved: usize,
    /// Entries still waiting
    pub remaining: usize,
}

/// Persists finished activities through the route and workout stores
#[derive(Clone)]
pub struct SessionRecorder {
    routes: Arc<dyn RouteStore>,
    workouts: Arc<dyn WorkoutStore>,
    config: RecorderConfig,
    outbox: Option<Outbox>,
}

impl SessionRecorder {
    /// Recorder without an outbox
    #[must_use]
    pub fn new(
        routes: Arc<dyn RouteStore>,
        workouts: Arc<dyn WorkoutStore>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            routes,
            workouts,
            config,
            outbox: None,
        }
    }

    /// Recorder with the outbox named by `config.outbox_dir`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the outbox directory cannot be created
    pub async fn from_config(
        routes: Arc<dyn RouteStore>,
        workouts: Arc<dyn WorkoutStore>,
        config: RecorderConfig,
    ) -> Result<Self, PersistenceError> {
        let outbox = match &config.outbox_dir {
            Some(dir) => Some(Outbox::open(dir.clone()).await?),
            None => None,
        };
        Ok(Self {
            routes,
            workouts,
            config,
            outbox,
        })
    }

    /// Attach an outbox
    #[must_use]
    pub fn with_outbox(mut self, outbox: Outbox) -> Self {
        self.outbox = Some(outbox);
        self
    }

    /// Outbox in use, if any
    #[must_use]
    pub const fn outbox(&self) -> Option<&Outbox> {
        self.outbox.as_ref()
    }

    /// Persist a freshly finished activity
    ///
    /// # Errors
    ///
    /// Returns the workout store's error when the workout entry could not be saved
    pub async fn record(
        &self,
        activity: FinishedActivity,
    ) -> Result<SaveReceipt, PersistenceError> {
        let mut pending = PendingSave::new(activity);
        self.submit(&mut pending).await
    }

    /// Persist a pending save, updating its route flag
    ///
    /// On failure `pending` still describes what is left to do and, with an
    /// outbox configured, has been written to it.
    ///
    /// # Errors
    ///
    /// Returns the workout store's error when the workout entry could not be saved
    pub async fn submit(&self, pending: &mut PendingSave) -> Result<SaveReceipt, PersistenceError> {
        let session_id = pending.activity.session_id;
        let entry = build_workout_entry(&pending.activity);

        let (route, workout) = tokio::join!(
            self.save_route(pending),
            self.save_workout(session_id, &entry)
        );
        pending.route_pending = matches!(route, RouteOutcome::Failed { .. });

        match workout {
            Ok(workout_id) => {
                pending.parked = false;
                if let Some(outbox) = &self.outbox {
                    if let Err(e) = outbox.remove(session_id).await {
                        warn!(session.id = %session_id, error = %e, "failed to clear outbox entry");
                    }
                }
                Ok(SaveReceipt {
                    session_id,
                    workout_id,
                    workout: entry,
                    route,
                })
            }
            Err(e) => {
                error!(session.id = %session_id, error = %e, "session could not be saved");
                if let Some(outbox) = &self.outbox {
                    pending.parked = match outbox.enqueue(pending).await {
                        Ok(_) => true,
                        Err(outbox_error) => {
                            error!(
                                session.id = %session_id,
                                error = %outbox_error,
                                "failed to park activity in outbox"
                            );
                            false
                        }
                    };
                }
                Err(e)
            }
        }
    }

    /// Submit a save that failed before
    ///
    /// A save this holder parked in the outbox is claimed first. `Ok(None)`
    /// means the entry was already claimed by [`Self::flush_outbox`], which
    /// owns sending it.
    ///
    /// # Errors
    ///
    /// Returns the workout store's error when the workout entry could not be
    /// saved, or a storage error when the outbox entry cannot be claimed
    pub async fn resubmit(
        &self,
        pending: &mut PendingSave,
    ) -> Result<Option<SaveReceipt>, PersistenceError> {
        if let (true, Some(outbox)) = (pending.parked, &self.outbox) {
            let session_id = pending.activity.session_id;
            if !outbox.remove(session_id).await? {
                debug!(session.id = %session_id, "outbox entry already claimed by a flush");
                pending.parked = false;
                return Ok(None);
            }
        }
        self.submit(pending).await.map(Some)
    }

    /// Re-submit every outbox entry
    ///
    /// Entries failing again are parked once more and counted as remaining.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbox cannot be read
    pub async fn flush_outbox(&self) -> Result<FlushReport, PersistenceError> {
        let Some(outbox) = &self.outbox else {
            return Ok(FlushReport::default());
        };

        let mut report = FlushReport::default();
        for mut pending in outbox.pending().await? {
            let session_id = pending.activity.session_id;
            match outbox.remove(session_id).await {
                Ok(true) => {}
                // Claimed by a concurrent resubmit
                Ok(false) => continue,
                Err(e) => {
                    warn!(session.id = %session_id, error = %e, "cannot claim outbox entry");
                    report.remaining += 1;
                    continue;
                }
            }
            match self.submit(&mut pending).await {
                Ok(_) => report.saved += 1,
                Err(_) => report.remaining += 1,
            }
        }
        Ok(report)
    }

    async fn save_route(&self, pending: &PendingSave) -> RouteOutcome {
        if !pending.activity.has_route() {
            return RouteOutcome::NoRoute;
        }
        if !pending.route_pending {
            return RouteOutcome::AlreadySaved;
        }
        let Some(record) = build_route_record(&pending.activity) else {
            return RouteOutcome::NoRoute;
        };

        let routes = self.routes.as_ref();
        let record = &record;
        match self
            .call_with_retry("route", pending.activity.session_id, move || {
                routes.save_route(record)
            })
            .await
        {
            Ok(()) => RouteOutcome::Saved,
            Err(e) => {
                warn!(
                    session.id = %pending.activity.session_id,
                    error = %e,
                    "route record not saved; continuing with workout entry"
                );
                RouteOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn save_workout(
        &self,
        session_id: Uuid,
        entry: &WorkoutEntry,
    ) -> Result<String, PersistenceError> {
        let workouts = self.workouts.as_ref();
        self.call_with_retry("workout", session_id, move || {
            workouts.create_workout(entry)
        })
        .await
    }

    /// Run `call` under the per-call timeout, retrying retryable failures
    /// with exponential backoff
    async fn call_with_retry<T, F, Fut>(
        &self,
        target: &'static str,
        session_id: Uuid,
        call: F,
    ) -> Result<T, PersistenceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PersistenceError>>,
    {
        let mut backoff = self.config.initial_backoff;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let result = timeout(self.config.persist_timeout, call())
                .await
                .unwrap_or_else(|_| {
                    Err(PersistenceError::Timeout {
                        seconds: self.config.persist_timeout.as_secs(),
                    })
                });

            match result {
                Ok(value) => {
                    TrackingLogger::log_persistence(session_id, target, true, attempt, None);
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt <= self.config.max_retries => {
                    let max_retries = self.config.max_retries;
                    warn!(
                        session.id = %session_id,
                        error = %e,
                        "{target} save failed, retry {attempt}/{max_retries} after {backoff:?}"
                    );
                    sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => {
                    TrackingLogger::log_persistence(
                        session_id,
                        target,
                        false,
                        attempt,
                        Some(&e.to_string()),
                    );
                    return Err(e);
                }
            }
        }
    }
}
