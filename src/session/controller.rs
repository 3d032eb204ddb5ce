// ABOUTME: Single-owner async task serializing timer, location, step, and command events
// ABOUTME: Publishes a snapshot after every mutation and tears sensors down when sampling stops
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Tracking Controller
//!
//! One spawned task owns the [`TrackingSession`]. Callers talk to it
//! through a cloneable [`TrackingHandle`]; every request is a message with a
//! oneshot reply, and every state change is published on a watch channel.
//!
//! The task waits on four sources at once: the 1 s timer, the location
//! channel, the step channel and the command channel. Sources that are not
//! running are `None` and never fire. Pausing, cancelling or finishing
//! drops the timer and both sensor receivers and unsubscribes the
//! providers before the reply is sent.

use std::future;
use std::sync::Arc;

use chrono::Utc;
use stride_core::constants::timing::{COMMAND_CHANNEL_CAPACITY, SENSOR_CHANNEL_CAPACITY};
use stride_core::errors::{PersistenceError, SessionError};
use stride_core::models::{
    ActivityType, Coordinate, LocationFix, SessionAction, SessionSnapshot, SessionStatus,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, info_span, trace, warn, Instrument};

use super::TrackingSession;
use crate::config::{ConfigError, TrackingConfig};
use crate::logging::TrackingLogger;
use crate::profile::{resolve_weight_kg, UserProfileService};
use crate::recorder::{PendingSave, SaveReceipt, SessionRecorder};
use crate::sensors::{LocationProvider, StepSensor};

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

enum Command {
    Start {
        activity_type: ActivityType,
        reply: Reply<SessionSnapshot>,
    },
    Pause {
        reply: Reply<SessionSnapshot>,
    },
    Resume {
        reply: Reply<SessionSnapshot>,
    },
    Cancel {
        reply: Reply<SessionSnapshot>,
    },
    Finish {
        reply: Reply<SaveReceipt>,
    },
    RetrySave {
        reply: Reply<SaveReceipt>,
    },
    RequestCurrentLocation {
        reply: Reply<Option<Coordinate>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

enum Event {
    Command(Option<Command>),
    Fix(Option<LocationFix>),
    Steps(Option<u64>),
    Tick,
}

/// Collaborators a controller drives
#[derive(Clone)]
pub struct TrackingDependencies {
    /// Location fix source
    pub location: Arc<dyn LocationProvider>,
    /// Cumulative step counter source
    pub steps: Arc<dyn StepSensor>,
    /// Persistence for finished sessions
    pub recorder: SessionRecorder,
}

/// Cloneable client of a running controller
#[derive(Clone)]
pub struct TrackingHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl TrackingHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SessionError::ControllerStopped)?;
        response.await.map_err(|_| SessionError::ControllerStopped)
    }

    /// Start tracking `activity_type`
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not idle or location updates cannot start
    pub async fn start(
        &self,
        activity_type: ActivityType,
    ) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Start {
            activity_type,
            reply,
        })
        .await?
    }

    /// Pause tracking
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not active
    pub async fn pause(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Pause { reply }).await?
    }

    /// Resume a paused session
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not paused
    pub async fn resume(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Resume { reply }).await?
    }

    /// Discard the session without saving
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not active or paused
    pub async fn cancel(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Cancel { reply }).await?
    }

    /// Finish the session and wait for persistence
    ///
    /// # Errors
    ///
    /// Returns `SaveFailed` when the workout entry could not be saved; the
    /// activity is kept and [`Self::retry_save`] may be called.
    pub async fn finish(&self) -> Result<SaveReceipt, SessionError> {
        self.request(|reply| Command::Finish { reply }).await?
    }

    /// Submit a finished activity whose save failed again
    ///
    /// # Errors
    ///
    /// Returns `NothingToSave` if no save is pending, or `SaveFailed` again
    pub async fn retry_save(&self) -> Result<SaveReceipt, SessionError> {
        self.request(|reply| Command::RetrySave { reply }).await?
    }

    /// Show the platform's last known location without affecting distance
    ///
    /// # Errors
    ///
    /// Returns an error once the session is finished or cancelled
    pub async fn request_current_location(&self) -> Result<Option<Coordinate>, SessionError> {
        self.request(|reply| Command::RequestCurrentLocation { reply })
            .await?
    }

    /// Snapshot taken after every event queued before this call was handled
    ///
    /// # Errors
    ///
    /// Returns an error if the controller has stopped
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Most recently published snapshot
    #[must_use]
    pub fn latest(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every session mutation
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }
}

/// Owner of one tracking session
pub struct TrackingController {
    session: TrackingSession,
    config: TrackingConfig,
    deps: TrackingDependencies,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
    timer: Option<Interval>,
    fixes: Option<mpsc::Receiver<LocationFix>>,
    step_readings: Option<mpsc::Receiver<u64>>,
    pending: Option<PendingSave>,
}

impl TrackingController {
    /// Spawn a controller for a user weighing `weight_kg`
    ///
    /// The task stops once every handle has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation; nothing is spawned
    pub fn spawn(
        config: TrackingConfig,
        weight_kg: f64,
        deps: TrackingDependencies,
    ) -> Result<TrackingHandle, ConfigError> {
        config.validate()?;

        let session = TrackingSession::new(config.geo_filter.clone(), weight_kg);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let span = info_span!("tracking_session", session.id = %session.id());

        let controller = Self {
            session,
            config,
            deps,
            commands: command_rx,
            snapshots: snapshot_tx,
            timer: None,
            fixes: None,
            step_readings: None,
            pending: None,
        };
        tokio::spawn(controller.run().instrument(span));

        Ok(TrackingHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        })
    }

    /// Resolve the user's weight once, then spawn
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation
    pub async fn spawn_for_profile(
        config: TrackingConfig,
        profile: &dyn UserProfileService,
        deps: TrackingDependencies,
    ) -> Result<TrackingHandle, ConfigError> {
        config.validate()?;
        let weight_kg = resolve_weight_kg(profile, config.default_weight_kg).await;
        Self::spawn(config, weight_kg, deps)
    }

    async fn run(mut self) {
        debug!("tracking controller running");
        loop {
            let event = tokio::select! {
                biased;
                fix = next_item(&mut self.fixes) => Event::Fix(fix),
                raw = next_item(&mut self.step_readings) => Event::Steps(raw),
                () = next_tick(&mut self.timer) => Event::Tick,
                command = self.commands.recv() => Event::Command(command),
            };

            match event {
                Event::Command(Some(command)) => self.handle_command(command).await,
                Event::Command(None) => break,
                Event::Fix(Some(fix)) => {
                    if let Some(outcome) = self.session.apply_fix(&fix, Utc::now()) {
                        trace!(?outcome, "fix folded");
                        self.publish();
                    }
                }
                Event::Fix(None) => {
                    warn!("location provider closed its stream");
                    self.fixes = None;
                }
                Event::Steps(Some(raw)) => {
                    if self.session.apply_step_reading(raw).is_some() {
                        self.publish();
                    }
                }
                Event::Steps(None) => {
                    warn!("step sensor closed its stream");
                    self.step_readings = None;
                }
                Event::Tick => {
                    if self.session.tick() {
                        self.publish();
                    }
                }
            }
        }

        self.stop_sampling().await;
        debug!("tracking controller stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start {
                activity_type,
                reply,
            } => {
                let result = self.start(activity_type).await;
                self.respond(SessionAction::Start, reply, result);
            }
            Command::Pause { reply } => {
                let result = self.pause().await;
                self.respond(SessionAction::Pause, reply, result);
            }
            Command::Resume { reply } => {
                let result = self.resume().await;
                self.respond(SessionAction::Resume, reply, result);
            }
            Command::Cancel { reply } => {
                let result = self.cancel().await;
                self.respond(SessionAction::Cancel, reply, result);
            }
            Command::Finish { reply } => {
                let result = self.finish().await;
                self.respond(SessionAction::Finish, reply, result);
            }
            Command::RetrySave { reply } => {
                let result = self.retry_save().await;
                self.respond(SessionAction::RetrySave, reply, result);
            }
            Command::RequestCurrentLocation { reply } => {
                let result = self.request_current_location().await;
                if reply.send(result).is_err() {
                    debug!("location requester went away");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.session.snapshot()).is_err() {
                    debug!("snapshot requester went away");
                }
            }
        }
    }

    fn respond<T>(&self, action: SessionAction, reply: Reply<T>, result: Result<T, SessionError>) {
        if let Err(e) = &result {
            if !matches!(e, SessionError::SaveFailed { .. }) {
                TrackingLogger::log_rejected_command(
                    self.session.id(),
                    action,
                    self.session.status(),
                    &e.to_string(),
                );
            }
        }
        if reply.send(result).is_err() {
            debug!(%action, "caller went away before the reply");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }

    fn log_transition(&self, action: SessionAction, from: SessionStatus) {
        TrackingLogger::log_transition(self.session.id(), action, from, self.session.status());
    }

    async fn start(
        &mut self,
        activity_type: ActivityType,
    ) -> Result<SessionSnapshot, SessionError> {
        self.session.check(SessionAction::Start)?;

        // Location access is a precondition of an active session
        let fixes = self.subscribe_location().await?;
        let from = self.session.status();
        if let Err(e) = self.session.start(activity_type, Utc::now()) {
            self.deps.location.unsubscribe().await;
            return Err(e);
        }
        self.fixes = Some(fixes);
        self.subscribe_steps().await;
        self.start_timer();

        info!(activity = %activity_type, "tracking started");
        self.log_transition(SessionAction::Start, from);
        self.publish();
        Ok(self.session.snapshot())
    }

    async fn pause(&mut self) -> Result<SessionSnapshot, SessionError> {
        let from = self.session.status();
        self.session.pause()?;
        self.stop_sampling().await;

        self.log_transition(SessionAction::Pause, from);
        self.publish();
        Ok(self.session.snapshot())
    }

    async fn resume(&mut self) -> Result<SessionSnapshot, SessionError> {
        let from = self.session.status();
        self.session.resume()?;

        match self.subscribe_location().await {
            Ok(fixes) => self.fixes = Some(fixes),
            Err(e) => warn!(error = %e, "location updates unavailable after resume"),
        }
        self.subscribe_steps().await;
        self.start_timer();

        self.log_transition(SessionAction::Resume, from);
        self.publish();
        Ok(self.session.snapshot())
    }

    async fn cancel(&mut self) -> Result<SessionSnapshot, SessionError> {
        let from = self.session.status();
        self.session.cancel()?;
        self.stop_sampling().await;

        self.log_transition(SessionAction::Cancel, from);
        self.publish();
        Ok(self.session.snapshot())
    }

    async fn finish(&mut self) -> Result<SaveReceipt, SessionError> {
        let from = self.session.status();
        let activity = self.session.finish(Utc::now())?;
        self.stop_sampling().await;
        self.log_transition(SessionAction::Finish, from);

        info!(
            distance_km = activity.distance_km,
            duration_seconds = activity.duration_seconds,
            steps = activity.step_count,
            calories = activity.calories_burned,
            "tracking finished"
        );

        self.session.set_save_pending(true);
        self.publish();
        self.save(PendingSave::new(activity)).await
    }

    async fn retry_save(&mut self) -> Result<SaveReceipt, SessionError> {
        self.session.check(SessionAction::RetrySave)?;
        let mut pending = self.pending.take().ok_or(SessionError::NothingToSave)?;

        let result = self.deps.recorder.resubmit(&mut pending).await;
        match result {
            Ok(Some(receipt)) => self.settle(pending, Ok(receipt)),
            Ok(None) => {
                info!("pending save was taken over by an outbox flush");
                self.session.set_save_pending(false);
                self.publish();
                Err(SessionError::NothingToSave)
            }
            Err(source) => self.settle(pending, Err(source)),
        }
    }

    async fn save(&mut self, mut pending: PendingSave) -> Result<SaveReceipt, SessionError> {
        let result = self.deps.recorder.submit(&mut pending).await;
        self.settle(pending, result)
    }

    fn settle(
        &mut self,
        pending: PendingSave,
        result: Result<SaveReceipt, PersistenceError>,
    ) -> Result<SaveReceipt, SessionError> {
        let outcome = match result {
            Ok(receipt) => {
                self.pending = None;
                self.session.set_save_pending(false);
                Ok(receipt)
            }
            Err(source) => {
                self.pending = Some(pending);
                self.session.set_save_pending(true);
                Err(SessionError::SaveFailed { source })
            }
        };
        self.publish();
        outcome
    }

    async fn request_current_location(&mut self) -> Result<Option<Coordinate>, SessionError> {
        let status = self.session.status();
        if status.is_terminal() {
            return Err(SessionError::AlreadyTerminal { status });
        }

        let coordinate = self
            .deps
            .location
            .last_known_location()
            .await
            .map(|fix| fix.coordinate());
        match coordinate {
            Some(position) if self.session.show_position(position) => {
                self.publish();
                Ok(Some(position))
            }
            _ => Ok(None),
        }
    }

    async fn subscribe_location(&self) -> Result<mpsc::Receiver<LocationFix>, SessionError> {
        let (sink, fixes) = mpsc::channel(SENSOR_CHANNEL_CAPACITY);
        self.deps
            .location
            .subscribe(self.config.location_request, sink)
            .await?;
        Ok(fixes)
    }

    async fn subscribe_steps(&mut self) {
        if !self.session.steps_available() {
            return;
        }
        let (sink, readings) = mpsc::channel(SENSOR_CHANNEL_CAPACITY);
        match self.deps.steps.subscribe(sink).await {
            Ok(()) => self.step_readings = Some(readings),
            Err(e) => {
                warn!(error = %e, "step counter unavailable; steps stay at zero");
                self.session.mark_steps_unavailable();
            }
        }
    }

    fn start_timer(&mut self) {
        let period = self.config.timer_period;
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.timer = Some(timer);
    }

    /// Drop the timer and both receivers, then release the providers
    async fn stop_sampling(&mut self) {
        self.timer = None;
        if self.fixes.take().is_some() {
            self.deps.location.unsubscribe().await;
        }
        if self.step_readings.take().is_some() {
            self.deps.steps.unsubscribe().await;
        }
    }
}

async fn next_item<T>(receiver: &mut Option<mpsc::Receiver<T>>) -> Option<T> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => future::pending().await,
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => future::pending().await,
    }
}
