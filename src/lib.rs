// ABOUTME: Main library entry point for the Stride live activity tracker
// ABOUTME: Session state machine, async controller, sensor contracts, and session recording
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

#![deny(unsafe_code)]

//! # Stride Tracker
//!
//! Live GPS activity tracking: records a route in real time, fuses it with
//! the device step counter, computes live distance, speed, pace and
//! calories, supports pause/resume, and commits the finished session as a
//! route record plus a workout entry.
//!
//! ## Architecture
//!
//! - **Session**: [`session::TrackingSession`] is a plain state machine;
//!   [`session::TrackingController`] owns it inside one task and serializes
//!   the timer, location stream, step stream and caller commands
//! - **Sensors**: provider traits the controller subscribes and tears down
//! - **Recorder**: packages a finished activity and persists it with
//!   timeouts, retries and a durable outbox
//! - **Algorithms**: fix filtering, step normalization and calorie
//!   estimation live in `stride-intelligence`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stride_tracker::config::TrackingConfig;
//! use stride_tracker::models::ActivityType;
//! use stride_tracker::recorder::{InMemoryRouteStore, InMemoryWorkoutStore, SessionRecorder};
//! use stride_tracker::sensors::{ScriptedLocationProvider, ScriptedStepSensor};
//! use stride_tracker::session::{TrackingController, TrackingDependencies};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrackingConfig::from_env()?;
//! let recorder = SessionRecorder::new(
//!     Arc::new(InMemoryRouteStore::new()),
//!     Arc::new(InMemoryWorkoutStore::new()),
//!     config.recorder.clone(),
//! );
//! let deps = TrackingDependencies {
//!     location: Arc::new(ScriptedLocationProvider::new()),
//!     steps: Arc::new(ScriptedStepSensor::new()),
//!     recorder,
//! };
//!
//! let handle = TrackingController::spawn(config, 70.0, deps)?;
//! handle.start(ActivityType::Running).await?;
//! let receipt = handle.finish().await?;
//! println!("saved workout {}", receipt.workout_id);
//! # Ok(())
//! # }
//! ```

/// Runtime configuration loaded from the environment
pub mod config;

/// Elapsed time, pace, and duration formatting
pub mod formatters;

/// Structured logging setup
pub mod logging;

/// User profile lookup for body weight
pub mod profile;

/// Finished-session persistence
pub mod recorder;

/// Offline replay of recorded sensor scripts
pub mod replay;

/// Location and step sensor contracts
pub mod sensors;

/// Tracking session state machine and controller
pub mod session;

pub use stride_core::{constants, errors, models};
pub use stride_intelligence as intelligence;
