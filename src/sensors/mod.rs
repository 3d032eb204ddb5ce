// ABOUTME: Platform sensor abstractions feeding location fixes and step readings
// ABOUTME: Providers push into channels owned by the session controller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Sensor Providers
//!
//! The controller owns the receiving end of every sensor channel. A
//! provider gets the sending end on subscribe and must stop using it on
//! unsubscribe. Dropping the receiver during teardown closes the channel,
//! so a provider that keeps sending after unsubscribe only sees send
//! errors: no event can reach a paused, cancelled, or finished session.

/// In-process providers driven by tests, replay scripts, and benches
pub mod scripted;

pub use scripted::{ScriptedLocationProvider, ScriptedStepSensor};

use async_trait::async_trait;
use stride_core::errors::SensorError;
use stride_core::models::LocationFix;
use tokio::sync::mpsc;

use crate::config::LocationRequestConfig;

/// Source of location fixes (GPS, fused provider)
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Start delivering fixes into `sink`
    ///
    /// # Errors
    ///
    /// Returns an error if location access is unavailable or denied
    async fn subscribe(
        &self,
        request: LocationRequestConfig,
        sink: mpsc::Sender<LocationFix>,
    ) -> Result<(), SensorError>;

    /// Stop delivering fixes and release the sink
    async fn unsubscribe(&self);

    /// Most recent fix known to the platform, if any
    async fn last_known_location(&self) -> Option<LocationFix>;
}

/// Source of cumulative hardware step counts
#[async_trait]
pub trait StepSensor: Send + Sync {
    /// Start delivering raw cumulative readings into `sink`
    ///
    /// # Errors
    ///
    /// Returns an error if the device has no step counter or access is denied
    async fn subscribe(&self, sink: mpsc::Sender<u64>) -> Result<(), SensorError>;

    /// Stop delivering readings and release the sink
    async fn unsubscribe(&self);
}
