// ABOUTME: In-process location and step sensors that deliver caller-supplied events
// ABOUTME: Used for replaying recorded sessions and for deterministic tests and benches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use stride_core::errors::{SensorError, SensorKind};
use stride_core::models::LocationFix;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::{LocationProvider, StepSensor};
use crate::config::LocationRequestConfig;

/// Location provider whose fixes are pushed by the caller
#[derive(Debug, Default)]
pub struct ScriptedLocationProvider {
    sink: Mutex<Option<mpsc::Sender<LocationFix>>>,
    last_known: Mutex<Option<LocationFix>>,
    last_request: Mutex<Option<LocationRequestConfig>>,
    subscriptions: AtomicUsize,
    permission_denied: bool,
}

impl ScriptedLocationProvider {
    /// Provider with location permission granted
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that refuses every subscription
    #[must_use]
    pub fn denied() -> Self {
        Self {
            permission_denied: true,
            ..Self::default()
        }
    }

    /// Seed the platform's last known location
    pub async fn set_last_known(&self, fix: Option<LocationFix>) {
        *self.last_known.lock().await = fix;
    }

    /// Deliver a fix to the current subscriber
    ///
    /// Returns `false` when nobody is subscribed or the subscriber has gone away.
    pub async fn push(&self, fix: LocationFix) -> bool {
        *self.last_known.lock().await = Some(fix);
        let sink = self.sink.lock().await.clone();
        match sink {
            Some(sender) => sender.send(fix).await.is_ok(),
            None => false,
        }
    }

    /// A subscriber currently holds the sink
    pub async fn is_subscribed(&self) -> bool {
        self.sink.lock().await.is_some()
    }

    /// Parameters of the most recent subscription
    pub async fn last_request(&self) -> Option<LocationRequestConfig> {
        *self.last_request.lock().await
    }

    /// Number of successful subscriptions so far
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocationProvider {
    async fn subscribe(
        &self,
        request: LocationRequestConfig,
        sink: mpsc::Sender<LocationFix>,
    ) -> Result<(), SensorError> {
        if self.permission_denied {
            return Err(SensorError::PermissionDenied {
                sensor: SensorKind::Location,
            });
        }
        *self.last_request.lock().await = Some(request);
        *self.sink.lock().await = Some(sink);
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        debug!(interval_ms = request.interval.as_millis(), "scripted location subscribed");
        Ok(())
    }

    async fn unsubscribe(&self) {
        if self.sink.lock().await.take().is_some() {
            debug!("scripted location unsubscribed");
        }
    }

    async fn last_known_location(&self) -> Option<LocationFix> {
        *self.last_known.lock().await
    }
}

/// Step counter whose cumulative readings are pushed by the caller
#[derive(Debug)]
pub struct ScriptedStepSensor {
    sink: Mutex<Option<mpsc::Sender<u64>>>,
    subscriptions: AtomicUsize,
    available: bool,
}

impl Default for ScriptedStepSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedStepSensor {
    /// Sensor present on the device
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Mutex::new(None),
            subscriptions: AtomicUsize::new(0),
            available: true,
        }
    }

    /// Device without a step counter
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            sink: Mutex::new(None),
            subscriptions: AtomicUsize::new(0),
            available: false,
        }
    }

    /// Deliver a cumulative reading to the current subscriber
    ///
    /// Returns `false` when nobody is subscribed or the subscriber has gone away.
    pub async fn push(&self, raw: u64) -> bool {
        let sink = self.sink.lock().await.clone();
        match sink {
            Some(sender) => sender.send(raw).await.is_ok(),
            None => false,
        }
    }

    /// A subscriber currently holds the sink
    pub async fn is_subscribed(&self) -> bool {
        self.sink.lock().await.is_some()
    }

    /// Number of successful subscriptions so far
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepSensor for ScriptedStepSensor {
    async fn subscribe(&self, sink: mpsc::Sender<u64>) -> Result<(), SensorError> {
        if !self.available {
            return Err(SensorError::Unavailable {
                sensor: SensorKind::StepCounter,
            });
        }
        *self.sink.lock().await = Some(sink);
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unsubscribe(&self) {
        self.sink.lock().await.take();
    }
}
