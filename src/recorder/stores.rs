// ABOUTME: Route and workout persistence collaborator contracts
// ABOUTME: In-memory implementations with latency and failure injection for tests and replay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use stride_core::errors::PersistenceError;
use stride_core::models::{RouteRecord, WorkoutEntry};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Route persistence API
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Persist a route record
    ///
    /// # Errors
    ///
    /// Returns an error if the route was not stored
    async fn save_route(&self, route: &RouteRecord) -> Result<(), PersistenceError>;
}

/// Workout/activity history API
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Persist a workout entry and return its identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the entry was not stored
    async fn create_workout(&self, entry: &WorkoutEntry) -> Result<String, PersistenceError>;
}

/// Scheduled failures and latency shared by the in-memory stores
#[derive(Debug, Default)]
struct Faults {
    queued: Mutex<VecDeque<PersistenceError>>,
    latency: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl Faults {
    async fn before_call(&self) -> Result<(), PersistenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().await;
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        self.queued.lock().await.pop_front().map_or(Ok(()), Err)
    }

    async fn fail_next(&self, error: PersistenceError, times: usize) {
        let mut queued = self.queued.lock().await;
        queued.extend((0..times).map(|_| error.clone()));
    }
}

/// Route store keeping records in memory
#[derive(Debug, Default)]
pub struct InMemoryRouteStore {
    routes: Mutex<Vec<RouteRecord>>,
    faults: Faults,
}

impl InMemoryRouteStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `times` calls with `error`
    pub async fn fail_next(&self, error: PersistenceError, times: usize) {
        self.faults.fail_next(error, times).await;
    }

    /// Delay every call by `latency`
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.faults.latency.lock().await = latency;
    }

    /// Routes stored so far
    pub async fn routes(&self) -> Vec<RouteRecord> {
        self.routes.lock().await.clone()
    }

    /// Calls received, including failed ones
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.faults.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn save_route(&self, route: &RouteRecord) -> Result<(), PersistenceError> {
        self.faults.before_call().await?;
        self.routes.lock().await.push(route.clone());
        Ok(())
    }
}

/// Workout store keeping entries in memory
#[derive(Debug, Default)]
pub struct InMemoryWorkoutStore {
    entries: Mutex<Vec<(String, WorkoutEntry)>>,
    faults: Faults,
}

impl InMemoryWorkoutStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `times` calls with `error`
    pub async fn fail_next(&self, error: PersistenceError, times: usize) {
        self.faults.fail_next(error, times).await;
    }

    /// Delay every call by `latency`
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.faults.latency.lock().await = latency;
    }

    /// Entries stored so far
    pub async fn entries(&self) -> Vec<WorkoutEntry> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Calls received, including failed ones
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.faults.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkoutStore for InMemoryWorkoutStore {
    async fn create_workout(&self, entry: &WorkoutEntry) -> Result<String, PersistenceError> {
        self.faults.before_call().await?;
        let id = Uuid::new_v4().to_string();
        self.entries.lock().await.push((id.clone(), entry.clone()));
        Ok(id)
    }
}
