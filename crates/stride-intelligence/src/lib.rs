// ABOUTME: Tracking algorithms for live activity sessions
// ABOUTME: Location fix filtering, step counter normalization, and calorie estimation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

#![deny(unsafe_code)]

//! # Stride Intelligence
//!
//! Pure algorithms with no async runtime or I/O. Every function here is
//! driven by the tracking session's single-owner update loop, so nothing
//! needs interior mutability or locking.

/// Algorithm configuration and validation errors
pub mod config;

/// Great-circle distance helpers
pub mod geo;

/// Accuracy, staleness, jitter, and jump filtering of location fixes
pub mod geo_filter;

/// Session-relative normalization of the hardware step counter
pub mod step_counter;

/// MET-based energy expenditure estimation
pub mod calories;

pub use calories::{CalorieEstimate, CalorieEstimator, CalorieInput};
pub use config::{ConfigError, GeoFilterConfig};
pub use geo_filter::{FixOutcome, FixRejection, GeoFilter};
pub use step_counter::StepCounter;
