// ABOUTME: Configuration module for the tracking runtime
// ABOUTME: Re-exports environment-driven configuration types and algorithm thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! Configuration for the tracking runtime
//!
//! - **Environment**: `TrackingConfig` loaded from `STRIDE_*` variables
//! - **Algorithms**: location filter thresholds live in `stride-intelligence`

/// Environment-driven runtime configuration
pub mod environment;

pub use environment::{LocationRequestConfig, RecorderConfig, TrackingConfig};
pub use stride_intelligence::{ConfigError, GeoFilterConfig};
