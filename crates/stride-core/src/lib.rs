// ABOUTME: Core types and constants for the Stride live activity tracker
// ABOUTME: Foundation crate with error handling, domain models, and tracking constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

#![deny(unsafe_code)]

//! # Stride Core
//!
//! Foundation crate providing shared types and constants for live activity
//! tracking. It has no async runtime dependency so that the algorithm crate
//! and the tracking service can both build on it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and domain-specific errors
//! - **constants**: Filtering thresholds, timer periods and persistence defaults
//! - **models**: Location fixes, track points, session snapshots and output records

/// Unified error handling system with standard error codes
pub mod errors;

/// Tracking constants organized by domain
pub mod constants;

/// Core data models (`ActivityType`, `LocationFix`, `TrackPoint`, `FinishedActivity`, ...)
pub mod models;
