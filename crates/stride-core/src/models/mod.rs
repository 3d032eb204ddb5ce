// ABOUTME: Domain models for live activity tracking
// ABOUTME: Re-exports activity types, location data, session state, and output records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! Domain models shared by the algorithm crate and the tracking service.

mod activity_type;
mod location;
mod records;
mod session;

pub use activity_type::ActivityType;
pub use location::{Coordinate, LocationFix, TrackPoint};
pub use records::{FinishedActivity, RouteRecord, WorkoutEntry};
pub use session::{SessionAction, SessionSnapshot, SessionStatus};
