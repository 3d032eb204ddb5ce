// ABOUTME: Output records produced when a tracking session finishes
// ABOUTME: FinishedActivity plus the route record and workout entry sent to persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActivityType, Coordinate, TrackPoint};

/// Immutable summary of a completed session, produced exactly once at finish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedActivity {
    /// Session the activity came from
    pub session_id: Uuid,
    /// Tracked activity
    pub activity_type: ActivityType,
    /// First retained position, if any fix was accepted
    pub start_coordinate: Option<Coordinate>,
    /// Last retained position, if any fix was accepted
    pub end_coordinate: Option<Coordinate>,
    /// Full route polyline in chronological order
    pub track_points: Vec<TrackPoint>,
    /// Filtered distance in kilometers
    pub distance_km: f64,
    /// Timer seconds (excludes paused time)
    pub duration_seconds: u64,
    /// Steps counted during the session
    pub step_count: u64,
    /// Estimated energy expenditure (kcal)
    pub calories_burned: u32,
    /// When tracking started
    pub started_at: DateTime<Utc>,
    /// When tracking finished
    pub finished_at: DateTime<Utc>,
}

impl FinishedActivity {
    /// At least one location fix was retained
    #[must_use]
    pub fn has_route(&self) -> bool {
        !self.track_points.is_empty()
    }

    /// Ordered `[lat, lng]` pairs of the route
    #[must_use]
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.track_points.iter().map(TrackPoint::coordinate).collect()
    }
}

/// Route persistence payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Activity wire value
    pub activity_type: ActivityType,
    /// Start latitude
    pub start_latitude: f64,
    /// Start longitude
    pub start_longitude: f64,
    /// End latitude
    pub end_latitude: Option<f64>,
    /// End longitude
    pub end_longitude: Option<f64>,
    /// `[lat, lng, alt, timestamp_millis]` per track point
    pub coordinates: Vec<[f64; 4]>,
    /// JSON encoding of `coordinates`, as the route API stores it
    pub coordinates_json: String,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Duration in seconds
    pub duration_seconds: u64,
    /// Estimated calories (kcal)
    pub calories_burned: u32,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// Finish time
    pub finished_at: DateTime<Utc>,
}

/// Generic workout/activity history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    /// Title shown in the workout history
    pub title: String,
    /// Workout category
    pub category: String,
    /// Duration in whole minutes (at least one)
    pub duration_minutes: u32,
    /// Calories (kcal)
    pub calories_burned: u32,
    /// Free-form notes
    pub notes: String,
    /// Calendar date of the workout
    pub date: NaiveDate,
}
