// ABOUTME: MET-based calorie estimation for walking, running, and cycling sessions
// ABOUTME: Takes the larger of the speed-banded MET estimate and a per-step fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

//! # Calorie Estimation
//!
//! `kcal = MET × weight_kg × hours`, where MET is looked up from a
//! speed-banded table per activity (Compendium of Physical Activities).
//!
//! Indoors or on a treadmill the GPS distance stays near zero while the
//! step counter keeps rising, so a rough `steps × 0.04 kcal` estimate is
//! computed as well. The two signals describe the same energy, so the
//! estimator reports the larger one instead of their sum.
//!
//! Every band edge is an inclusive upper bound, so a speed exactly on an
//! edge takes the lower band: running at 10 km/h is 9.8 MET, not 11.0, and
//! walking at 6.5 km/h is 4.3, not 5.0. This differs from strict `<` band
//! tables at each of the eight edges; it is what makes one hour of running
//! at 10 km/h for 70 kg come out at 686 kcal.

use serde::{Deserialize, Serialize};
use stride_core::constants::calories::KCAL_PER_STEP;
use stride_core::models::ActivityType;

/// `(upper speed edge km/h, MET)` bands followed by the MET above the last edge
struct MetTable {
    bands: &'static [(f64, f64)],
    above: f64,
}

static WALKING: MetTable = MetTable {
    bands: &[(3.0, 2.0), (5.0, 3.5), (6.5, 4.3)],
    above: 5.0,
};

static RUNNING: MetTable = MetTable {
    bands: &[(8.0, 8.3), (10.0, 9.8), (12.0, 11.0)],
    above: 12.8,
};

static CYCLING: MetTable = MetTable {
    bands: &[(16.0, 4.0), (20.0, 6.8)],
    above: 8.0,
};

impl MetTable {
    fn for_activity(activity_type: ActivityType) -> &'static Self {
        match activity_type {
            ActivityType::Walking => &WALKING,
            ActivityType::Running => &RUNNING,
            ActivityType::Cycling => &CYCLING,
        }
    }

    fn lookup(&self, speed_kmh: f64) -> f64 {
        self.bands
            .iter()
            .find(|(edge, _)| speed_kmh <= *edge)
            .map_or(self.above, |(_, met)| *met)
    }
}

/// Inputs to one calorie estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieInput {
    /// Activity being performed
    pub activity_type: ActivityType,
    /// Timer seconds
    pub elapsed_seconds: u64,
    /// Filtered distance (meters)
    pub distance_meters: f64,
    /// Session steps
    pub step_count: u64,
    /// Body weight (kilograms)
    pub weight_kg: f64,
}

/// Breakdown of a calorie estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieEstimate {
    /// Average speed (km/h), zero when no time has elapsed
    pub speed_kmh: f64,
    /// MET selected for the speed band
    pub met: f64,
    /// MET-based estimate (kcal, truncated)
    pub met_calories: u32,
    /// Step-based estimate (kcal, truncated)
    pub step_calories: u32,
    /// Reported estimate: the larger of the two
    pub calories: u32,
}

/// Stateless calorie estimator
pub struct CalorieEstimator;

impl CalorieEstimator {
    /// Average speed in km/h; zero when `elapsed_seconds` is zero
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn speed_kmh(elapsed_seconds: u64, distance_meters: f64) -> f64 {
        if elapsed_seconds == 0 {
            return 0.0;
        }
        let hours = elapsed_seconds as f64 / 3600.0;
        (distance_meters / 1000.0) / hours
    }

    /// MET value for an activity at a given speed
    #[must_use]
    pub fn met_for(activity_type: ActivityType, speed_kmh: f64) -> f64 {
        MetTable::for_activity(activity_type).lookup(speed_kmh)
    }

    /// Full estimate with its intermediate values
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn estimate(input: &CalorieInput) -> CalorieEstimate {
        let speed_kmh = Self::speed_kmh(input.elapsed_seconds, input.distance_meters);
        let met = Self::met_for(input.activity_type, speed_kmh);
        let hours = input.elapsed_seconds as f64 / 3600.0;

        // `as` saturates: negative or NaN products become 0
        let met_calories = (met * input.weight_kg * hours) as u32;
        let step_calories = (input.step_count as f64 * KCAL_PER_STEP) as u32;

        CalorieEstimate {
            speed_kmh,
            met,
            met_calories,
            step_calories,
            calories: met_calories.max(step_calories),
        }
    }

    /// Reported calories for the given inputs
    #[must_use]
    pub fn calories(input: &CalorieInput) -> u32 {
        Self::estimate(input).calories
    }
}
