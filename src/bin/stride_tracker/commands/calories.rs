// ABOUTME: Calorie estimation command
// ABOUTME: Prints the MET band, both estimates, and the reported value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use anyhow::{ensure, Result};
use stride_tracker::intelligence::{CalorieEstimator, CalorieInput};
use stride_tracker::models::ActivityType;

use crate::OutputFormat;

/// Run the calorie estimator once and print the result
pub fn run(
    activity_type: ActivityType,
    elapsed_seconds: u64,
    distance_meters: f64,
    step_count: u64,
    weight_kg: f64,
    format: OutputFormat,
) -> Result<()> {
    ensure!(
        distance_meters.is_finite() && distance_meters >= 0.0,
        "distance must be zero or positive"
    );
    ensure!(
        weight_kg.is_finite() && weight_kg > 0.0,
        "weight must be positive"
    );

    let input = CalorieInput {
        activity_type,
        elapsed_seconds,
        distance_meters,
        step_count,
        weight_kg,
    };
    let estimate = CalorieEstimator::estimate(&input);

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({ "input": input, "estimate": estimate });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("Activity:       {}", activity_type.display_name());
            println!("Speed:          {:.2} km/h", estimate.speed_kmh);
            println!("MET:            {:.1}", estimate.met);
            println!("MET estimate:   {} kcal", estimate.met_calories);
            println!("Step estimate:  {} kcal", estimate.step_calories);
            println!("Calories:       {} kcal", estimate.calories);
        }
    }
    Ok(())
}
