// ABOUTME: Session replay command
// ABOUTME: Loads a JSON event script, replays it, and prints activity, route, and workout records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use stride_tracker::config::TrackingConfig;
use stride_tracker::formatters::{duration_note, format_elapsed, format_pace};
use stride_tracker::models::ActivityType;
use stride_tracker::replay::{replay, ReplayReport, ReplayScript};
use tokio::fs;
use tracing::info;

use crate::OutputFormat;

/// Replay `script_path` and print what the session would persist
pub async fn run(
    script_path: &Path,
    activity: Option<ActivityType>,
    weight: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let config = TrackingConfig::from_env().context("Invalid STRIDE_* configuration")?;
    let raw = fs::read_to_string(script_path)
        .await
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script = ReplayScript::from_json(&raw)
        .with_context(|| format!("Invalid replay script {}", script_path.display()))?;

    let activity_type = activity.or(script.activity_type).unwrap_or_default();
    let weight_kg = weight.unwrap_or(config.default_weight_kg);
    info!(
        events = script.events.len(),
        activity = %activity_type,
        weight_kg,
        "replaying session script"
    );

    let report = replay(&script, activity_type, &config, weight_kg, Utc::now())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_summary(&report),
    }
    Ok(())
}

fn print_summary(report: &ReplayReport) {
    let activity = &report.activity;
    let fixes = &report.fixes;

    println!("Activity:   {}", activity.activity_type.display_name());
    println!(
        "Elapsed:    {} ({})",
        format_elapsed(activity.duration_seconds),
        duration_note(activity.duration_seconds)
    );
    println!("Distance:   {:.2} km", activity.distance_km);
    println!(
        "Pace:       {}",
        format_pace(activity.duration_seconds, activity.distance_km)
    );
    println!("Steps:      {}", activity.step_count);
    println!("Calories:   {} kcal", activity.calories_burned);
    println!(
        "Fixes:      {} seeded, {} moved, {} jitter, {} jump, {} rejected, {} ignored",
        fixes.seeded, fixes.moved, fixes.jitter, fixes.jump, fixes.rejected, fixes.ignored
    );
    match &report.route {
        Some(route) => println!("Route:      {} points", route.coordinates.len()),
        None => println!("Route:      none (no location fix retained)"),
    }
    println!(
        "Workout:    {} [{}] {} min, {} kcal, {}",
        report.workout.title,
        report.workout.category,
        report.workout.duration_minutes,
        report.workout.calories_burned,
        report.workout.date
    );
}
