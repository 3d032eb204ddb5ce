// ABOUTME: Human-readable formatting of elapsed time, pace, distance, and durations
// ABOUTME: Shared by live session snapshots, workout notes, and CLI text output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use stride_core::constants::display::{MIN_PACE_DISTANCE_KM, PACE_PLACEHOLDER};

/// Elapsed time as `H:MM:SS` from one hour up, `MM:SS` below
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Average pace as `m:ss /km`
///
/// Shows the `--:--` placeholder until at least 10 m are covered or
/// while no time has elapsed.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn format_pace(elapsed_seconds: u64, distance_km: f64) -> String {
    if elapsed_seconds == 0 || !(distance_km >= MIN_PACE_DISTANCE_KM) {
        return PACE_PLACEHOLDER.to_owned();
    }
    let pace_minutes = (elapsed_seconds as f64 / 60.0) / distance_km;
    let whole_minutes = pace_minutes.trunc();
    let seconds = ((pace_minutes - whole_minutes) * 60.0) as u64;
    let minutes = whole_minutes as u64;
    format!("{minutes}:{seconds:02} /km")
}

/// Distance in kilometers with two decimals
#[must_use]
pub fn format_distance_km(distance_km: f64) -> String {
    format!("{distance_km:.2}")
}

/// Duration as `{m} min {s} sec`, or `{s} sec` under a minute
#[must_use]
pub fn duration_note(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    if minutes > 0 {
        format!("{minutes} min {secs} sec")
    } else {
        format!("{secs} sec")
    }
}
