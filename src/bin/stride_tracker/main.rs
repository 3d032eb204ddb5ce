// ABOUTME: Stride CLI - replays recorded tracking sessions and runs the calorie estimator
// ABOUTME: Prints the records a finished session would persist, as text or JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking
//!
//! Usage:
//! ```bash
//! # Replay a recorded session script
//! stride-tracker replay ./morning-run.json --activity running --weight 72
//!
//! # Same, as JSON
//! stride-tracker replay ./morning-run.json --format json
//!
//! # Estimate calories for one hour of running at 10 km/h
//! stride-tracker calories --activity running --seconds 3600 --meters 10000 --weight 70
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use stride_tracker::logging::LoggingConfig;
use stride_tracker::models::ActivityType;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "stride-tracker",
    about = "Stride live activity tracking tools",
    long_about = "Replays recorded GPS/step sessions through the tracking state machine \
                  and estimates calories."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

/// Output rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary
    Text,
    /// Pretty-printed JSON
    Json,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Replay a recorded session script and print the resulting records
    Replay {
        /// Path to the JSON event script
        script: PathBuf,

        /// Activity type (overrides the script)
        #[arg(long)]
        activity: Option<ActivityType>,

        /// Body weight in kilograms (defaults to STRIDE_DEFAULT_WEIGHT_KG or 70)
        #[arg(long)]
        weight: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Estimate calories for an activity
    Calories {
        /// Activity type
        #[arg(long, default_value = "running")]
        activity: ActivityType,

        /// Elapsed seconds
        #[arg(long)]
        seconds: u64,

        /// Distance in meters
        #[arg(long, default_value = "0")]
        meters: f64,

        /// Steps counted
        #[arg(long, default_value = "0")]
        steps: u64,

        /// Body weight in kilograms
        #[arg(long, default_value = "70")]
        weight: f64,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    logging.init()?;
    debug!("Stride tracker CLI");

    match cli.command {
        Command::Replay {
            script,
            activity,
            weight,
            format,
        } => commands::replay::run(&script, activity, weight, format).await,
        Command::Calories {
            activity,
            seconds,
            meters,
            steps,
            weight,
            format,
        } => commands::calories::run(activity, seconds, meters, steps, weight, format),
    }
}
