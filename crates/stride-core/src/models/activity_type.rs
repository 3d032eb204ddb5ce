// ABOUTME: Activity type enumeration for live tracking sessions
// ABOUTME: Wire values, display names, and lenient parsing with a running fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of movement being tracked; selects the calorie intensity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Walking
    Walking,
    /// Running
    #[default]
    Running,
    /// Cycling
    Cycling,
}

impl ActivityType {
    /// All tracked activity types
    pub const ALL: [Self; 3] = [Self::Walking, Self::Running, Self::Cycling];

    /// Wire value used by the persistence APIs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    /// Human readable name used in workout titles
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    /// Parse a wire value, falling back to `Running` for anything unknown
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "walking" | "walk" => Ok(Self::Walking),
            "running" | "run" => Ok(Self::Running),
            "cycling" | "ride" | "bike" => Ok(Self::Cycling),
            other => Err(format!("unknown activity type: {other}")),
        }
    }
}
