// ABOUTME: Converts the cumulative hardware step counter into a session-relative count
// ABOUTME: Baseline survives pause/resume so the count is continuous across pauses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use tracing::debug;

/// Session-relative step count derived from a monotonically increasing counter
///
/// The first reading after `reset` becomes the baseline. Later readings
/// report `raw - baseline`, floored at zero (a counter that restarted after
/// a device reboot reads below the baseline). Pausing leaves the baseline
/// alone, so steps keep counting from the same origin after a resume.
#[derive(Debug, Clone)]
pub struct StepCounter {
    baseline: Option<u64>,
    steps: u64,
    available: bool,
}

impl Default for StepCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl StepCounter {
    /// Counter with no baseline yet
    #[must_use]
    pub const fn new() -> Self {
        Self {
            baseline: None,
            steps: 0,
            available: true,
        }
    }

    /// Clear the baseline and count (new session)
    pub fn reset(&mut self) {
        self.baseline = None;
        self.steps = 0;
        self.available = true;
    }

    /// Record `raw` as baseline unless one is already set
    pub fn ensure_baseline(&mut self, raw: u64) {
        if self.baseline.is_none() {
            debug!(raw, "step counter baseline established");
            self.baseline = Some(raw);
        }
    }

    /// Fold a raw hardware reading and return the session step count
    pub fn on_reading(&mut self, raw: u64) -> u64 {
        self.ensure_baseline(raw);
        let baseline = self.baseline.unwrap_or(raw);
        self.steps = raw.saturating_sub(baseline);
        self.steps
    }

    /// Record that the device has no usable step sensor; the count stays frozen
    pub fn mark_unavailable(&mut self) {
        self.available = false;
    }

    /// Steps since the baseline
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Baseline raw value, once established
    #[must_use]
    pub const fn baseline(&self) -> Option<u64> {
        self.baseline
    }

    /// Whether a step sensor has been registered successfully
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }
}
