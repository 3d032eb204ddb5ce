// ABOUTME: User profile lookup for body weight used in calorie estimation
// ABOUTME: Falls back to the configured default weight when the profile has none
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use async_trait::async_trait;
use stride_core::constants::calories::{MAX_WEIGHT_KG, MIN_WEIGHT_KG};
use stride_core::errors::AppResult;
use tracing::{debug, warn};

/// Source of the user's body weight
#[async_trait]
pub trait UserProfileService: Send + Sync {
    /// Body weight in kilograms, if the profile records one
    async fn weight_kg(&self) -> AppResult<Option<f64>>;
}

/// Profile with a fixed (possibly absent) weight
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProfile {
    weight_kg: Option<f64>,
}

impl StaticProfile {
    /// Profile reporting `weight_kg`
    #[must_use]
    pub const fn new(weight_kg: Option<f64>) -> Self {
        Self { weight_kg }
    }
}

#[async_trait]
impl UserProfileService for StaticProfile {
    async fn weight_kg(&self) -> AppResult<Option<f64>> {
        Ok(self.weight_kg)
    }
}

/// Weight to use for a session
///
/// Missing, implausible, or unreadable profile weights fall back to `default_kg`.
pub async fn resolve_weight_kg(profile: &dyn UserProfileService, default_kg: f64) -> f64 {
    match profile.weight_kg().await {
        Ok(Some(weight)) if (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight) => {
            debug!(weight_kg = weight, "using profile weight");
            weight
        }
        Ok(Some(weight)) => {
            warn!(weight_kg = weight, "profile weight implausible, using default");
            default_kg
        }
        Ok(None) => default_kg,
        Err(e) => {
            warn!(error = %e, "profile lookup failed, using default weight");
            default_kg
        }
    }
}
