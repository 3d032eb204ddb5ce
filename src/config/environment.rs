// ABOUTME: Tracking runtime configuration loaded from STRIDE_* environment variables
// ABOUTME: Groups location filter, timer, sensor request, weight, and persistence settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::env;
use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use stride_core::constants::{calories, geo_filter, persistence, timing};
use stride_intelligence::{ConfigError, GeoFilterConfig};
use tracing::info;

/// Location update subscription parameters handed to the provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRequestConfig {
    /// Requested interval between updates
    pub interval: Duration,
    /// Requested minimum displacement between updates (meters)
    pub min_distance_meters: f64,
}

impl Default for LocationRequestConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(timing::LOCATION_INTERVAL_MS),
            min_distance_meters: timing::LOCATION_MIN_DISTANCE_METERS,
        }
    }
}

/// Persistence behaviour of the session recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Upper bound on a single store call
    pub persist_timeout: Duration,
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each later one
    pub initial_backoff: Duration,
    /// Directory for activities whose workout entry could not be saved
    pub outbox_dir: Option<PathBuf>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            persist_timeout: Duration::from_secs(persistence::PERSIST_TIMEOUT_SECS),
            max_retries: persistence::MAX_RETRIES,
            initial_backoff: Duration::from_millis(persistence::INITIAL_BACKOFF_MS),
            outbox_dir: None,
        }
    }
}

/// Complete configuration of one tracking runtime
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    /// Location fix filter thresholds
    pub geo_filter: GeoFilterConfig,
    /// Elapsed-time timer period
    pub timer_period: Duration,
    /// Location subscription parameters
    pub location_request: LocationRequestConfig,
    /// Weight used when the profile has none (kilograms)
    pub default_weight_kg: f64,
    /// Recorder persistence settings
    pub recorder: RecorderConfig,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            geo_filter: GeoFilterConfig::default(),
            timer_period: Duration::from_millis(timing::TIMER_PERIOD_MS),
            location_request: LocationRequestConfig::default(),
            default_weight_kg: calories::DEFAULT_WEIGHT_KG,
            recorder: RecorderConfig::default(),
        }
    }
}

impl TrackingConfig {
    /// Load configuration from `STRIDE_*` environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or the result fails validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            geo_filter: GeoFilterConfig {
                max_accuracy_meters: env_parse(
                    "STRIDE_MAX_ACCURACY_M",
                    geo_filter::MAX_ACCURACY_METERS,
                )?,
                max_fix_age: Duration::from_secs(env_parse(
                    "STRIDE_MAX_FIX_AGE_SECS",
                    geo_filter::MAX_FIX_AGE_SECS.unsigned_abs(),
                )?),
                min_delta_meters: env_parse("STRIDE_MIN_DELTA_M", geo_filter::MIN_DELTA_METERS)?,
                max_delta_meters: env_parse("STRIDE_MAX_DELTA_M", geo_filter::MAX_DELTA_METERS)?,
            },
            timer_period: Duration::from_millis(env_parse(
                "STRIDE_TIMER_PERIOD_MS",
                timing::TIMER_PERIOD_MS,
            )?),
            location_request: LocationRequestConfig {
                interval: Duration::from_millis(env_parse(
                    "STRIDE_LOCATION_INTERVAL_MS",
                    timing::LOCATION_INTERVAL_MS,
                )?),
                min_distance_meters: env_parse(
                    "STRIDE_LOCATION_MIN_DISTANCE_M",
                    timing::LOCATION_MIN_DISTANCE_METERS,
                )?,
            },
            default_weight_kg: env_parse("STRIDE_DEFAULT_WEIGHT_KG", calories::DEFAULT_WEIGHT_KG)?,
            recorder: RecorderConfig {
                persist_timeout: Duration::from_secs(env_parse(
                    "STRIDE_PERSIST_TIMEOUT_SECS",
                    persistence::PERSIST_TIMEOUT_SECS,
                )?),
                max_retries: env_parse("STRIDE_PERSIST_MAX_RETRIES", persistence::MAX_RETRIES)?,
                initial_backoff: Duration::from_millis(env_parse(
                    "STRIDE_PERSIST_BACKOFF_MS",
                    persistence::INITIAL_BACKOFF_MS,
                )?),
                outbox_dir: env::var("STRIDE_OUTBOX_DIR")
                    .ok()
                    .filter(|dir| !dir.trim().is_empty())
                    .map(PathBuf::from),
            },
        };

        config.validate()?;
        info!("Tracking configuration loaded: {config}");
        Ok(config)
    }

    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geo_filter.validate()?;

        if self.timer_period.is_zero() {
            return Err(ConfigError::ValueOutOfRange("timer_period must be non-zero"));
        }
        if self.location_request.interval.is_zero() {
            return Err(ConfigError::ValueOutOfRange(
                "location_request.interval must be non-zero",
            ));
        }
        if !(self.location_request.min_distance_meters.is_finite()
            && self.location_request.min_distance_meters >= 0.0)
        {
            return Err(ConfigError::ValueOutOfRange(
                "location_request.min_distance_meters must be zero or positive",
            ));
        }
        if !(calories::MIN_WEIGHT_KG..=calories::MAX_WEIGHT_KG).contains(&self.default_weight_kg) {
            return Err(ConfigError::ValueOutOfRange(
                "default_weight_kg must be between 20 and 400",
            ));
        }
        if self.recorder.persist_timeout.is_zero() {
            return Err(ConfigError::ValueOutOfRange(
                "recorder.persist_timeout must be non-zero",
            ));
        }
        Ok(())
    }
}

impl Display for TrackingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accuracy<={}m age<={}s delta={}..={}m timer={}ms location={}ms/{}m weight={}kg \
             timeout={}s retries={} outbox={}",
            self.geo_filter.max_accuracy_meters,
            self.geo_filter.max_fix_age.as_secs(),
            self.geo_filter.min_delta_meters,
            self.geo_filter.max_delta_meters,
            self.timer_period.as_millis(),
            self.location_request.interval.as_millis(),
            self.location_request.min_distance_meters,
            self.default_weight_kg,
            self.recorder.persist_timeout.as_secs(),
            self.recorder.max_retries,
            self.recorder
                .outbox_dir
                .as_ref()
                .map_or_else(|| "disabled".to_owned(), |dir| dir.display().to_string()),
        )
    }
}

/// Parse an environment variable, or return `default` when it is unset
fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Parse(format!("{key}={raw}: {e}"))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}
