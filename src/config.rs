//! Timer configuration parsing and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Fixed period of the session clock. One elapsed second is credited per
/// tick, so this is not configurable.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Remote session service connectivity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Base URL of the session service, without a trailing slash.
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
        }
    }
}

/// Timer engine configuration parsed from `timer.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimerConfig {
    /// Idle time before the watchdog auto-pauses the session.
    #[serde(default = "default_inactivity_threshold")]
    pub inactivity_threshold_seconds: u64,
    /// Period of the liveness heartbeat while running.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Period of the inactivity watchdog check.
    #[serde(default = "default_activity_check_interval")]
    pub activity_check_interval_seconds: u64,
    /// Remote session service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

fn default_inactivity_threshold() -> u64 {
    60
}

fn default_heartbeat_interval() -> u64 {
    5
}

fn default_activity_check_interval() -> u64 {
    10
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            inactivity_threshold_seconds: default_inactivity_threshold(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            activity_check_interval_seconds: default_activity_check_interval(),
            service: ServiceConfig::default(),
        }
    }
}

impl TimerConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Idle threshold as a [`Duration`].
    #[must_use]
    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_secs(self.inactivity_threshold_seconds)
    }

    /// Heartbeat period as a [`Duration`].
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds)
    }

    /// Watchdog check period as a [`Duration`].
    #[must_use]
    pub fn activity_check_interval(&self) -> Duration {
        Duration::from_secs(self.activity_check_interval_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.inactivity_threshold_seconds == 0 {
            return Err(AppError::Config(
                "inactivity_threshold_seconds must be greater than zero".into(),
            ));
        }

        if self.heartbeat_interval_seconds == 0 {
            return Err(AppError::Config(
                "heartbeat_interval_seconds must be greater than zero".into(),
            ));
        }

        if self.activity_check_interval_seconds == 0 {
            return Err(AppError::Config(
                "activity_check_interval_seconds must be greater than zero".into(),
            ));
        }

        // A check period longer than the threshold would delay auto-pause
        // by a full extra check window.
        if self.activity_check_interval_seconds > self.inactivity_threshold_seconds {
            return Err(AppError::Config(
                "activity_check_interval_seconds must not exceed inactivity_threshold_seconds"
                    .into(),
            ));
        }

        if self.service.base_url.is_empty() {
            return Err(AppError::Config("service.base_url must not be empty".into()));
        }

        Ok(())
    }
}
