//! Last-activity bookkeeping shared between signal sources and the watchdog.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Cloneable witness of the most recent user interaction.
///
/// Any producer of "user is present" signals (pointer movement, key press,
/// click, scroll) calls [`record_activity`](Self::record_activity); the
/// inactivity watchdog reads the elapsed time. Recording is valid at any
/// moment, including before a session exists.
///
/// Uses [`tokio::time::Instant`] so the paused test clock is honored.
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    last_activity: Arc<Mutex<Instant>>,
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityMonitor {
    /// Create a monitor with the current instant as its baseline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_activity: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Record a user interaction. Idempotent; never fails.
    pub fn record_activity(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time elapsed since the most recent recorded interaction.
    #[must_use]
    pub fn time_since_last_activity(&self) -> Duration {
        self.last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}
