//! Session model and lifecycle helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status for a measured study session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session exists yet.
    Idle,
    /// Session actively accumulating time.
    Running,
    /// Paused explicitly by the user.
    PausedManual,
    /// Paused by the inactivity watchdog.
    PausedAuto,
    /// Session finalized; terminal.
    Stopped,
}

impl SessionStatus {
    /// Whether the session is paused for any reason.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::PausedManual | Self::PausedAuto)
    }

    /// Determine whether a lifecycle transition is permitted.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Stopped, Self::Running)
                | (
                    Self::Running,
                    Self::PausedManual | Self::PausedAuto | Self::Stopped
                )
                | (Self::PausedManual | Self::PausedAuto, Self::Running | Self::Stopped)
        )
    }
}

/// Point-in-time snapshot of the session owned by a timer instance.
///
/// `elapsed_seconds` counts active time only: it grows by one per clock
/// tick while `Running`, is frozen while paused, and never changes after
/// `Stopped`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    /// Identifier assigned by the remote service; absent before start.
    pub id: Option<String>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Active seconds accumulated so far.
    pub elapsed_seconds: u64,
    /// Wall-clock time of the first transition into `Running`.
    pub started_at: Option<DateTime<Utc>>,
    /// Subject being studied, as passed to `start`.
    pub subject_id: Option<String>,
    /// Owning user, as passed to `start`.
    pub user_id: Option<String>,
}

impl Session {
    /// An empty pre-start session.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            id: None,
            status: SessionStatus::Idle,
            elapsed_seconds: 0,
            started_at: None,
            subject_id: None,
            user_id: None,
        }
    }
}

/// Finalized duration returned by [`stop`](crate::engine::SessionTimer::stop).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SessionSummary {
    /// Final active duration. Server-authoritative when `synchronized`.
    pub elapsed_seconds: u64,
    /// Human-readable rendering of the duration.
    pub formatted_duration: String,
    /// False when the remote finalize call failed and the figures are the
    /// local advisory count; the server-side record may need reconciliation.
    pub synchronized: bool,
}

impl SessionSummary {
    /// Build a summary from the local counter when the server response is
    /// unavailable.
    #[must_use]
    pub fn local(elapsed_seconds: u64) -> Self {
        Self {
            elapsed_seconds,
            formatted_duration: format_duration(elapsed_seconds),
            synchronized: false,
        }
    }
}

/// Render seconds as `H:MM:SS`.
#[must_use]
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
