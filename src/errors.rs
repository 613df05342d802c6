//! Error types shared across the engine.

use std::fmt::{Display, Formatter};

/// Shared engine result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Engine error enumeration covering all failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Remote service rejected or never received the session start request.
    Start(String),
    /// Remote pause/resume notification failed after the local transition.
    Transition(String),
    /// A single heartbeat emission failed; the schedule continues.
    Heartbeat(String),
    /// Remote finalize call failed; the session is stopped locally.
    Stop(String),
    /// Operation invoked from a state that does not permit it.
    InvalidState(String),
    /// HTTP transport failure when talking to the session service.
    Http(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Start(msg) => write!(f, "start failed: {msg}"),
            Self::Transition(msg) => write!(f, "transition notify failed: {msg}"),
            Self::Heartbeat(msg) => write!(f, "heartbeat failed: {msg}"),
            Self::Stop(msg) => write!(f, "stop failed: {msg}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Http(msg) => write!(f, "http: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
