#![forbid(unsafe_code)]

//! `study-timer`: smart session timer engine for the student platform.
//!
//! Measures how long a user is actively engaged with a study session,
//! auto-pauses on inactivity, resumes on demand, and keeps the remote
//! session record synchronized via periodic heartbeats. UI rendering and
//! the session storage backend are the embedding application's concern;
//! the backend is reached through the [`service::SessionService`] port.

pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod service;

pub use config::TimerConfig;
pub use engine::{ActivityMonitor, SessionTimer, TimerEvent};
pub use errors::{AppError, Result};
