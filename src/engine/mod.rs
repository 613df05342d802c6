//! Session timing engine.
//!
//! Coordinates the periodic tasks (elapsed-time ticking, heartbeat
//! emission, inactivity detection) against a single session state
//! owned by [`SessionTimer`].

pub mod activity;
mod clock;
pub mod controller;
mod heartbeat;
mod watchdog;

pub use activity::ActivityMonitor;
pub use controller::{SessionTimer, TimerEvent};
