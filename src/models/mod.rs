//! Domain models for measured study sessions.

pub mod session;

pub use session::{Session, SessionStatus, SessionSummary};
