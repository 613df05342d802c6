//! Remote session service abstraction.
//!
//! The [`SessionService`] trait decouples the timer engine from the
//! platform backend that stores session records. All lifecycle
//! notifications and heartbeats route through this trait; the engine never
//! talks to the network directly.

pub mod http;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Boxed future type used by the trait's async operations.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Server-authoritative figures returned when a session is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StopReceipt {
    /// Final active duration as recorded by the server.
    pub elapsed_seconds: u64,
    /// Server-rendered duration string.
    pub formatted_duration: String,
}

/// Interface to the remote session store.
///
/// Implementations must be cheap to call concurrently; the engine issues
/// heartbeats from a background task while lifecycle calls may be in
/// flight.
pub trait SessionService: Send + Sync {
    /// Register a new session and return its server-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Start`](crate::AppError::Start) when the service
    /// is unreachable or rejects the request.
    fn start(&self, subject_id: &str, user_id: &str) -> ServiceFuture<'_, String>;

    /// Record a manual pause.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transition`](crate::AppError::Transition) on failure.
    fn pause(&self, session_id: &str) -> ServiceFuture<'_, ()>;

    /// Record an inactivity-triggered pause.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transition`](crate::AppError::Transition) on failure.
    fn auto_pause(&self, session_id: &str) -> ServiceFuture<'_, ()>;

    /// Record a resume.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transition`](crate::AppError::Transition) on failure.
    fn resume(&self, session_id: &str) -> ServiceFuture<'_, ()>;

    /// Signal that the session is still alive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Heartbeat`](crate::AppError::Heartbeat) on failure;
    /// the caller treats this as non-fatal.
    fn heartbeat(&self, session_id: &str) -> ServiceFuture<'_, ()>;

    /// Finalize the session with the locally-accumulated active seconds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Stop`](crate::AppError::Stop) on failure.
    fn stop(&self, session_id: &str, elapsed_seconds: u64) -> ServiceFuture<'_, StopReceipt>;
}
