//! Elapsed-time ticking for a running session.

use std::sync::Arc;

use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::controller::{Phase, TimerInner};
use crate::config::CLOCK_TICK;

/// Increment `elapsed_seconds` once per second while `Running`.
///
/// Ticks while paused are neither counted nor banked; the phase is
/// re-checked under the state lock on every tick, so a tick in flight
/// across a pause can never count. Missed ticks burst to stay gap-free.
pub(crate) async fn run(inner: Arc<TimerInner>, cancel: CancellationToken, armed_at: Instant) {
    let mut ticks = interval_at(armed_at + CLOCK_TICK, CLOCK_TICK);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!("session clock cancelled");
                return;
            }
            _ = ticks.tick() => {
                let mut state = inner.state.lock().await;
                if cancel.is_cancelled() {
                    return;
                }
                if matches!(state.phase, Phase::Running { .. }) {
                    state.elapsed_seconds += 1;
                }
            }
        }
    }
}
