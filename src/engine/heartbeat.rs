//! Periodic liveness notification to the remote session service.

use std::sync::Arc;

use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::controller::{Phase, TimerEvent, TimerInner};

/// Emit a heartbeat every `heartbeat_interval` while `Running`.
///
/// A failed call is logged and reported on the event channel; the next
/// tick re-attempts naturally, so there is no retry logic here. The
/// remote call runs outside the state lock.
pub(crate) async fn run(inner: Arc<TimerInner>, cancel: CancellationToken, armed_at: Instant) {
    let period = inner.config.heartbeat_interval();
    let mut ticks = interval_at(armed_at + period, period);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!("heartbeat emitter cancelled");
                return;
            }
            _ = ticks.tick() => {
                let session_id = {
                    let state = inner.state.lock().await;
                    if cancel.is_cancelled() {
                        return;
                    }
                    match (&state.phase, &state.id) {
                        (Phase::Running { .. }, Some(id)) => id.clone(),
                        _ => continue,
                    }
                };

                if let Err(err) = inner.service.heartbeat(&session_id).await {
                    warn!(session_id = %session_id, %err, "heartbeat failed");
                    let _ = inner
                        .events
                        .try_send(TimerEvent::HeartbeatFailed { session_id });
                } else {
                    debug!(session_id = %session_id, "heartbeat sent");
                }
            }
        }
    }
}
