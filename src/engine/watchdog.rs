//! Inactivity detection for a running session.

use std::sync::Arc;

use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::controller::TimerInner;

/// Compare idle time against the threshold every `activity_check_interval`.
///
/// When the threshold is reached the session is auto-paused; that
/// transition cancels this task's own group, so the check can never fire
/// twice for one idle stretch. The task exits right after a successful
/// auto-pause rather than waiting for the cancellation to be observed.
pub(crate) async fn run(inner: Arc<TimerInner>, cancel: CancellationToken, armed_at: Instant) {
    let period = inner.config.activity_check_interval();
    let threshold = inner.config.inactivity_threshold();
    let mut ticks = interval_at(armed_at + period, period);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!("inactivity watchdog cancelled");
                return;
            }
            _ = ticks.tick() => {
                if inner.activity.time_since_last_activity() >= threshold
                    && inner.auto_pause().await
                {
                    return;
                }
            }
        }
    }
}
