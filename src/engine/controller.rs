//! Session state machine and owner of all scheduled work.
//!
//! [`SessionTimer`] is the only component that mutates session state and
//! the only caller of the remote service's lifecycle endpoints. Each
//! `Running` phase owns a [`TaskGroup`], one cancellation token covering
//! the clock, heartbeat, and watchdog tasks, cancelled as a single unit
//! on every transition out of `Running`, under the same lock that changes
//! the status. A tick already in flight when a pause lands re-checks the
//! phase under that lock and therefore can never count time against a
//! paused or stopped session.

use std::mem;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use super::activity::ActivityMonitor;
use super::{clock, heartbeat, watchdog};
use crate::config::TimerConfig;
use crate::models::{Session, SessionStatus, SessionSummary};
use crate::service::SessionService;
use crate::{AppError, Result};

/// Events emitted by the engine for the embedding application to surface.
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// The watchdog paused the session; the user should be told to move
    /// to continue.
    AutoPaused {
        /// Session that was paused.
        session_id: String,
        /// Seconds idle when the watchdog fired.
        idle_seconds: u64,
    },
    /// A single heartbeat call failed; the schedule continues.
    HeartbeatFailed {
        /// Session whose heartbeat was lost.
        session_id: String,
    },
}

/// Why the session is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PauseKind {
    Manual,
    Auto,
}

/// Cancellation scope for the periodic tasks of one `Running` phase.
///
/// Tasks are detached; they observe the token inside `select!` and exit on
/// their own. Dropping the group cancels it, so replacing the phase under
/// the state lock makes cancellation synchronous with the status change.
pub(crate) struct TaskGroup {
    cancel: CancellationToken,
}

impl TaskGroup {
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Tagged session phase; scheduled tasks exist exactly while `Running`.
pub(crate) enum Phase {
    Idle,
    Running { tasks: TaskGroup },
    Paused { kind: PauseKind },
    Stopped { summary: SessionSummary },
}

/// Mutable session state guarded by the controller's lock.
pub(crate) struct TimerState {
    pub(crate) phase: Phase,
    pub(crate) id: Option<String>,
    pub(crate) elapsed_seconds: u64,
    pub(crate) started_at: Option<chrono::DateTime<Utc>>,
    pub(crate) subject_id: Option<String>,
    pub(crate) user_id: Option<String>,
}

impl TimerState {
    fn status(&self) -> SessionStatus {
        match &self.phase {
            Phase::Idle => SessionStatus::Idle,
            Phase::Running { .. } => SessionStatus::Running,
            Phase::Paused {
                kind: PauseKind::Manual,
            } => SessionStatus::PausedManual,
            Phase::Paused {
                kind: PauseKind::Auto,
            } => SessionStatus::PausedAuto,
            Phase::Stopped { .. } => SessionStatus::Stopped,
        }
    }

    fn snapshot(&self) -> Session {
        Session {
            id: self.id.clone(),
            status: self.status(),
            elapsed_seconds: self.elapsed_seconds,
            started_at: self.started_at,
            subject_id: self.subject_id.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// Shared core between the public handle and the spawned tasks.
pub(crate) struct TimerInner {
    pub(crate) config: TimerConfig,
    pub(crate) service: Arc<dyn SessionService>,
    pub(crate) activity: ActivityMonitor,
    pub(crate) events: mpsc::Sender<TimerEvent>,
    pub(crate) state: Mutex<TimerState>,
}

impl TimerInner {
    /// Pause triggered by the inactivity watchdog.
    ///
    /// No-op unless the session is `Running`, so a watchdog tick racing a
    /// manual pause or stop cannot double-fire.
    pub(crate) async fn auto_pause(&self) -> bool {
        let (session_id, idle_seconds);
        {
            let mut state = self.state.lock().await;
            match mem::replace(
                &mut state.phase,
                Phase::Paused {
                    kind: PauseKind::Auto,
                },
            ) {
                Phase::Running { tasks } => tasks.cancel(),
                prior => {
                    state.phase = prior;
                    return false;
                }
            }

            session_id = state.id.clone();
            idle_seconds = self.activity.time_since_last_activity().as_secs();

            if let Some(ref id) = session_id {
                if let Err(err) = self.service.auto_pause(id).await {
                    warn!(session_id = %id, %err, "auto-pause notification failed");
                }
                info!(session_id = %id, idle_seconds, "session auto-paused due to inactivity");
            }
        }

        // Event delivery happens outside the lock so a slow consumer cannot
        // block state transitions.
        if let Some(id) = session_id {
            let _ = self
                .events
                .send(TimerEvent::AutoPaused {
                    session_id: id,
                    idle_seconds,
                })
                .await;
        }

        true
    }
}

/// Arm the clock, heartbeat, and watchdog for a fresh `Running` phase.
///
/// The arm instant is captured here, not in the spawned tasks, so every
/// tick boundary is anchored to the transition into `Running` regardless
/// of when the tasks are first polled.
fn spawn_task_group(inner: &Arc<TimerInner>) -> TaskGroup {
    let cancel = CancellationToken::new();
    let armed_at = Instant::now();

    tokio::spawn(
        clock::run(Arc::clone(inner), cancel.clone(), armed_at)
            .instrument(info_span!("session_clock")),
    );
    tokio::spawn(
        heartbeat::run(Arc::clone(inner), cancel.clone(), armed_at)
            .instrument(info_span!("heartbeat_emitter")),
    );
    tokio::spawn(
        watchdog::run(Arc::clone(inner), cancel.clone(), armed_at)
            .instrument(info_span!("inactivity_watchdog")),
    );

    TaskGroup { cancel }
}

/// Smart session timer: measures active study time, auto-pauses on idle,
/// and keeps the remote session record synchronized.
///
/// One instance owns at most one session at a time. Handles are cheap to
/// clone; all clones share the same session.
#[derive(Clone)]
pub struct SessionTimer {
    inner: Arc<TimerInner>,
}

impl SessionTimer {
    /// Build a timer over the given service port.
    ///
    /// `events` receives [`TimerEvent`]s; the caller decides how to surface
    /// them (banner, system notification).
    #[must_use]
    pub fn new(
        config: TimerConfig,
        service: Arc<dyn SessionService>,
        events: mpsc::Sender<TimerEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(TimerInner {
                config,
                service,
                activity: ActivityMonitor::new(),
                events,
                state: Mutex::new(TimerState {
                    phase: Phase::Idle,
                    id: None,
                    elapsed_seconds: 0,
                    started_at: None,
                    subject_id: None,
                    user_id: None,
                }),
            }),
        }
    }

    /// Handle for interaction-signal producers to record activity on.
    #[must_use]
    pub fn activity(&self) -> ActivityMonitor {
        self.inner.activity.clone()
    }

    /// Start a new session for the given subject and user.
    ///
    /// Valid from `Idle` or `Stopped` (a fresh session replaces a stopped
    /// one). The state lock is held across the remote call, so a
    /// concurrent `stop()` waits for the server-assigned id instead of
    /// racing it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] if a session is already running
    /// or paused, or [`AppError::Start`] if the remote service rejects the
    /// request, in which case no schedulers are armed and the phase stays
    /// unchanged.
    pub async fn start(&self, subject_id: &str, user_id: &str) -> Result<()> {
        let span = info_span!("start_session", subject_id, user_id);
        async move {
            let mut state = self.inner.state.lock().await;
            if !matches!(state.phase, Phase::Idle | Phase::Stopped { .. }) {
                return Err(AppError::InvalidState(
                    "a session is already in progress".into(),
                ));
            }

            let id = self.inner.service.start(subject_id, user_id).await?;

            state.id = Some(id.clone());
            state.elapsed_seconds = 0;
            state.started_at = Some(Utc::now());
            state.subject_id = Some(subject_id.to_owned());
            state.user_id = Some(user_id.to_owned());

            self.inner.activity.record_activity();
            state.phase = Phase::Running {
                tasks: spawn_task_group(&self.inner),
            };

            info!(session_id = %id, "session started");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Pause the session at the user's request.
    ///
    /// Returns `false` (no-op) unless `Running`. The task group is
    /// cancelled synchronously with the status change; the remote
    /// notification is optimistic: a failure is logged and the local
    /// pause stands.
    pub async fn pause(&self) -> bool {
        let span = info_span!("pause_session");
        async move {
            let mut state = self.inner.state.lock().await;
            match mem::replace(
                &mut state.phase,
                Phase::Paused {
                    kind: PauseKind::Manual,
                },
            ) {
                Phase::Running { tasks } => tasks.cancel(),
                prior => {
                    state.phase = prior;
                    return false;
                }
            }

            if let Some(id) = state.id.clone() {
                if let Err(err) = self.inner.service.pause(&id).await {
                    warn!(session_id = %id, %err, "pause notification failed");
                }
                info!(session_id = %id, elapsed = state.elapsed_seconds, "session paused");
            }
            true
        }
        .instrument(span)
        .await
    }

    /// Pause as if the watchdog had fired. Exposed for the embedding
    /// application; the watchdog itself goes through the same path.
    pub async fn auto_pause(&self) -> bool {
        self.inner.auto_pause().await
    }

    /// Resume a paused session.
    ///
    /// Returns `false` (no-op) unless paused. The activity record is
    /// refreshed first so a stale pre-pause timestamp cannot trigger an
    /// instant re-auto-pause.
    pub async fn resume(&self) -> bool {
        let span = info_span!("resume_session");
        async move {
            let mut state = self.inner.state.lock().await;
            let Phase::Paused { kind } = &state.phase else {
                return false;
            };
            let kind = *kind;

            self.inner.activity.record_activity();
            state.phase = Phase::Running {
                tasks: spawn_task_group(&self.inner),
            };

            if let Some(id) = state.id.clone() {
                if let Err(err) = self.inner.service.resume(&id).await {
                    warn!(session_id = %id, %err, "resume notification failed");
                }
                info!(session_id = %id, from = ?kind, "session resumed");
            }
            true
        }
        .instrument(span)
        .await
    }

    /// Stop and finalize the session.
    ///
    /// All scheduled tasks are cancelled unconditionally and the phase
    /// becomes `Stopped` even when the remote finalize call fails, so no
    /// scheduler can outlive the session. The server is authoritative for
    /// the returned figures; on remote failure the locally-counted summary
    /// is stored with `synchronized = false` and the error is surfaced.
    /// Idempotent: a second call returns the stored summary without a
    /// second remote call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidState`] if no session was ever started,
    /// or [`AppError::Stop`] if the remote finalize call fails.
    pub async fn stop(&self) -> Result<SessionSummary> {
        let span = info_span!("stop_session");
        async move {
            let mut state = self.inner.state.lock().await;
            match mem::replace(&mut state.phase, Phase::Idle) {
                Phase::Idle => Err(AppError::InvalidState("no session to stop".into())),
                Phase::Stopped { summary } => {
                    state.phase = Phase::Stopped {
                        summary: summary.clone(),
                    };
                    Ok(summary)
                }
                prior => {
                    if let Phase::Running { ref tasks } = prior {
                        tasks.cancel();
                    }
                    drop(prior);

                    let elapsed = state.elapsed_seconds;
                    let local = SessionSummary::local(elapsed);
                    state.phase = Phase::Stopped {
                        summary: local.clone(),
                    };

                    let Some(id) = state.id.clone() else {
                        return Ok(local);
                    };

                    match self.inner.service.stop(&id, elapsed).await {
                        Ok(receipt) => {
                            let summary = SessionSummary {
                                elapsed_seconds: receipt.elapsed_seconds,
                                formatted_duration: receipt.formatted_duration,
                                synchronized: true,
                            };
                            state.phase = Phase::Stopped {
                                summary: summary.clone(),
                            };
                            info!(
                                session_id = %id,
                                elapsed_seconds = summary.elapsed_seconds,
                                "session stopped"
                            );
                            Ok(summary)
                        }
                        Err(err) => {
                            warn!(
                                session_id = %id,
                                %err,
                                "remote finalize failed; session stopped locally"
                            );
                            Err(err)
                        }
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Current lifecycle status.
    pub async fn status(&self) -> SessionStatus {
        self.inner.state.lock().await.status()
    }

    /// Active seconds accumulated so far.
    pub async fn elapsed_seconds(&self) -> u64 {
        self.inner.state.lock().await.elapsed_seconds
    }

    /// Point-in-time snapshot of the session.
    pub async fn session(&self) -> Session {
        self.inner.state.lock().await.snapshot()
    }
}
