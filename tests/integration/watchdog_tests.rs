//! Inactivity watchdog tests: auto-pause, baseline refresh, idempotency.

use study_timer::models::SessionStatus;
use study_timer::TimerEvent;

use super::test_helpers::{drain_events, step_secs, timer, SESSION_ID};

#[tokio::test(start_paused = true)]
async fn idle_session_auto_pauses_once() {
    let (timer, service, mut rx) = timer();
    timer.start("math", "user-1").await.expect("start succeeds");

    // 65 s with no activity signals: the watchdog fires at its first check
    // at or past the 60 s threshold.
    step_secs(65).await;
    assert_eq!(timer.status().await, SessionStatus::PausedAuto);

    let events = drain_events(&mut rx);
    let auto_pauses: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            TimerEvent::AutoPaused {
                session_id,
                idle_seconds,
            } => Some((session_id.clone(), *idle_seconds)),
            TimerEvent::HeartbeatFailed { .. } => None,
        })
        .collect();
    assert_eq!(auto_pauses.len(), 1, "exactly one auto-pause transition");
    assert_eq!(auto_pauses[0].0, SESSION_ID);
    assert!(auto_pauses[0].1 >= 60);

    assert_eq!(service.count("auto_pause"), 1);

    // Elapsed equals the clock ticks that fired before the pause; the
    // threshold check and the 60th tick share a boundary, so alignment
    // allows one tick of slack either way.
    let elapsed = timer.elapsed_seconds().await;
    assert!(
        (59..=61).contains(&elapsed),
        "elapsed should reflect pre-pause ticks, got {elapsed}"
    );

    // Frozen after the pause: no further ticks, no second auto-pause.
    step_secs(30).await;
    assert_eq!(timer.elapsed_seconds().await, elapsed);
    assert_eq!(timer.status().await, SessionStatus::PausedAuto);
    assert!(drain_events(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn activity_signals_prevent_auto_pause() {
    let (timer, _service, mut rx) = timer();
    timer.start("math", "user-1").await.expect("start succeeds");
    let activity = timer.activity();

    // Two minutes of work with an interaction every 30 s stays running.
    for _ in 0..4 {
        step_secs(30).await;
        activity.record_activity();
    }

    assert_eq!(timer.status().await, SessionStatus::Running);
    assert_eq!(timer.elapsed_seconds().await, 120);
    assert!(drain_events(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn resume_refreshes_activity_baseline() {
    let (timer, _service, mut rx) = timer();
    timer.start("math", "user-1").await.expect("start succeeds");

    step_secs(65).await;
    assert_eq!(timer.status().await, SessionStatus::PausedAuto);
    drain_events(&mut rx);

    // Resume with a stale pre-pause timestamp: the next watchdog check
    // must not instantly re-fire.
    assert!(timer.resume().await);
    assert_eq!(timer.status().await, SessionStatus::Running);

    step_secs(15).await;
    assert_eq!(timer.status().await, SessionStatus::Running);
    assert!(drain_events(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn auto_pause_is_noop_unless_running() {
    let (timer, service, _rx) = timer();

    assert!(!timer.auto_pause().await, "no-op before start");

    timer.start("math", "user-1").await.expect("start succeeds");
    assert!(timer.auto_pause().await);
    assert!(
        !timer.auto_pause().await,
        "second call has no further effect"
    );
    assert_eq!(timer.status().await, SessionStatus::PausedAuto);
    assert_eq!(service.count("auto_pause"), 1);
}

#[tokio::test(start_paused = true)]
async fn auto_pause_does_not_override_manual_pause() {
    let (timer, service, _rx) = timer();
    timer.start("math", "user-1").await.expect("start succeeds");

    assert!(timer.pause().await);
    assert!(!timer.auto_pause().await);
    assert_eq!(timer.status().await, SessionStatus::PausedManual);
    assert_eq!(service.count("auto_pause"), 0);
}

#[tokio::test(start_paused = true)]
async fn watchdog_never_fires_after_stop() {
    let (timer, service, mut rx) = timer();
    timer.start("math", "user-1").await.expect("start succeeds");
    timer.stop().await.expect("stop succeeds");

    // Idle far past the threshold: the stopped session stays stopped.
    step_secs(180).await;
    assert_eq!(timer.status().await, SessionStatus::Stopped);
    assert_eq!(service.count("auto_pause"), 0);
    assert!(drain_events(&mut rx).is_empty());
}
