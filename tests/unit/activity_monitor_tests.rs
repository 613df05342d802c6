//! Unit tests for last-activity bookkeeping.

use std::time::Duration;

use study_timer::ActivityMonitor;

#[tokio::test(start_paused = true)]
async fn time_since_tracks_advance() {
    let monitor = ActivityMonitor::new();

    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(monitor.time_since_last_activity(), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn record_activity_resets_elapsed() {
    let monitor = ActivityMonitor::new();

    tokio::time::advance(Duration::from_secs(45)).await;
    monitor.record_activity();
    assert_eq!(monitor.time_since_last_activity(), Duration::ZERO);

    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(monitor.time_since_last_activity(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn clones_share_the_same_record() {
    let monitor = ActivityMonitor::new();
    let writer = monitor.clone();

    tokio::time::advance(Duration::from_secs(20)).await;
    writer.record_activity();

    assert_eq!(monitor.time_since_last_activity(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn recording_is_idempotent() {
    let monitor = ActivityMonitor::new();

    monitor.record_activity();
    monitor.record_activity();
    monitor.record_activity();

    assert_eq!(monitor.time_since_last_activity(), Duration::ZERO);
}
