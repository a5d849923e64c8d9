//! Tests for the scheduled countdown ticker, using millisecond periods.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{FixedOffset, TimeZone};
use focusflow::clock::ManualClock;
use focusflow::models::{SettingsPatch, TimerMode};
use focusflow::state::Dashboard;
use focusflow::store::MemoryStore;
use focusflow::ticker::{SharedDashboard, Ticker, lock};

/// Dashboard with one-minute focus sessions.
fn setup_dashboard() -> SharedDashboard {
    let clock = ManualClock::new(
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 2, 2, 8, 0, 0)
            .unwrap(),
    );
    let mut d = Dashboard::load(Arc::new(MemoryStore::new()), Arc::new(clock));
    d.update_settings(SettingsPatch {
        focus_time: Some(1),
        short_break_time: Some(1),
        ..SettingsPatch::default()
    });
    Arc::new(Mutex::new(d))
}

async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..500 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn countdown_runs_to_completion_and_stops_itself() {
    let dashboard = setup_dashboard();
    let ticker = Ticker::new(Duration::from_millis(1));

    assert!(lock(&dashboard).start_timer());
    ticker.arm(dashboard.clone());

    wait_until(|| lock(&dashboard).metrics().focus_sessions == 1).await;
    wait_until(|| !ticker.is_armed()).await;

    let d = lock(&dashboard);
    assert_eq!(d.metrics().total_focus_time, 1);
    assert_eq!(d.metrics().daily_streak, 1);
    let status = d.timer();
    assert_eq!(status.mode, TimerMode::ShortBreak);
    assert!(!status.running);
    assert_eq!(status.remaining_secs, 60);
}

#[tokio::test]
async fn disarm_stops_ticking() {
    let dashboard = setup_dashboard();
    let ticker = Ticker::new(Duration::from_millis(5));

    lock(&dashboard).start_timer();
    ticker.arm(dashboard.clone());
    wait_until(|| lock(&dashboard).timer().remaining_secs < 58).await;

    assert!(ticker.disarm());
    tokio::time::sleep(Duration::from_millis(20)).await;
    let frozen = lock(&dashboard).timer().remaining_secs;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(lock(&dashboard).timer().remaining_secs, frozen);
    assert!(!ticker.is_armed());
    assert!(!ticker.disarm());
}

#[tokio::test]
async fn rearming_replaces_previous_countdown() {
    let dashboard = setup_dashboard();
    let ticker = Ticker::new(Duration::from_millis(20));

    lock(&dashboard).start_timer();
    ticker.arm(dashboard.clone());
    ticker.arm(dashboard.clone());
    ticker.arm(dashboard.clone());

    tokio::time::sleep(Duration::from_millis(300)).await;
    ticker.disarm();

    // One ticker gives about 15 ticks here; three would give about 45
    let elapsed = 60 - lock(&dashboard).timer().remaining_secs;
    assert!(elapsed > 0);
    assert!(elapsed < 25, "counted {elapsed} ticks");
}

#[tokio::test]
async fn paused_countdown_ends_the_task() {
    let dashboard = setup_dashboard();
    let ticker = Ticker::new(Duration::from_millis(2));

    ticker.arm(dashboard.clone());
    wait_until(|| !ticker.is_armed()).await;
    assert_eq!(lock(&dashboard).timer().remaining_secs, 60);
}

#[tokio::test]
async fn ensure_armed_keeps_a_live_ticker() {
    let dashboard = setup_dashboard();
    let ticker = Ticker::new(Duration::from_millis(20));

    lock(&dashboard).start_timer();
    assert!(ticker.ensure_armed(dashboard.clone()));
    assert!(!ticker.ensure_armed(dashboard.clone()));
    assert!(ticker.is_armed());

    ticker.disarm();
    assert!(ticker.ensure_armed(dashboard.clone()));
    ticker.disarm();
}
