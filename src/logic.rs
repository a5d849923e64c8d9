/*
Streak, rotation and formatting rules.
Module was independently written from HTTP / Axum for testing
*/

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::{Metrics, MetricsSummary, Settings, TimerMode};

// Calendar date of `at` as seen from the offset of `now`
fn local_date(at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> NaiveDate {
    at.with_timezone(now.offset()).date_naive()
}

// Next daily streak after a completed focus session.
//
// Rules:
// - streak 0 -> 1 (first session, or first since a reset)
// - last update today -> unchanged
// - last update yesterday -> +1
// - any other gap, or a date in the future -> 1
pub fn next_streak(
    current: u32,
    last_updated: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> u32 {
    if current == 0 {
        return 1;
    }
    let today = now.date_naive();
    let last = local_date(last_updated, now);

    if last == today {
        current
    } else if last.succ_opt() == Some(today) {
        current.saturating_add(1)
    } else {
        1
    }
}

// Mode that follows a completed session, plus the new cycle counter.
//
// focus -> short break, or long break once `cycles_before_long_break`
// focus sessions have completed; any break -> focus.
pub fn next_mode(mode: TimerMode, cycle: u32, cycles_before_long_break: u32) -> (TimerMode, u32) {
    match mode {
        TimerMode::Focus => {
            let next_cycle = (cycle + 1) % cycles_before_long_break.max(1);
            if next_cycle == 0 {
                (TimerMode::LongBreak, next_cycle)
            } else {
                (TimerMode::ShortBreak, next_cycle)
            }
        }
        TimerMode::ShortBreak | TimerMode::LongBreak => (TimerMode::Focus, cycle),
    }
}

pub fn duration_secs(settings: &Settings, mode: TimerMode) -> u64 {
    u64::from(settings.minutes_for(mode)) * 60
}

// "MM:SS"; minutes keep growing past 99
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

// Share of the session already elapsed, 0.0..=1.0
pub fn progress(remaining: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    1.0 - remaining.min(total) as f64 / total as f64
}

// Rounded minutes per focus session, 0 when nothing is recorded
pub fn average_focus_minutes(metrics: &Metrics) -> u64 {
    if metrics.focus_sessions == 0 {
        return 0;
    }
    (metrics.total_focus_time as f64 / metrics.focus_sessions as f64).round() as u64
}

pub fn summarize(metrics: &Metrics) -> MetricsSummary {
    MetricsSummary {
        focus_sessions: metrics.focus_sessions,
        total_focus_time: format!("{}m", metrics.total_focus_time),
        average_focus_time: format!("{}m", average_focus_minutes(metrics)),
        daily_streak: metrics.daily_streak,
        best_focus_streak: metrics.best_focus_streak,
        total_tasks_completed: metrics.total_tasks_completed,
        short_breaks: metrics.short_breaks,
        long_breaks: metrics.long_breaks,
    }
}
