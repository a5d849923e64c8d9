//! The dashboard state container.
//!
//! `Dashboard` owns settings, metrics, the task board, the countdown and
//! the sound mixer. It is loaded once from a [`KvStore`] and every
//! mutation persists the record it touched. Write failures are logged and
//! never surface to the caller; the in-memory state stays authoritative.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::atmosphere::Mixer;
use crate::board::{Board, BoardError, CompletionDelta};
use crate::clock::Clock;
use crate::logic;
use crate::models::{
    MetricCounter, MetricUpdate, Metrics, MetricsSummary, Settings, SettingsPatch, StreakField,
    Task, TaskStatus, TimerMode,
};
use crate::store::{self, KvStore, METRICS_KEY, SETTINGS_KEY, TASKS_KEY};
use crate::timer::{Countdown, Tick, TimerStatus};

pub struct Dashboard {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    settings: Settings,
    metrics: Metrics,
    board: Board,
    countdown: Countdown,
    mixer: Mixer,
}

impl Dashboard {
    /// Restore state from the store. Missing or malformed records fall
    /// back to their defaults.
    pub fn load(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let settings: Settings = store::load_json(store.as_ref(), SETTINGS_KEY).unwrap_or_default();
        let mut metrics: Metrics = store::load_json(store.as_ref(), METRICS_KEY)
            .unwrap_or_else(|| Metrics::zeroed(clock.now()));
        // Records missing bestFocusStreak come back with best below daily
        metrics.best_focus_streak = metrics.best_focus_streak.max(metrics.daily_streak);
        let tasks: Vec<Task> = store::load_json(store.as_ref(), TASKS_KEY).unwrap_or_default();

        info!(
            tasks = tasks.len(),
            focus_sessions = metrics.focus_sessions,
            "dashboard state loaded"
        );

        let countdown = Countdown::new(&settings);
        Self {
            store,
            clock,
            settings,
            metrics,
            board: Board::new(tasks),
            countdown,
            mixer: Mixer::default(),
        }
    }

    // ---------------- settings ----------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shallow-merge `patch` onto the current settings and persist.
    /// The countdown pauses and restarts the active mode at its new length.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> &Settings {
        self.settings = self.settings.merged(patch);
        debug!(settings = ?self.settings, "settings updated");
        self.persist_settings();
        self.resync_countdown();
        &self.settings
    }

    pub fn reset_settings(&mut self) -> &Settings {
        self.settings = Settings::default();
        self.persist_settings();
        self.resync_countdown();
        &self.settings
    }

    fn resync_countdown(&mut self) {
        let mode = self.countdown.mode();
        self.countdown.switch_mode(mode, &self.settings);
    }

    // ---------------- metrics ----------------

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn summary(&self) -> MetricsSummary {
        logic::summarize(&self.metrics)
    }

    pub fn update_metrics(&mut self, update: MetricUpdate) -> &Metrics {
        match update {
            MetricUpdate::Increment { counter, delta } => self.increment(counter, delta),
            MetricUpdate::SetStreak { field, value } => self.set_streak(field, value),
        }
    }

    /// Add `delta` to an additive counter. A positive focus-session delta
    /// also advances the daily streak.
    pub fn increment(&mut self, counter: MetricCounter, delta: i64) -> &Metrics {
        let now = self.clock.now();
        let slot = self.metrics.counter_mut(counter);
        let before = *slot;
        *slot = before.saturating_add_signed(delta);
        if delta < 0 && before < delta.unsigned_abs() {
            warn!(?counter, before, delta, "counter decrement clamped at zero");
        }

        if counter == MetricCounter::FocusSessions && delta > 0 {
            let streak = logic::next_streak(self.metrics.daily_streak, self.metrics.last_updated, now);
            self.apply_streak(streak);
        }

        self.metrics.last_updated = now;
        debug!(?counter, delta, value = self.metrics.counter(counter), "metrics incremented");
        self.persist_metrics();
        &self.metrics
    }

    /// Set a streak field to an absolute value. The best streak is never
    /// lowered here and never falls below the daily streak; only
    /// [`Dashboard::reset_metrics`] brings it back down.
    pub fn set_streak(&mut self, field: StreakField, value: u32) -> &Metrics {
        match field {
            StreakField::DailyStreak => self.apply_streak(value),
            StreakField::BestFocusStreak => {
                let best = value
                    .max(self.metrics.daily_streak)
                    .max(self.metrics.best_focus_streak);
                if best != value {
                    warn!(value, best, "best streak cannot go below the recorded best");
                }
                self.metrics.best_focus_streak = best;
            }
        }
        self.metrics.last_updated = self.clock.now();
        debug!(?field, value, "streak set");
        self.persist_metrics();
        &self.metrics
    }

    fn apply_streak(&mut self, streak: u32) {
        self.metrics.daily_streak = streak;
        if streak > self.metrics.best_focus_streak {
            self.metrics.best_focus_streak = streak;
        }
    }

    pub fn reset_metrics(&mut self) -> &Metrics {
        self.metrics = Metrics::zeroed(self.clock.now());
        info!("metrics reset");
        self.persist_metrics();
        &self.metrics
    }

    // ---------------- task board ----------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn add_task(&mut self, title: &str) -> Result<Task, BoardError> {
        let task = self.board.add_task(title)?;
        self.persist_tasks();
        Ok(task)
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> Result<Task, BoardError> {
        let task = self.board.rename_task(id, title)?;
        self.persist_tasks();
        Ok(task)
    }

    // Removing a Done task leaves the completed counter alone
    pub fn remove_task(&mut self, id: &str) -> Result<Task, BoardError> {
        let task = self.board.remove_task(id)?;
        self.persist_tasks();
        Ok(task)
    }

    pub fn clear_board(&mut self) -> usize {
        let removed = self.board.clear();
        if let Err(e) = self.store.remove(TASKS_KEY) {
            error!(error = %e, "failed to clear stored tasks");
        }
        info!(removed, "board cleared");
        removed
    }

    /// Move a task and report a Done-boundary crossing to the
    /// completed-tasks counter, once per crossing.
    pub fn move_task(&mut self, id: &str, status: TaskStatus) -> Result<Task, BoardError> {
        let (task, delta) = self.board.move_task(id, status)?;
        self.persist_tasks();
        if let Some(delta) = delta {
            self.report_completion(delta);
        }
        Ok(task)
    }

    /// Apply several moves; each transition is reported on its own.
    /// Stops at the first unknown id, keeping the moves before it.
    pub fn move_tasks(&mut self, moves: &[(String, TaskStatus)]) -> Result<Vec<Task>, BoardError> {
        moves
            .iter()
            .map(|(id, status)| self.move_task(id, *status))
            .collect()
    }

    fn report_completion(&mut self, delta: CompletionDelta) {
        self.increment(MetricCounter::TotalTasksCompleted, delta.as_delta());
    }

    // ---------------- countdown ----------------

    pub fn timer(&self) -> TimerStatus {
        self.countdown.status(&self.settings)
    }

    pub fn start_timer(&mut self) -> bool {
        self.countdown.start()
    }

    pub fn pause_timer(&mut self) {
        self.countdown.pause();
    }

    pub fn toggle_timer(&mut self) -> bool {
        self.countdown.toggle()
    }

    pub fn reset_timer(&mut self) {
        self.countdown.reset(&self.settings);
    }

    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.countdown.switch_mode(mode, &self.settings);
    }

    /// Advance the countdown by one second. When it hits zero the session
    /// is recorded and the next mode is armed (paused).
    pub fn tick(&mut self) -> Tick {
        let tick = self.countdown.tick();
        if let Tick::Finished(mode) = tick {
            self.complete_session(mode);
        }
        tick
    }

    /// Finish the current session now, without waiting for zero.
    pub fn skip(&mut self) -> TimerMode {
        let mode = self.countdown.mode();
        self.countdown.pause();
        self.complete_session(mode)
    }

    fn complete_session(&mut self, mode: TimerMode) -> TimerMode {
        match mode {
            TimerMode::Focus => {
                self.increment(MetricCounter::FocusSessions, 1);
                self.increment(MetricCounter::TotalFocusTime, i64::from(self.settings.focus_time));
            }
            TimerMode::ShortBreak => {
                self.increment(MetricCounter::ShortBreaks, 1);
            }
            TimerMode::LongBreak => {
                self.increment(MetricCounter::LongBreaks, 1);
            }
        }
        let next = self.countdown.advance(&self.settings);
        info!(finished = ?mode, next = ?next, cycle = self.countdown.cycle(), "session complete");
        next
    }

    // ---------------- atmosphere ----------------

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut Mixer {
        &mut self.mixer
    }

    // ---------------- persistence ----------------

    fn persist_settings(&self) {
        if let Err(e) = store::save_json(self.store.as_ref(), SETTINGS_KEY, &self.settings) {
            error!(error = %e, "failed to persist settings");
        }
    }

    fn persist_metrics(&self) {
        if let Err(e) = store::save_json(self.store.as_ref(), METRICS_KEY, &self.metrics) {
            error!(error = %e, "failed to persist metrics");
        }
    }

    fn persist_tasks(&self) {
        if let Err(e) = store::save_json(self.store.as_ref(), TASKS_KEY, &self.board.tasks()) {
            error!(error = %e, "failed to persist tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn skip_during_focus_records_session_and_moves_to_break() {
        let clock = Arc::new(ManualClock::new(
            FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
        ));
        let mut d = Dashboard::load(Arc::new(MemoryStore::new()), clock);
        d.start_timer();

        assert_eq!(d.skip(), TimerMode::ShortBreak);
        assert_eq!(d.metrics().focus_sessions, 1);
        assert_eq!(d.metrics().total_focus_time, 25);
        assert_eq!(d.metrics().daily_streak, 1);
        assert!(!d.timer().running);
        assert_eq!(d.timer().remaining_secs, 5 * 60);

        assert_eq!(d.skip(), TimerMode::Focus);
        assert_eq!(d.metrics().short_breaks, 1);
        assert_eq!(d.metrics().focus_sessions, 1);
    }

    #[test]
    fn settings_change_pauses_and_resizes_active_mode() {
        let clock = Arc::new(ManualClock::new(
            FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
        ));
        let mut d = Dashboard::load(Arc::new(MemoryStore::new()), clock);
        d.start_timer();
        d.tick();
        d.update_settings(SettingsPatch {
            focus_time: Some(50),
            ..SettingsPatch::default()
        });
        let t = d.timer();
        assert!(!t.running);
        assert_eq!(t.remaining_secs, 50 * 60);
    }
}
