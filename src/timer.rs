//! Countdown state for the Pomodoro timer.
//!
//! Pure state; the owner reports metrics for a finished session and
//! drives ticks from a [`crate::ticker::Ticker`].

use serde::Serialize;

use crate::logic;
use crate::models::{Settings, TimerMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    mode: TimerMode,
    remaining: u64, // seconds
    running: bool,
    cycle: u32, // focus sessions completed in the current long-break cycle
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub clock: String,
    pub running: bool,
    pub cycle: u32,
    pub cycles_before_long_break: u32,
    pub progress: f64,
}

/// What happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Counting(u64),
    Finished(TimerMode),
}

impl Countdown {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining: logic::duration_secs(settings, TimerMode::Focus),
            running: false,
            cycle: 0,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    // Returns false when there is nothing left to count
    pub fn start(&mut self) -> bool {
        self.running = self.remaining > 0;
        self.running
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
            false
        } else {
            self.start()
        }
    }

    // Restart the current mode from its full length; keeps the running flag
    pub fn reset(&mut self, settings: &Settings) {
        self.remaining = logic::duration_secs(settings, self.mode);
    }

    pub fn switch_mode(&mut self, mode: TimerMode, settings: &Settings) {
        self.running = false;
        self.mode = mode;
        self.remaining = logic::duration_secs(settings, mode);
    }

    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Tick::Finished(self.mode)
        } else {
            Tick::Counting(self.remaining)
        }
    }

    /// Move on from a finished (or skipped) session. Returns the new mode.
    pub fn advance(&mut self, settings: &Settings) -> TimerMode {
        let (next, cycle) = logic::next_mode(self.mode, self.cycle, settings.cycles_before_long_break);
        self.cycle = cycle;
        self.switch_mode(next, settings);
        next
    }

    pub fn status(&self, settings: &Settings) -> TimerStatus {
        let total = logic::duration_secs(settings, self.mode);
        TimerStatus {
            mode: self.mode,
            remaining_secs: self.remaining,
            clock: logic::format_clock(self.remaining),
            running: self.running,
            cycle: self.cycle,
            cycles_before_long_break: settings.cycles_before_long_break,
            progress: logic::progress(self.remaining, total),
        }
    }
}
