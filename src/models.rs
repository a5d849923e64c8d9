use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// Column a task sits in on the board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
}

// Advisory only, nothing enforces it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    #[default]
    Short,
    Long,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BetaFeatures {
    #[serde(default)]
    pub metrics: bool,
}

// User-editable timer settings, stored under "timerSettings"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub focus_time: u32,     // minutes
    pub short_break_time: u32,
    pub long_break_time: u32,
    pub cycles_before_long_break: u32, // >= 1
    pub break_type: BreakType,
    pub beta_features: BetaFeatures,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_time: 25,
            short_break_time: 5,
            long_break_time: 15,
            cycles_before_long_break: 4,
            break_type: BreakType::Short,
            beta_features: BetaFeatures::default(),
        }
    }
}

/// Partial settings update. Only top-level keys merge; `beta_features`
/// replaces the whole nested record when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub focus_time: Option<u32>,
    pub short_break_time: Option<u32>,
    pub long_break_time: Option<u32>,
    pub cycles_before_long_break: Option<u32>,
    pub break_type: Option<BreakType>,
    pub beta_features: Option<BetaFeatures>,
}

impl Settings {
    pub fn merged(&self, patch: SettingsPatch) -> Settings {
        Settings {
            focus_time: patch.focus_time.unwrap_or(self.focus_time),
            short_break_time: patch.short_break_time.unwrap_or(self.short_break_time),
            long_break_time: patch.long_break_time.unwrap_or(self.long_break_time),
            cycles_before_long_break: patch
                .cycles_before_long_break
                .unwrap_or(self.cycles_before_long_break),
            break_type: patch.break_type.unwrap_or(self.break_type),
            beta_features: patch.beta_features.unwrap_or_else(|| self.beta_features.clone()),
        }
    }

    // Configured length of a mode, in minutes
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_time,
            TimerMode::ShortBreak => self.short_break_time,
            TimerMode::LongBreak => self.long_break_time,
        }
    }
}

// Cumulative usage metrics, stored under "timerMetrics"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    pub focus_sessions: u64,
    pub short_breaks: u64,
    pub long_breaks: u64,
    pub total_focus_time: u64, // minutes
    pub total_break_time: u64, // never written
    pub last_updated: DateTime<FixedOffset>,
    pub daily_streak: u32,
    pub total_tasks_completed: u64,
    pub best_focus_streak: u32,
}

// Epoch timestamp; a record without lastUpdated never counts as "today"
impl Default for Metrics {
    fn default() -> Self {
        Self::zeroed(DateTime::<FixedOffset>::default())
    }
}

impl Metrics {
    pub fn zeroed(now: DateTime<FixedOffset>) -> Self {
        Self {
            focus_sessions: 0,
            short_breaks: 0,
            long_breaks: 0,
            total_focus_time: 0,
            total_break_time: 0,
            last_updated: now,
            daily_streak: 0,
            total_tasks_completed: 0,
            best_focus_streak: 0,
        }
    }

    pub fn counter(&self, counter: MetricCounter) -> u64 {
        match counter {
            MetricCounter::FocusSessions => self.focus_sessions,
            MetricCounter::TotalFocusTime => self.total_focus_time,
            MetricCounter::ShortBreaks => self.short_breaks,
            MetricCounter::LongBreaks => self.long_breaks,
            MetricCounter::TotalTasksCompleted => self.total_tasks_completed,
        }
    }

    pub fn counter_mut(&mut self, counter: MetricCounter) -> &mut u64 {
        match counter {
            MetricCounter::FocusSessions => &mut self.focus_sessions,
            MetricCounter::TotalFocusTime => &mut self.total_focus_time,
            MetricCounter::ShortBreaks => &mut self.short_breaks,
            MetricCounter::LongBreaks => &mut self.long_breaks,
            MetricCounter::TotalTasksCompleted => &mut self.total_tasks_completed,
        }
    }
}

// Fields updated additively
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MetricCounter {
    FocusSessions,
    TotalFocusTime,
    ShortBreaks,
    LongBreaks,
    TotalTasksCompleted,
}

// Fields set to an absolute value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StreakField {
    DailyStreak,
    BestFocusStreak,
}

/// A single metrics mutation.
///
/// JSON shape: `{"op":"increment","counter":"focusSessions","delta":1}` or
/// `{"op":"setStreak","field":"dailyStreak","value":3}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum MetricUpdate {
    Increment { counter: MetricCounter, delta: i64 },
    SetStreak { field: StreakField, value: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

// Metrics counters the dashboard shows, plus derived values
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub focus_sessions: u64,
    pub total_focus_time: String, // "125m"
    pub average_focus_time: String,
    pub daily_streak: u32,
    pub best_focus_streak: u32,
    pub total_tasks_completed: u64,
    pub short_breaks: u64,
    pub long_breaks: u64,
}
