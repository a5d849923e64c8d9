//! FocusFlow: Pomodoro timer, task board and ambient sounds, with all
//! state kept in a small key-value store of JSON records.

pub mod atmosphere; // Ambient sound catalog and mixer state
pub mod board;      // Task board (To Do / In Progress / Done)
pub mod clock;      // Time source
pub mod config;     // Runtime configuration
pub mod logic;      // Streak, rotation and formatting rules
pub mod models;     // Data structures (Settings, Metrics, Task, etc.)
pub mod routes_tasks; // HTTP handlers for the task board
pub mod routes_timer; // HTTP handlers for settings, metrics, timer, sounds
pub mod server;     // Router and shared state
pub mod state;      // Dashboard state container
pub mod store;      // Key-value persistence
pub mod ticker;     // Scheduled countdown ticks
pub mod timer;      // Countdown state machine
