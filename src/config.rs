use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// FocusFlow: local Pomodoro timer and task board backend
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "FOCUSFLOW_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Directory holding the persisted JSON records
    #[arg(long, env = "FOCUSFLOW_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory of static files served at `/`
    #[arg(long = "static", env = "FOCUSFLOW_STATIC", default_value = "static")]
    pub static_dir: PathBuf,

    /// Countdown tick period in milliseconds
    #[arg(long, env = "FOCUSFLOW_TICK_MS", default_value_t = 1000)]
    pub tick_ms: u64,

    /// Log filter, e.g. "focusflow=debug"
    #[arg(long, env = "RUST_LOG", default_value = "focusflow=info")]
    pub log: String,
}

impl Config {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}
