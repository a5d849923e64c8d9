//! Scheduled countdown ticks.
//!
//! At most one ticking task exists at a time: `arm` cancels any previous
//! task before spawning a new one. Cancellation is cooperative through a
//! oneshot signal checked ahead of every tick.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

use crate::state::Dashboard;
use crate::timer::Tick;

pub type SharedDashboard = Arc<Mutex<Dashboard>>;

pub fn lock(dashboard: &SharedDashboard) -> MutexGuard<'_, Dashboard> {
    dashboard.lock().unwrap_or_else(|e| e.into_inner())
}

struct TickerHandle {
    cancel: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

pub struct Ticker {
    period: Duration,
    slot: Mutex<Option<TickerHandle>>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            slot: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<TickerHandle>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start ticking `dashboard` once per period. The task ends on its own
    /// when the countdown stops running or finishes a session.
    pub fn arm(&self, dashboard: SharedDashboard) {
        let mut slot = self.slot();
        if let Some(old) = slot.take() {
            let _ = old.cancel.send(());
        }

        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let period = self.period;
        let join = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancelled => {
                        debug!("ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let tick = lock(&dashboard).tick();
                        match tick {
                            Tick::Counting(_) => {}
                            Tick::Idle | Tick::Finished(_) => {
                                debug!(?tick, "ticker stopped");
                                break;
                            }
                        }
                    }
                }
            }
        });

        *slot = Some(TickerHandle { cancel, join });
    }

    /// Arm only when no ticking task is alive, keeping the phase of a
    /// countdown that is already running. Returns whether a task was spawned.
    pub fn ensure_armed(&self, dashboard: SharedDashboard) -> bool {
        if self.is_armed() {
            return false;
        }
        self.arm(dashboard);
        true
    }

    /// Cancel the running task, if any. Returns whether one was running.
    pub fn disarm(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let was_running = !handle.join.is_finished();
                let _ = handle.cancel.send(());
                was_running
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|handle| !handle.join.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}
