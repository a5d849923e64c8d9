// --------------------------------------------------
// Handles API endpoints for the timer side of the dashboard.
//
// Responsibilities:
// - Get / update / reset timer settings
// - Read and mutate metrics, analytics summary
// - Countdown control (start, pause, toggle, reset, skip, mode)
// - Ambient sound selection and volume
// -------------------------------------------------

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::atmosphere::{self, Sound};
use crate::models::{MetricUpdate, SettingsPatch, TimerMode};
use crate::server::AppState;
use crate::ticker::lock;

// -----------------------------
// GET /api/settings
// -----------------------------
pub async fn get_settings(State(app): State<AppState>) -> impl IntoResponse {
    let d = lock(&app.dashboard);
    Json(d.settings().clone())
}

// -----------------------------
// PUT /api/settings
// Shallow-merges the given keys; stops the countdown
// -----------------------------
pub async fn put_settings(
    State(app): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> impl IntoResponse {
    app.ticker.disarm();
    let mut d = lock(&app.dashboard);
    Json(d.update_settings(patch).clone())
}

// -----------------------------
// POST /api/settings/reset
// -----------------------------
pub async fn reset_settings(State(app): State<AppState>) -> impl IntoResponse {
    app.ticker.disarm();
    let mut d = lock(&app.dashboard);
    Json(d.reset_settings().clone())
}

// -----------------------------
// GET /api/metrics
// -----------------------------
pub async fn get_metrics(State(app): State<AppState>) -> impl IntoResponse {
    let d = lock(&app.dashboard);
    Json(d.metrics().clone())
}

// -----------------------------
// POST /api/metrics
// Body: {"op":"increment",...} or {"op":"setStreak",...}
// -----------------------------
pub async fn post_metrics(
    State(app): State<AppState>,
    Json(update): Json<MetricUpdate>,
) -> impl IntoResponse {
    let mut d = lock(&app.dashboard);
    Json(d.update_metrics(update).clone())
}

// -----------------------------
// POST /api/metrics/reset
// -----------------------------
pub async fn reset_metrics(State(app): State<AppState>) -> impl IntoResponse {
    let mut d = lock(&app.dashboard);
    Json(d.reset_metrics().clone())
}

// -----------------------------
// GET /api/metrics/summary
// Only while the metrics beta flag is on
// -----------------------------
pub async fn get_summary(State(app): State<AppState>) -> impl IntoResponse {
    let d = lock(&app.dashboard);
    if !d.settings().beta_features.metrics {
        return (StatusCode::NOT_FOUND, "metrics panel disabled").into_response();
    }
    Json(d.summary()).into_response()
}

// -----------------------------
// GET /api/timer
// -----------------------------
pub async fn get_timer(State(app): State<AppState>) -> impl IntoResponse {
    let d = lock(&app.dashboard);
    Json(d.timer())
}

// -----------------------------
// POST /api/timer/start
// A countdown already ticking keeps its ticker
// -----------------------------
pub async fn start_timer(State(app): State<AppState>) -> impl IntoResponse {
    let (was_running, status) = {
        let mut d = lock(&app.dashboard);
        let was_running = d.timer().running;
        if !d.start_timer() {
            return (StatusCode::CONFLICT, "nothing left to count").into_response();
        }
        (was_running, d.timer())
    };
    if was_running {
        app.ticker.ensure_armed(app.dashboard.clone());
    } else {
        app.ticker.arm(app.dashboard.clone());
    }
    Json(status).into_response()
}

// -----------------------------
// POST /api/timer/pause
// -----------------------------
pub async fn pause_timer(State(app): State<AppState>) -> impl IntoResponse {
    app.ticker.disarm();
    let mut d = lock(&app.dashboard);
    d.pause_timer();
    Json(d.timer())
}

// -----------------------------
// POST /api/timer/toggle
// -----------------------------
pub async fn toggle_timer(State(app): State<AppState>) -> impl IntoResponse {
    let (running, status) = {
        let mut d = lock(&app.dashboard);
        let running = d.toggle_timer();
        (running, d.timer())
    };
    if running {
        app.ticker.arm(app.dashboard.clone());
    } else {
        app.ticker.disarm();
    }
    Json(status)
}

// -----------------------------
// POST /api/timer/reset
// Restarts the current mode; a running countdown keeps running
// -----------------------------
pub async fn reset_timer(State(app): State<AppState>) -> impl IntoResponse {
    let mut d = lock(&app.dashboard);
    d.reset_timer();
    Json(d.timer())
}

// -----------------------------
// POST /api/timer/skip
// Records the current session as complete and moves on
// -----------------------------
pub async fn skip_timer(State(app): State<AppState>) -> impl IntoResponse {
    app.ticker.disarm();
    let mut d = lock(&app.dashboard);
    let next = d.skip();
    info!(next = ?next, "session skipped");
    Json(d.timer())
}

#[derive(Debug, Deserialize)]
pub struct ModeInput {
    pub mode: TimerMode,
}

// -----------------------------
// POST /api/timer/mode
// -----------------------------
pub async fn switch_mode(
    State(app): State<AppState>,
    Json(input): Json<ModeInput>,
) -> impl IntoResponse {
    app.ticker.disarm();
    let mut d = lock(&app.dashboard);
    d.switch_mode(input.mode);
    Json(d.timer())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundsResponse {
    pub sounds: &'static [Sound],
    pub active: Option<&'static str>,
    pub volume: u8,
    pub playing: bool,
}

fn sounds_response(app: &AppState) -> SoundsResponse {
    let d = lock(&app.dashboard);
    let mixer = d.mixer();
    SoundsResponse {
        sounds: &atmosphere::SOUNDS,
        active: mixer.active().map(|s| s.id),
        volume: mixer.volume(),
        playing: mixer.is_playing(),
    }
}

// -----------------------------
// GET /api/sounds
// -----------------------------
pub async fn get_sounds(State(app): State<AppState>) -> impl IntoResponse {
    Json(sounds_response(&app))
}

// -----------------------------
// POST /api/sounds/:id/toggle
// -----------------------------
pub async fn toggle_sound(State(app): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let toggled = lock(&app.dashboard).mixer_mut().toggle(&id);
    if toggled.is_none() {
        return (StatusCode::NOT_FOUND, "sound not found").into_response();
    }
    Json(sounds_response(&app)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct VolumeInput {
    pub volume: u8,
}

// -----------------------------
// PUT /api/sounds/volume
// -----------------------------
pub async fn set_volume(
    State(app): State<AppState>,
    Json(input): Json<VolumeInput>,
) -> impl IntoResponse {
    lock(&app.dashboard).mixer_mut().set_volume(input.volume);
    Json(sounds_response(&app))
}

// -----------------------------
// POST /api/sounds/mute
// -----------------------------
pub async fn toggle_mute(State(app): State<AppState>) -> impl IntoResponse {
    lock(&app.dashboard).mixer_mut().toggle_mute();
    Json(sounds_response(&app))
}
