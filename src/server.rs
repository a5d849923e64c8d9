use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::routes_tasks;
use crate::routes_timer;
use crate::state::Dashboard;
use crate::ticker::{SharedDashboard, Ticker};

// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    pub ticker: Arc<Ticker>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, ticker: Ticker) -> Self {
        Self {
            dashboard: Arc::new(std::sync::Mutex::new(dashboard)),
            ticker: Arc::new(ticker),
        }
    }
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        // settings
        .route("/settings", get(routes_timer::get_settings).put(routes_timer::put_settings))
        .route("/settings/reset", post(routes_timer::reset_settings))
        // metrics
        .route("/metrics", get(routes_timer::get_metrics).post(routes_timer::post_metrics))
        .route("/metrics/reset", post(routes_timer::reset_metrics))
        .route("/metrics/summary", get(routes_timer::get_summary))
        // timer
        .route("/timer", get(routes_timer::get_timer))
        .route("/timer/start", post(routes_timer::start_timer))
        .route("/timer/pause", post(routes_timer::pause_timer))
        .route("/timer/toggle", post(routes_timer::toggle_timer))
        .route("/timer/reset", post(routes_timer::reset_timer))
        .route("/timer/skip", post(routes_timer::skip_timer))
        .route("/timer/mode", post(routes_timer::switch_mode))
        // sounds
        .route("/sounds", get(routes_timer::get_sounds))
        .route("/sounds/:id/toggle", post(routes_timer::toggle_sound))
        .route("/sounds/volume", put(routes_timer::set_volume))
        .route("/sounds/mute", post(routes_timer::toggle_mute))
        // tasks
        .route(
            "/tasks",
            get(routes_tasks::get_tasks)
                .post(routes_tasks::create_task)
                .delete(routes_tasks::clear_tasks),
        )
        .route("/tasks/:id", put(routes_tasks::update_task).delete(routes_tasks::delete_task))
        .route("/tasks/:id/move", post(routes_tasks::move_task))
        .route("/tasks/move", post(routes_tasks::move_tasks))
}

pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .nest("/api", api_router())
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
