//! Tests for the HTTP layer.
//!
//! Each test builds the full router over an in-memory store and sends
//! requests through it with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{FixedOffset, TimeZone};
use focusflow::clock::ManualClock;
use focusflow::server::{self, AppState};
use focusflow::state::Dashboard;
use focusflow::store::MemoryStore;
use focusflow::ticker::Ticker;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper to create the router and a handle on its shared state.
fn setup_app() -> (Router, AppState) {
    let clock = ManualClock::new(
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 4, 1, 10, 0, 0)
            .unwrap(),
    );
    let dashboard = Dashboard::load(Arc::new(MemoryStore::new()), Arc::new(clock));
    let state = AppState::new(dashboard, Ticker::new(Duration::from_millis(50)));
    let app = server::app(state.clone(), std::path::Path::new("static-does-not-exist"));
    (app, state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

mod settings_api_tests {
    use super::*;

    #[tokio::test]
    async fn put_settings_merges_and_stops_the_ticker() {
        let (app, state) = setup_app();

        let (status, _) = send(&app, "POST", "/api/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.ticker.is_armed());

        let (status, body) =
            send(&app, "PUT", "/api/settings", Some(json!({ "focusTime": 40 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["focusTime"], 40);
        assert_eq!(body["shortBreakTime"], 5);
        assert!(!state.ticker.is_armed());

        let (_, timer) = send(&app, "GET", "/api/timer", None).await;
        assert_eq!(timer["running"], false);
        assert_eq!(timer["remainingSecs"], 40 * 60);
    }
}

mod metrics_api_tests {
    use super::*;

    #[tokio::test]
    async fn summary_is_hidden_until_beta_flag_is_on() {
        let (app, _) = setup_app();

        let (status, _) = send(&app, "GET", "/api/metrics/summary", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(
            &app,
            "PUT",
            "/api/settings",
            Some(json!({ "betaFeatures": { "metrics": true } })),
        )
        .await;
        send(&app, "POST", "/api/timer/skip", None).await;

        let (status, body) = send(&app, "GET", "/api/metrics/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["focusSessions"], 1);
        assert_eq!(body["averageFocusTime"], "25m");
    }

    #[tokio::test]
    async fn set_best_streak_cannot_undercut_daily_streak() {
        let (app, _) = setup_app();
        send(
            &app,
            "POST",
            "/api/metrics",
            Some(json!({ "op": "setStreak", "field": "dailyStreak", "value": 6 })),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/metrics",
            Some(json!({ "op": "setStreak", "field": "bestFocusStreak", "value": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dailyStreak"], 6);
        assert_eq!(body["bestFocusStreak"], 6);
    }
}

mod timer_api_tests {
    use super::*;

    #[tokio::test]
    async fn start_on_zero_length_mode_conflicts() {
        let (app, state) = setup_app();
        send(&app, "PUT", "/api/settings", Some(json!({ "focusTime": 0 }))).await;

        let (status, _) = send(&app, "POST", "/api/timer/start", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!state.ticker.is_armed());
    }

    #[tokio::test]
    async fn starting_twice_keeps_one_ticker() {
        let (app, state) = setup_app();

        let (status, first) = send(&app, "POST", "/api/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["running"], true);
        let (status, _) = send(&app, "POST", "/api/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.ticker.is_armed());

        let (_, paused) = send(&app, "POST", "/api/timer/pause", None).await;
        assert_eq!(paused["running"], false);
        assert!(!state.ticker.is_armed());
    }

    #[tokio::test]
    async fn mode_switch_resets_duration() {
        let (app, _) = setup_app();
        let (status, body) =
            send(&app, "POST", "/api/timer/mode", Some(json!({ "mode": "longBreak" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "longBreak");
        assert_eq!(body["clock"], "15:00");
    }
}

mod sounds_api_tests {
    use super::*;

    #[tokio::test]
    async fn toggle_known_and_unknown_sounds() {
        let (app, _) = setup_app();

        let (status, body) = send(&app, "POST", "/api/sounds/rain/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], "rain");
        assert_eq!(body["playing"], true);

        let (status, _) = send(&app, "POST", "/api/sounds/whale-song/toggle", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, "POST", "/api/sounds/mute", None).await;
        assert_eq!(body["volume"], 0);
        assert_eq!(body["playing"], false);
    }
}

mod tasks_api_tests {
    use super::*;

    #[tokio::test]
    async fn board_errors_map_to_status_codes() {
        let (app, _) = setup_app();

        let (status, _) = send(&app, "POST", "/api/tasks", Some(json!({ "title": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/tasks/missing/move",
            Some(json!({ "status": "Done" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/api/tasks/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn moving_into_done_updates_completed_count() {
        let (app, _) = setup_app();

        let (status, task) =
            send(&app, "POST", "/api/tasks", Some(json!({ "title": "write tests" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task["status"], "To Do");
        let id = task["id"].as_str().unwrap().to_string();

        let (status, moved) = send(
            &app,
            "POST",
            &format!("/api/tasks/{id}/move"),
            Some(json!({ "status": "Done" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["status"], "Done");

        let (_, metrics) = send(&app, "GET", "/api/metrics", None).await;
        assert_eq!(metrics["totalTasksCompleted"], 1);

        let (_, listing) = send(&app, "GET", "/api/tasks?status=Done", None).await;
        assert_eq!(listing["done"], 1);
        assert_eq!(listing["total"], 1);
        assert_eq!(listing["tasks"].as_array().unwrap().len(), 1);
    }
}
