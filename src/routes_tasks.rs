// --------------------------------------------------
// Handles API endpoints for the task board.
//
// Responsibilities:
// - Create / read / rename / delete tasks, clear the board
// - Move tasks between columns (reports Done crossings to metrics)
// -------------------------------------------------

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::board::BoardError;
use crate::models::{Task, TaskStatus};
use crate::server::AppState;
use crate::ticker::lock;

fn board_error(e: BoardError) -> Response {
    let status = match e {
        BoardError::BlankTitle => StatusCode::BAD_REQUEST,
        BoardError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    (status, e.to_string()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct TasksQuery {
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub done: usize,
    pub total: usize,
    pub tasks: Vec<Task>,
}

// -----------------------------
// GET /api/tasks?status=Done
// All tasks in board order, optionally one column only
// -----------------------------
pub async fn get_tasks(State(app): State<AppState>, Query(q): Query<TasksQuery>) -> impl IntoResponse {
    let d = lock(&app.dashboard);
    let board = d.board();
    let (done, total) = board.completed_count();
    let tasks = match q.status {
        Some(status) => board.tasks_in(status).cloned().collect(),
        None => board.tasks().to_vec(),
    };
    Json(TasksResponse { done, total, tasks })
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
}

// -----------------------------
// POST /api/tasks
// New tasks start in "To Do"
// -----------------------------
pub async fn create_task(
    State(app): State<AppState>,
    Json(input): Json<CreateTaskInput>,
) -> impl IntoResponse {
    match lock(&app.dashboard).add_task(&input.title) {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => board_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskInput {
    pub title: String,
}

// -----------------------------
// PUT /api/tasks/:id
// Renames a task
// -----------------------------
pub async fn update_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTaskInput>,
) -> impl IntoResponse {
    match lock(&app.dashboard).rename_task(&id, &input.title) {
        Ok(task) => Json(task).into_response(),
        Err(e) => board_error(e),
    }
}

// -----------------------------
// DELETE /api/tasks/:id
// -----------------------------
pub async fn delete_task(State(app): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match lock(&app.dashboard).remove_task(&id) {
        Ok(_) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(e) => board_error(e),
    }
}

// -----------------------------
// DELETE /api/tasks
// Clears the whole board
// -----------------------------
pub async fn clear_tasks(State(app): State<AppState>) -> impl IntoResponse {
    let removed = lock(&app.dashboard).clear_board();
    Json(serde_json::json!({ "ok": true, "removed": removed }))
}

#[derive(Debug, Deserialize)]
pub struct MoveInput {
    pub status: TaskStatus,
}

// -----------------------------
// POST /api/tasks/:id/move
// Drop a task into another column
// -----------------------------
pub async fn move_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MoveInput>,
) -> impl IntoResponse {
    match lock(&app.dashboard).move_task(&id, input.status) {
        Ok(task) => Json(task).into_response(),
        Err(e) => board_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchMove {
    pub id: String,
    pub status: TaskStatus,
}

// -----------------------------
// POST /api/tasks/move
// Several moves at once, each reported on its own
// -----------------------------
pub async fn move_tasks(
    State(app): State<AppState>,
    Json(input): Json<Vec<BatchMove>>,
) -> impl IntoResponse {
    let moves: Vec<(String, TaskStatus)> = input.into_iter().map(|m| (m.id, m.status)).collect();
    match lock(&app.dashboard).move_tasks(&moves) {
        Ok(tasks) => Json(tasks).into_response(),
        Err(e) => board_error(e),
    }
}
