use super::AppState;
use super::handlers::{ApiResponse, authenticate, error_response, internal_error, json_body};
use crate::error::TaskInputError;
use crate::tasks::TaskInput;
use axum::{
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

fn not_found() -> ApiResponse {
    error_response(StatusCode::NOT_FOUND, "Task not found")
}

fn bad_input(error: &TaskInputError) -> ApiResponse {
    error_response(StatusCode::BAD_REQUEST, error.to_string())
}

/// Ids that do not parse can never match a task.
fn task_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiResponse> {
    path.map(|Path(id)| id).map_err(|_| not_found())
}

/// Reject assignment to an account that does not exist.
async fn ensure_assignee(state: &AppState, assignee: i64, caller: i64) -> Result<(), ApiResponse> {
    if assignee == caller {
        return Ok(());
    }
    let found = state
        .users
        .find_by_id(assignee)
        .await
        .map_err(|error| internal_error("look up assignee", &error))?;
    match found {
        Some(_) => Ok(()),
        None => Err(bad_input(&TaskInputError::UnknownAssignee(assignee))),
    }
}

/// GET /api/tasks
pub(super) async fn handle_list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    list_tasks(&state, &headers)
        .await
        .unwrap_or_else(|response| response)
}

async fn list_tasks(state: &AppState, headers: &HeaderMap) -> Result<ApiResponse, ApiResponse> {
    let user_id = authenticate(state, headers)?;
    let tasks = state
        .tasks
        .list_for_user(user_id)
        .await
        .map_err(|error| internal_error("list tasks", &error))?;
    Ok((StatusCode::OK, Json(json!({"tasks": tasks}))))
}

/// POST /api/tasks
pub(super) async fn handle_create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> impl IntoResponse {
    create_task(&state, &headers, body)
        .await
        .unwrap_or_else(|response| response)
}

async fn create_task(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let user_id = authenticate(state, headers)?;
    let new_task = json_body(body)?
        .into_new_task(user_id)
        .map_err(|error| bad_input(&error))?;
    ensure_assignee(state, new_task.assigned_to, user_id).await?;

    let task = state
        .tasks
        .create(new_task)
        .await
        .map_err(|error| internal_error("create task", &error))?;
    tracing::info!(task_id = task.id, user_id, "task created");
    Ok((StatusCode::CREATED, Json(json!({"task": task}))))
}

/// GET /api/tasks/{id}
pub(super) async fn handle_get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    get_task(&state, &headers, path)
        .await
        .unwrap_or_else(|response| response)
}

async fn get_task(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let user_id = authenticate(state, headers)?;
    let id = task_id(path)?;
    let task = state
        .tasks
        .get_visible(id, user_id)
        .await
        .map_err(|error| internal_error("get task", &error))?
        .ok_or_else(not_found)?;
    Ok((StatusCode::OK, Json(json!({"task": task}))))
}

/// PUT /api/tasks/{id}
///
/// Absent fields keep their stored values.
pub(super) async fn handle_update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> impl IntoResponse {
    update_task(&state, &headers, path, body)
        .await
        .unwrap_or_else(|response| response)
}

async fn update_task(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskInput>, JsonRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let user_id = authenticate(state, headers)?;
    let id = task_id(path)?;
    let patch = json_body(body)?
        .into_patch()
        .map_err(|error| bad_input(&error))?;
    if let Some(assignee) = patch.assigned_to {
        ensure_assignee(state, assignee, user_id).await?;
    }

    let task = state
        .tasks
        .update(id, user_id, patch)
        .await
        .map_err(|error| internal_error("update task", &error))?
        .ok_or_else(not_found)?;
    tracing::info!(task_id = task.id, user_id, "task updated");
    Ok((StatusCode::OK, Json(json!({"task": task}))))
}

/// DELETE /api/tasks/{id} (soft delete)
pub(super) async fn handle_delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    delete_task(&state, &headers, path)
        .await
        .unwrap_or_else(|response| response)
}

async fn delete_task(
    state: &AppState,
    headers: &HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let user_id = authenticate(state, headers)?;
    let id = task_id(path)?;
    let deleted = state
        .tasks
        .soft_delete(id, user_id)
        .await
        .map_err(|error| internal_error("delete task", &error))?;
    if !deleted {
        return Err(not_found());
    }
    tracing::info!(task_id = id, user_id, "task deleted");
    Ok((
        StatusCode::OK,
        Json(json!({"message": "Task deleted successfully"})),
    ))
}
