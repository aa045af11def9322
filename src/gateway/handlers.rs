use super::AppState;
use crate::auth::{self, LoginInput, NewUser, RegisterInput, User};
use crate::error::StoreError;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json},
};
use serde_json::{Value, json};

pub(super) type ApiResponse = (StatusCode, Json<Value>);

pub(super) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (status, Json(json!({"error": message.into()})))
}

pub(super) fn internal_error(context: &str, error: &dyn std::fmt::Display) -> ApiResponse {
    tracing::error!("{context}: {error}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Unwrap a JSON body or produce the 400 the client should see.
pub(super) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiResponse> {
    body.map(|Json(value)| value).map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON: {}", rejection.body_text()),
        )
    })
}

/// Resolve the caller's user id from `Authorization: Bearer <jwt>`.
pub(super) fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<i64, ApiResponse> {
    let unauthorized = || error_response(StatusCode::UNAUTHORIZED, "Unauthorized");

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(auth::bearer_token)
        .ok_or_else(unauthorized)?;

    state.signer.verify(token).map(|claims| claims.user_id).map_err(|error| {
        tracing::debug!("rejected bearer token: {error}");
        unauthorized()
    })
}

fn session_response(status: StatusCode, state: &AppState, user: &User) -> ApiResponse {
    let token = state.signer.issue(user.id);
    (status, Json(json!({"user": user, "token": token})))
}

/// GET /health (public)
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// POST /api/auth/register
pub(super) async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> impl IntoResponse {
    register(&state, body).await.unwrap_or_else(|response| response)
}

async fn register(
    state: &AppState,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let input = json_body(body)?;
    let valid = input
        .validate()
        .map_err(|error| error_response(StatusCode::BAD_REQUEST, error.to_string()))?;

    let iterations = state.password_iterations;
    let password = valid.password;
    let password_hash =
        tokio::task::spawn_blocking(move || auth::hash_password(&password, iterations))
            .await
            .map_err(|error| internal_error("password hashing task failed", &error))?;

    let user = state
        .users
        .create(NewUser {
            name: valid.name,
            email: valid.email,
            password_hash,
        })
        .await
        .map_err(|error| match error {
            StoreError::DuplicateEmail => {
                error_response(StatusCode::CONFLICT, "Email already in use")
            }
            other => internal_error("create user", &other),
        })?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(session_response(StatusCode::CREATED, state, &user))
}

/// POST /api/auth/login
pub(super) async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> impl IntoResponse {
    login(&state, body).await.unwrap_or_else(|response| response)
}

async fn login(
    state: &AppState,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let invalid = || error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");

    let input = json_body(body)?;
    let email = input.normalized_email().ok_or_else(invalid)?;
    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|error| internal_error("look up user", &error))?
        .ok_or_else(invalid)?;

    let password = input.password;
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || auth::verify_password(&password, &stored))
        .await
        .map_err(|error| internal_error("password verification task failed", &error))?
        .map_err(|error| internal_error("verify password", &error))?;
    if !verified {
        tracing::debug!(user_id = user.id, "login rejected");
        return Err(invalid());
    }

    Ok(session_response(StatusCode::OK, state, &user))
}
