use super::AppState;
use super::handlers::{ApiResponse, authenticate, error_response, json_body};
use crate::error::{LlmError, SuggestError};
use crate::suggest::SuggestionFailure;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub(super) struct SuggestInput {
    #[serde(default)]
    pub task_description: String,
}

/// POST /api/ai/suggest
pub(super) async fn handle_suggest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SuggestInput>, JsonRejection>,
) -> impl IntoResponse {
    suggest(&state, &headers, body)
        .await
        .unwrap_or_else(|response| response)
}

async fn suggest(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<SuggestInput>, JsonRejection>,
) -> Result<ApiResponse, ApiResponse> {
    let user_id = authenticate(state, headers)?;
    let input = json_body(body)?;

    let suggestion = state
        .suggestions
        .suggest(&input.task_description)
        .await
        .map_err(|error| suggest_error_response(&error))?;

    tracing::info!(
        user_id,
        provider = state.suggestions.provider_name(),
        priority = %suggestion.priority,
        subtasks = suggestion.subtasks.len(),
        "suggestion served"
    );
    Ok((StatusCode::OK, Json(json!({"suggestions": suggestion}))))
}

/// Map a suggestion failure to the status and body the client sees.
///
/// Model text never reaches the client. Pipeline failures carry the failure
/// kind and a fixed per-variant detail.
pub(super) fn suggest_error_response(error: &SuggestError) -> ApiResponse {
    match error {
        SuggestError::EmptyDescription => {
            error_response(StatusCode::BAD_REQUEST, "Task description is required")
        }
        SuggestError::Llm(LlmError::MissingApiKey { provider }) => {
            tracing::warn!(provider, "suggestion requested but no API key is configured");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "AI suggestions are not configured",
            )
        }
        SuggestError::Llm(LlmError::Timeout { provider, secs }) => {
            tracing::warn!(provider, secs, "LLM request timed out");
            error_response(StatusCode::GATEWAY_TIMEOUT, "LLM request timed out")
        }
        SuggestError::Llm(llm_error) => {
            tracing::warn!("LLM request failed: {llm_error}");
            error_response(StatusCode::BAD_GATEWAY, "LLM request failed")
        }
        SuggestError::Pipeline(pipeline_error) => {
            let failure = SuggestionFailure::from(pipeline_error);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Invalid AI response",
                    "kind": failure.kind,
                    "detail": failure.detail,
                })),
            )
        }
    }
}
