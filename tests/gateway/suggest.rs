use crate::gateway_harness::{GatewayTestServer, LlmSettings};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-1.5-pro:generateContent";

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    }))
}

async fn start_with_gemini(gemini: &MockServer) -> GatewayTestServer {
    GatewayTestServer::start_with_llm(LlmSettings {
        base_url: Some(gemini.uri()),
        api_key: Some("test-key".to_string()),
        timeout_secs: Some(1),
    })
    .await
}

async fn suggest(server: &GatewayTestServer, description: &str) -> (StatusCode, Value) {
    let client = reqwest::Client::new();
    let token = server.register(&client, "ada").await;
    let response = client
        .post(server.url("/api/ai/suggest"))
        .bearer_auth(token)
        .json(&json!({"task_description": description}))
        .send()
        .await
        .expect("suggest request should complete");
    let status = response.status();
    (status, response.json().await.expect("suggest body should be json"))
}

#[tokio::test]
async fn suggest_normalizes_fenced_reply() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(gemini_reply(
            "Here is the plan:\n```json\n{\"title\": \"Website launch\", \
             \"subtasks\": [\"Design\", \"Build\", \"Deploy\"], \"priority\": \"HIGH\", \
             \"time_estimate\": \"36 hours\"}\n```\nGood luck!",
        ))
        .expect(1)
        .mount(&gemini)
        .await;

    let server = start_with_gemini(&gemini).await;
    let (status, body) = suggest(&server, "Launch the new website").await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let suggestion = &body["suggestions"];
    assert_eq!(suggestion["title"], "Website launch");
    assert_eq!(suggestion["subtasks"], json!(["Design", "Build", "Deploy"]));
    assert_eq!(suggestion["priority"], "high");
    assert_eq!(suggestion["time_estimate_days"], 1.5);
}

#[tokio::test]
async fn unusable_reply_is_bad_gateway_with_kind() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply(
            "{\"title\": \"x\", \"subtasks\": [], \"priority\": \"urgent\", \"time_estimate\": \"1\"}",
        ))
        .mount(&gemini)
        .await;

    let server = start_with_gemini(&gemini).await;
    let (status, body) = suggest(&server, "Something").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Invalid AI response");
    assert_eq!(body["kind"], "InvalidPriority");
    assert_eq!(body["detail"], "priority is not one of low, medium, high");
}

#[tokio::test]
async fn rejected_reply_values_stay_out_of_the_response() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply(
            "{\"title\": \"x\", \"subtasks\": [],              \"priority\": \"<img src=x onerror=alert(1)> SECRET-PRIO\", \"time_estimate\": \"1\"}",
        ))
        .mount(&gemini)
        .await;

    let server = start_with_gemini(&gemini).await;
    let (status, body) = suggest(&server, "Something").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "InvalidPriority");
    let text = body.to_string();
    assert!(!text.contains("SECRET-PRIO"), "{text}");
    assert!(!text.contains("onerror"), "{text}");
}

#[tokio::test]
async fn provider_error_is_bad_gateway_without_leaking_details() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded: key=test-key"))
        .mount(&gemini)
        .await;

    let server = start_with_gemini(&gemini).await;
    let (status, body) = suggest(&server, "Something").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "LLM request failed"}));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply("{}").set_delay(Duration::from_secs(3)))
        .mount(&gemini)
        .await;

    let server = start_with_gemini(&gemini).await;
    let (status, _) = suggest(&server, "Something").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn missing_api_key_is_service_unavailable() {
    let server = GatewayTestServer::start().await;
    let (status, _) = suggest(&server, "Something").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn empty_description_is_bad_request() {
    let gemini = MockServer::start().await;
    let server = start_with_gemini(&gemini).await;
    let (status, _) = suggest(&server, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
