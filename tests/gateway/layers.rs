use crate::gateway_harness::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_is_public() {
    let server = GatewayTestServer::start().await;
    let body: Value = reqwest::get(server.url("/health"))
        .await
        .expect("health request should complete")
        .json()
        .await
        .expect("health body should be json");
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/auth/register"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body should be json");
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Invalid JSON")));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = GatewayTestServer::start().await;
    let huge = format!(r#"{{"name": "{}"}}"#, "a".repeat(70_000));
    let response = reqwest::Client::new()
        .post(server.url("/api/auth/register"))
        .header("Content-Type", "application/json")
        .body(huge)
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin_by_default() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/api/tasks"))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("preflight should complete");
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::get(server.url("/api/nope"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
