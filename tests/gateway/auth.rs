use crate::gateway_harness::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn register_then_login_issues_tokens() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let registered = client
        .post(server.url("/api/auth/register"))
        .json(&json!({"name": "Ada", "email": "Ada@Example.com", "password": "hunter22"}))
        .send()
        .await
        .expect("register request should complete");
    assert_eq!(registered.status(), StatusCode::CREATED);
    let body: Value = registered.json().await.expect("register body should be json");
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].is_string());

    let login = client
        .post(server.url("/api/auth/login"))
        .json(&json!({"email": "ada@example.com", "password": "hunter22"}))
        .send()
        .await
        .expect("login request should complete");
    assert_eq!(login.status(), StatusCode::OK);
    let body: Value = login.json().await.expect("login body should be json");
    let token = body["token"].as_str().expect("login should return a token");

    let tasks = client
        .get(server.url("/api/tasks"))
        .bearer_auth(token)
        .send()
        .await
        .expect("list request should complete");
    assert_eq!(tasks.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    server.register(&client, "ada").await;

    let again = client
        .post(server.url("/api/auth/register"))
        .json(&json!({"name": "Ada Two", "email": "ada@example.com", "password": "hunter22"}))
        .send()
        .await
        .expect("duplicate register should complete");
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_registration_is_bad_request() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    for body in [
        json!({"name": "", "email": "a@b.c", "password": "hunter22"}),
        json!({"name": "Ada", "email": "not-an-email", "password": "hunter22"}),
        json!({"name": "Ada", "email": "a@b.c", "password": "123"}),
        json!({"email": "a@b.c"}),
    ] {
        let response = client
            .post(server.url("/api/auth/register"))
            .json(&body)
            .send()
            .await
            .expect("register request should complete");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let error: Value = response.json().await.expect("error body should be json");
        assert!(error["error"].is_string());
    }
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    server.register(&client, "ada").await;

    let response = client
        .post(server.url("/api/auth/login"))
        .json(&json!({"email": "ada@example.com", "password": "wrong-password"}))
        .send()
        .await
        .expect("login request should complete");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("error body should be json");
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let missing = client
        .get(server.url("/api/tasks"))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = client
        .post(server.url("/api/ai/suggest"))
        .bearer_auth("not-a-jwt")
        .json(&json!({"task_description": "anything"}))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}
