use crate::gateway_harness::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn create_task(
    server: &GatewayTestServer,
    client: &reqwest::Client,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = client
        .post(server.url("/api/tasks"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("create request should complete");
    let status = response.status();
    (status, response.json().await.expect("create body should be json"))
}

#[tokio::test]
async fn task_lifecycle() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let token = server.register(&client, "ada").await;

    let (status, body) = create_task(
        &server,
        &client,
        &token,
        json!({"title": "Prepare release", "description": "v1", "due_date": "2026-11-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["task"]["status"], "pending");
    assert_eq!(body["task"]["priority"], "medium");
    let id = body["task"]["id"].as_i64().expect("task id should be numeric");

    let updated = client
        .put(server.url(&format!("/api/tasks/{id}")))
        .bearer_auth(&token)
        .json(&json!({"status": "completed", "priority": "low"}))
        .send()
        .await
        .expect("update request should complete");
    assert_eq!(updated.status(), StatusCode::OK);
    let body: Value = updated.json().await.expect("update body should be json");
    assert_eq!(body["task"]["status"], "completed");
    assert_eq!(body["task"]["priority"], "low");
    assert_eq!(body["task"]["description"], "v1");

    let listed: Value = client
        .get(server.url("/api/tasks"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("list request should complete")
        .json()
        .await
        .expect("list body should be json");
    assert_eq!(listed["tasks"].as_array().map(Vec::len), Some(1));

    let deleted = client
        .delete(server.url(&format!("/api/tasks/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request should complete");
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = deleted.json().await.expect("delete body should be json");
    assert_eq!(body["message"], "Task deleted successfully");

    let gone = client
        .get(server.url(&format!("/api/tasks/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .expect("get request should complete");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_users_cannot_touch_task() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let ada = server.register(&client, "ada").await;
    let eve = server.register(&client, "eve").await;

    let (_, body) = create_task(&server, &client, &ada, json!({"title": "private"})).await;
    let id = body["task"]["id"].as_i64().expect("task id should be numeric");
    let task_url = server.url(&format!("/api/tasks/{id}"));

    let get = client.get(&task_url).bearer_auth(&eve).send().await.unwrap();
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let put = client
        .put(&task_url)
        .bearer_auth(&eve)
        .json(&json!({"title": "mine now"}))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::NOT_FOUND);

    let delete = client.delete(&task_url).bearer_auth(&eve).send().await.unwrap();
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let still_there = client.get(&task_url).bearer_auth(&ada).send().await.unwrap();
    assert_eq!(still_there.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_task_input_is_bad_request() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let token = server.register(&client, "ada").await;

    for body in [
        json!({"description": "no title"}),
        json!({"title": "x", "status": "archived"}),
        json!({"title": "x", "priority": "critical"}),
        json!({"title": "x", "assigned_to": 999}),
    ] {
        let (status, response) = create_task(&server, &client, &token, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {response}");
    }
}

#[tokio::test]
async fn non_numeric_task_id_is_not_found() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let token = server.register(&client, "ada").await;

    let response = client
        .get(server.url("/api/tasks/abc"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
