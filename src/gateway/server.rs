use super::handlers::{handle_health, handle_login, handle_register};
use super::suggest_handler::handle_suggest;
use super::tasks_handler::{
    handle_create_task, handle_delete_task, handle_get_task, handle_list_tasks, handle_update_task,
};
use super::{AppState, MAX_BODY_SIZE, request_timeout_secs};

use crate::auth::{SqliteUserStore, TokenSigner};
use crate::config::Config;
use crate::db;
use crate::suggest::SuggestionService;
use crate::tasks::SqliteTaskStore;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sqlx::SqlitePool;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway using axum with proper HTTP/1.1 compliance.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the API would be exposed beyond this machine.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    run_gateway_with_listener(host, listener, config).await
}

/// Wire stores, token signer and suggestion service from config.
pub fn build_gateway_state(config: &Config, pool: SqlitePool) -> Result<AppState> {
    let signer = TokenSigner::new(config.jwt_secret(), config.auth.token_ttl_hours)
        .context("create token signer")?;

    Ok(AppState {
        users: Arc::new(SqliteUserStore::new(pool.clone())),
        tasks: Arc::new(SqliteTaskStore::new(pool)),
        signer: Arc::new(signer),
        suggestions: Arc::new(SuggestionService::from_config(&config.llm)),
        password_iterations: config.auth.password_iterations,
    })
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let database_url = config.database_url();
    let pool = db::connect(&database_url, config.database.max_connections)
        .await
        .with_context(|| format!("open database at {database_url}"))?;

    let state = build_gateway_state(&config, pool).context("build gateway state")?;
    let ai_enabled = config
        .llm
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    print_gateway_banner(&display_addr, ai_enabled);
    tracing::info!(addr = %display_addr, ai_enabled, "gateway listening");

    let app = build_app(
        state,
        &config.gateway.cors_origins,
        request_timeout_secs(config.llm.timeout_secs),
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {error}");
        std::future::pending::<()>().await;
    }
}

fn print_gateway_banner(display_addr: &str, ai_enabled: bool) {
    println!("Gateway listening on {display_addr}");
    println!("  GET    /health");
    println!("  POST   /api/auth/register");
    println!("  POST   /api/auth/login");
    println!("  GET    /api/tasks");
    println!("  POST   /api/tasks");
    println!("  GET    /api/tasks/{{id}}");
    println!("  PUT    /api/tasks/{{id}}");
    println!("  DELETE /api/tasks/{{id}}");
    println!("  POST   /api/ai/suggest");
    if !ai_enabled {
        println!();
        println!("  AI suggestions disabled: no Gemini API key configured");
    }
}

pub fn build_app(state: AppState, cors_origins: &[String], timeout_secs: u64) -> Router {
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/login", post(handle_login))
        .route("/api/tasks", get(handle_list_tasks).post(handle_create_task))
        .route(
            "/api/tasks/{id}",
            get(handle_get_task)
                .put(handle_update_task)
                .delete(handle_delete_task),
        )
        .route("/api/ai/suggest", post(handle_suggest));

    let mut app = app
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeout_secs),
        ))
        .layer(middleware::from_fn(log_requests))
        .layer(CatchPanicLayer::custom(handle_panic));

    if !cors_origins.is_empty() {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(cors_allow_origin(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        );
    }

    app
}

fn cors_allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin.trim() == "*") {
        return AllowOrigin::from(AnyOrigin);
    }
    let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    AllowOrigin::list(parsed)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis();
    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, "request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, "request");
    }
    response
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {message}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Internal server error"})),
    )
        .into_response()
}
