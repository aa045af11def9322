use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use taskforge::config::{Config, MIN_PASSWORD_ITERATIONS};
use taskforge::gateway::run_gateway_with_listener;
use tempfile::TempDir;

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _data_dir: TempDir,
}

/// LLM settings for a test gateway. `None` leaves the API key unset.
#[derive(Default)]
pub struct LlmSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl GatewayTestServer {
    pub async fn start() -> Self {
        Self::start_with_llm(LlmSettings::default()).await
    }

    #[allow(clippy::field_reassign_with_default)]
    pub async fn start_with_llm(llm: LlmSettings) -> Self {
        let data_dir = TempDir::new().expect("temp data dir should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.data_dir = data_dir.path().to_path_buf();
        config.config_path = data_dir.path().join("config.toml");
        config.database.url = Some(format!(
            "sqlite://{}",
            data_dir.path().join("taskforge.db").display()
        ));
        config.auth.jwt_secret = Some("integration-test-secret".to_string());
        config.auth.password_iterations = MIN_PASSWORD_ITERATIONS;
        config.llm.api_key = llm.api_key;
        if let Some(base_url) = llm.base_url {
            config.llm.base_url = base_url;
        }
        if let Some(timeout_secs) = llm.timeout_secs {
            config.llm.timeout_secs = timeout_secs;
        }

        let host = "127.0.0.1".to_string();
        let config = Arc::new(config);
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            _data_dir: data_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    /// Register `name` and return the bearer token from the response.
    pub async fn register(&self, client: &reqwest::Client, name: &str) -> String {
        let response = client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "name": name,
                "email": format!("{name}@example.com"),
                "password": "hunter22",
            }))
            .send()
            .await
            .expect("register request should complete");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response
            .json()
            .await
            .expect("register response should be json");
        body["token"]
            .as_str()
            .expect("register response should carry a token")
            .to_string()
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}
