use super::super::{AuthConfig, DatabaseConfig, GatewayConfig, LlmConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const MIN_PASSWORD_ITERATIONS: u32 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (`~/.taskforge`) - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let data_dir = home.join(".taskforge");

        Self {
            config_path: data_dir.join("config.toml"),
            data_dir,
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    pub fn database_url(&self) -> String {
        self.database.resolve_url(&self.data_dir)
    }

    /// Signing secret, or an empty string when none is configured.
    /// [`Config::validate`] rejects the empty case before the server starts.
    pub fn jwt_secret(&self) -> &str {
        self.auth.jwt_secret.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret().trim().is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt_secret is empty; set it in config.toml or JWT_SECRET".into(),
            ));
        }
        if self.gateway.port == 0 {
            return Err(ConfigError::Validation("gateway.port must be non-zero".into()));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Validation(
                "auth.token_ttl_hours must be positive".into(),
            ));
        }
        if self.auth.password_iterations < MIN_PASSWORD_ITERATIONS {
            return Err(ConfigError::Validation(format!(
                "auth.password_iterations must be at least {MIN_PASSWORD_ITERATIONS}"
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Validation("llm.timeout_secs must be non-zero".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Validation(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        url::Url::parse(&self.llm.base_url).map_err(|err| {
            ConfigError::Validation(format!("llm.base_url is not a valid URL: {err}"))
        })?;
        Ok(())
    }
}
