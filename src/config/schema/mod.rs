mod auth;
mod core;
mod database;
mod gateway;
mod llm;

pub use auth::AuthConfig;
pub use core::{Config, MIN_PASSWORD_ITERATIONS};
pub use database::DatabaseConfig;
pub use gateway::GatewayConfig;
pub use llm::LlmConfig;
