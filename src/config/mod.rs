pub mod schema;

pub use schema::{
    AuthConfig, Config, DatabaseConfig, GatewayConfig, LlmConfig, MIN_PASSWORD_ITERATIONS,
};
