use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Generated on first run when absent.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours (default: 72)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// PBKDF2 rounds for new password hashes (default: 100000)
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

fn default_token_ttl_hours() -> i64 {
    72
}

fn default_password_iterations() -> u32 {
    100_000
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            password_iterations: default_password_iterations(),
        }
    }
}
