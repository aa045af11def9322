use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DB_FILENAME: &str = "taskforge.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://` URL. Unset means `<data dir>/taskforge.db`; `~` is expanded.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn resolve_url(&self, data_dir: &Path) -> String {
        match self.url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => match url.strip_prefix("sqlite://") {
                Some(rest) => format!("sqlite://{}", shellexpand::tilde(rest)),
                None => url.to_string(),
            },
            None => format!(
                "sqlite://{}",
                data_dir.join(DEFAULT_DB_FILENAME).display()
            ),
        }
    }
}
