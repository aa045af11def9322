use super::Config;
use crate::error::TaskforgeError;
use anyhow::{Context, Result};
use directories::UserDirs;
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};

const GENERATED_SECRET_BYTES: usize = 32;

fn default_data_dir() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".taskforge"))
}

impl Config {
    /// Config for commands that talk to the database or the model: loaded
    /// from `~/.taskforge`, overridden from the environment, then validated.
    pub fn load_runtime() -> std::result::Result<Self, TaskforgeError> {
        Self::load_runtime_in(&default_data_dir()?)
    }

    pub fn load_runtime_in(data_dir: &Path) -> std::result::Result<Self, TaskforgeError> {
        let mut config = Self::load_or_init_in(data_dir)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load `<data_dir>/config.toml`, creating the directory and a default
    /// config on first run. A missing JWT secret is generated and persisted.
    pub fn load_or_init_in(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join("config.toml");

        if !data_dir.exists() {
            fs::create_dir_all(data_dir).context("Failed to create .taskforge directory")?;
        }

        let is_new = !config_path.exists();
        let mut config = if is_new {
            tracing::info!("Creating default config at {}", config_path.display());
            Self::default()
        } else {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        };
        config.config_path = config_path.clone();
        config.data_dir = data_dir.to_path_buf();

        let generated_secret = config.ensure_jwt_secret();
        if is_new || generated_secret {
            config.save()?;
        }
        Ok(config)
    }

    /// Fill in a random signing secret if none is configured. Returns true
    /// when the config changed.
    pub fn ensure_jwt_secret(&mut self) -> bool {
        if self
            .auth
            .jwt_secret
            .as_deref()
            .is_some_and(|secret| !secret.trim().is_empty())
        {
            return false;
        }
        let mut bytes = [0u8; GENERATED_SECRET_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        self.auth.jwt_secret = Some(hex::encode(bytes));
        true
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
