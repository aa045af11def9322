use super::Config;

fn non_empty_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

impl Config {
    /// Layer environment variables (and a `.env` file, if the caller loaded
    /// one) over the file config.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port_str) = non_empty_var(&["TASKFORGE_PORT", "PORT"])
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(host) = non_empty_var(&["TASKFORGE_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Some(url) = non_empty_var(&["TASKFORGE_DATABASE_URL", "DATABASE_URL"]) {
            self.database.url = Some(url);
        }

        if let Some(secret) = non_empty_var(&["TASKFORGE_JWT_SECRET", "JWT_SECRET"]) {
            self.auth.jwt_secret = Some(secret);
        }

        if let Some(key) = non_empty_var(&["GEMINI_API_KEY", "GOOGLE_API_KEY"]) {
            self.llm.api_key = Some(key);
        }

        if let Some(model) = non_empty_var(&["TASKFORGE_MODEL"]) {
            self.llm.model = model;
        }

        if let Some(temp_str) = non_empty_var(&["TASKFORGE_TEMPERATURE"])
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.llm.temperature = temp;
        }
    }
}
