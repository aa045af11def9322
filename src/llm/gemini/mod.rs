//! Google Gemini provider over the `generateContent` REST endpoint.

use crate::error::LlmError;
use crate::llm::{Provider, build_provider_client, sanitize_api_error};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

mod types;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PROVIDER_NAME: &str = "gemini";

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    timeout_secs: u64,
    client: Client,
}

impl GeminiProvider {
    /// Create a provider. `api_key` is resolved by the config layer; `None`
    /// makes every call fail with [`LlmError::MissingApiKey`].
    pub fn new(api_key: Option<&str>, base_url: &str, timeout_secs: u64) -> Self {
        Self {
            api_key: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(String::from),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client: build_provider_client(timeout_secs),
        }
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or_else(|| LlmError::MissingApiKey {
            provider: PROVIDER_NAME.into(),
        })
    }

    /// Gemini model ids are addressed as `models/<id>`.
    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn build_request(
        system_prompt: Option<&str>,
        message: &str,
        temperature: f64,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            system_instruction: system_prompt.map(|system| Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            }),
            generation_config: GenerationConfig { temperature },
        }
    }

    fn request_error(&self, err: &reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                provider: PROVIDER_NAME.into(),
                secs: self.timeout_secs,
            }
        } else {
            LlmError::Request {
                provider: PROVIDER_NAME.into(),
                message: sanitize_api_error(&err.to_string()),
            }
        }
    }

    fn extract_text(result: GenerateContentResponse) -> Result<String, LlmError> {
        if let Some(err) = result.error {
            return Err(LlmError::Request {
                provider: PROVIDER_NAME.into(),
                message: sanitize_api_error(&err.message),
            });
        }

        let text: String = result
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER_NAME.into(),
            });
        }
        Ok(text)
    }

    async fn generate(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        );
        let request = Self::build_request(system_prompt, message, temperature);

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|err| self.request_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                provider: PROVIDER_NAME.into(),
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| self.request_error(&err))?;
        Self::extract_text(result)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.generate(system_prompt, message, model, temperature)
                .await
                .map_err(anyhow::Error::from)
        })
    }
}
