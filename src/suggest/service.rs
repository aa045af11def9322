use super::pipeline::normalize_reply;
use super::prompt::build_prompt;
use super::types::FinalSuggestion;
use crate::config::LlmConfig;
use crate::error::{LlmError, SuggestError};
use crate::llm::{GeminiProvider, Provider, sanitize_api_error};
use std::sync::Arc;
use std::time::Duration;

/// Prompt → provider → pipeline, one call per task description.
pub struct SuggestionService {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl SuggestionService {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            timeout,
        }
    }

    /// Service backed by Gemini, configured from `[llm]`.
    pub fn from_config(config: &LlmConfig) -> Self {
        let provider = GeminiProvider::new(
            config.api_key.as_deref(),
            &config.base_url,
            config.timeout_secs,
        );
        Self::new(
            Arc::new(provider),
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn suggest(&self, description: &str) -> Result<FinalSuggestion, SuggestError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(SuggestError::EmptyDescription);
        }

        let prompt = build_prompt(description);
        let call = self.provider.chat(&prompt, &self.model, self.temperature);
        let reply = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => return Err(self.classify(err).into()),
            Err(_) => {
                return Err(LlmError::Timeout {
                    provider: self.provider.name().to_string(),
                    secs: self.timeout.as_secs(),
                }
                .into());
            }
        };
        tracing::debug!(
            provider = self.provider.name(),
            reply_chars = reply.chars().count(),
            "model reply received"
        );

        normalize_reply(&reply).map_err(|err| {
            tracing::warn!(
                kind = %err.kind(),
                detail = err.public_detail(),
                "model reply rejected"
            );
            tracing::debug!("rejected model reply: {err}");
            SuggestError::Pipeline(err)
        })
    }

    /// Recover the typed provider error, or wrap an untyped one as a request failure.
    fn classify(&self, err: anyhow::Error) -> LlmError {
        err.downcast::<LlmError>().unwrap_or_else(|other| LlmError::Request {
            provider: self.provider.name().to_string(),
            message: sanitize_api_error(&format!("{other:#}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SuggestionFailureKind;
    use crate::suggest::types::Priority;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    enum Script {
        Reply(&'static str),
        Fail(fn() -> anyhow::Error),
        Hang,
    }

    struct ScriptedProvider {
        script: Script,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn chat_with_system<'a>(
            &'a self,
            _system_prompt: Option<&'a str>,
            message: &'a str,
            _model: &'a str,
            _temperature: f64,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
            self.seen.lock().unwrap().push(message.to_string());
            Box::pin(async move {
                match &self.script {
                    Script::Reply(text) => Ok((*text).to_string()),
                    Script::Fail(make) => Err(make()),
                    Script::Hang => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok(String::new())
                    }
                }
            })
        }
    }

    fn service(provider: Arc<ScriptedProvider>) -> SuggestionService {
        SuggestionService::new(provider, "test-model", 0.2, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn happy_path_returns_final_suggestion() {
        let provider = ScriptedProvider::new(Script::Reply(
            "Here:\n```json\n{\"title\":\"Setup CI\",\"subtasks\":[\"a\"],\"priority\":\"High\",\"time_estimate\":\"2 days\"}\n```",
        ));
        let suggestion = service(provider.clone()).suggest("set up CI").await.unwrap();
        assert_eq!(suggestion.priority, Priority::High);
        assert!((suggestion.time_estimate_days - 2.0).abs() < f64::EPSILON);

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("Analyze this task: \"set up CI\""));
    }

    #[tokio::test]
    async fn blank_description_skips_provider() {
        let provider = ScriptedProvider::new(Script::Reply("{}"));
        let err = service(provider.clone()).suggest("   ").await.unwrap_err();
        assert!(matches!(err, SuggestError::EmptyDescription));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn typed_provider_error_is_preserved() {
        let provider = ScriptedProvider::new(Script::Fail(|| {
            LlmError::MissingApiKey {
                provider: "scripted".into(),
            }
            .into()
        }));
        let err = service(provider).suggest("x").await.unwrap_err();
        assert!(matches!(err, SuggestError::Llm(LlmError::MissingApiKey { .. })));
    }

    #[tokio::test]
    async fn untyped_provider_error_becomes_request_error() {
        let provider = ScriptedProvider::new(Script::Fail(|| anyhow::anyhow!("socket closed")));
        let err = service(provider).suggest("x").await.unwrap_err();
        match err {
            SuggestError::Llm(LlmError::Request { provider, message }) => {
                assert_eq!(provider, "scripted");
                assert_eq!(message, "socket closed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn hung_provider_times_out() {
        let provider = ScriptedProvider::new(Script::Hang);
        let err = service(provider).suggest("x").await.unwrap_err();
        assert!(matches!(err, SuggestError::Llm(LlmError::Timeout { .. })));
    }

    #[tokio::test]
    async fn pipeline_failure_is_tagged() {
        let provider = ScriptedProvider::new(Script::Reply(
            "{\"title\":\"x\",\"priority\":\"urgent\",\"time_estimate\":\"1\"}",
        ));
        let err = service(provider).suggest("x").await.unwrap_err();
        match err {
            SuggestError::Pipeline(inner) => {
                assert_eq!(inner.kind(), SuggestionFailureKind::InvalidPriority);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
