//! Generative-text collaborator.
//!
//! Generators receive an `Arc<dyn GenerativeTextService>` at construction time.
//! [`UnavailableService`] stands in for "not configured"; [`OpenAiService`]
//! talks to any OpenAI-compatible `/chat/completions` endpoint.

use crate::config::ServiceConfig;
use crate::error::{ForgeError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-call sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overrides the service's default model for this call.
    pub model: Option<String>,
}

impl CompletionParams {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
            model: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[async_trait]
pub trait GenerativeTextService: Send + Sync {
    fn name(&self) -> &str;

    /// `false` when the service can never answer; callers skip straight to
    /// their fallback path.
    fn is_available(&self) -> bool {
        true
    }

    /// Model used for short auxiliary prompts such as topic extraction.
    fn topic_model(&self) -> Option<&str> {
        None
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<String>;
}

/// Stand-in for a generative service that was never configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableService;

#[async_trait]
impl GenerativeTextService for UnavailableService {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn complete(&self, _system: &str, _user: &str, _params: &CompletionParams) -> Result<String> {
        Err(ForgeError::NotConfigured {
            service: "generative text service".to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completion API.
pub struct OpenAiService {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl OpenAiService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[async_trait]
impl GenerativeTextService for OpenAiService {
    fn name(&self) -> &str {
        "openai"
    }

    fn topic_model(&self) -> Option<&str> {
        Some(&self.config.topic_model)
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CompletionParams,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let model = params.model.as_deref().unwrap_or(&self.config.model);

        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_prompt,
        });

        let request = ChatRequest {
            model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        debug!("Calling {} with model {}", url, model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ForgeError::Timeout {
                        seconds: self.config.timeout.as_secs(),
                    }
                } else {
                    ForgeError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            warn!("Completion API returned status {}", response.status());
            return Err(ForgeError::ServiceStatus {
                status: response.status().as_u16(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ForgeError::MalformedResponse {
                reason: "completion contained no message content".to_string(),
            })
    }
}

/// Runs one completion bounded by `timeout`; an elapsed deadline becomes
/// [`ForgeError::Timeout`].
pub async fn complete_within(
    service: &dyn GenerativeTextService,
    system_prompt: &str,
    user_prompt: &str,
    params: &CompletionParams,
    timeout: Duration,
) -> Result<String> {
    match tokio::time::timeout(timeout, service.complete(system_prompt, user_prompt, params)).await {
        Ok(result) => result,
        Err(_) => Err(ForgeError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

/// Builds the service for an optional configuration. A missing configuration
/// or a client that cannot be constructed yields [`UnavailableService`].
pub fn service_from_config(config: Option<ServiceConfig>) -> Arc<dyn GenerativeTextService> {
    match config {
        Some(config) => match OpenAiService::new(config) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                warn!("Failed to build completion client, using fallback mode: {}", e);
                Arc::new(UnavailableService)
            }
        },
        None => Arc::new(UnavailableService),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_service_reports_not_configured() {
        let service = UnavailableService;
        assert!(!service.is_available());

        let result = service
            .complete("system", "user", &CompletionParams::new(100, 0.5))
            .await;
        assert!(matches!(result, Err(ForgeError::NotConfigured { .. })));
    }

    struct StalledService;

    #[async_trait]
    impl GenerativeTextService for StalledService {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn complete(&self, _system: &str, _user: &str, _params: &CompletionParams) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test]
    async fn test_complete_within_times_out() {
        let result = complete_within(
            &StalledService,
            "system",
            "user",
            &CompletionParams::new(10, 0.1),
            Duration::from_millis(20),
        )
        .await;

        assert!(matches!(result, Err(ForgeError::Timeout { .. })));
        assert!(result.unwrap_err().is_transient());
    }

    #[test]
    fn test_service_from_missing_config_is_unavailable() {
        let service = service_from_config(None);
        assert!(!service.is_available());
        assert_eq!(service.name(), "unavailable");
    }

    #[test]
    fn test_configured_service_exposes_topic_model() {
        let service = service_from_config(Some(ServiceConfig::new("sk-test")));
        assert!(service.is_available());
        assert_eq!(service.topic_model(), Some(crate::config::DEFAULT_TOPIC_MODEL));
    }

    #[test]
    fn test_chat_response_content_extraction() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some("Hello"));
    }
}
