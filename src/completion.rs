use crate::anthropic::{AnthropicClient, AnthropicMessage};
use crate::config::{Config, Provider};
use crate::error::BoxError;
use crate::openrouter::{ChatMessage, OpenRouterClient};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
const MAX_COMPLETION_TOKENS: u32 = 512;

/// Text completion: instructions plus one user input in, raw text out.
///
/// No schema enforcement is assumed; callers validate what comes back.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system_prompt: &str, input: &str) -> Result<String, BoxError>;
}

#[async_trait]
impl CompletionService for OpenRouterClient {
    async fn complete(&self, system_prompt: &str, input: &str) -> Result<String, BoxError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: input.to_string(),
            },
        ];

        self.chat_completion(messages, DEFAULT_TEMPERATURE, Some(MAX_COMPLETION_TOKENS))
            .await
    }
}

#[async_trait]
impl CompletionService for AnthropicClient {
    async fn complete(&self, system_prompt: &str, input: &str) -> Result<String, BoxError> {
        let messages = vec![AnthropicMessage {
            role: "user".to_string(),
            content: input.to_string(),
        }];

        self.chat_completion(
            Some(system_prompt),
            messages,
            DEFAULT_TEMPERATURE,
            Some(MAX_COMPLETION_TOKENS),
        )
        .await
    }
}

/// Bounds every completion call; expiry is reported like a transport error
pub struct TimedCompletion {
    inner: Arc<dyn CompletionService>,
    timeout: Duration,
}

impl TimedCompletion {
    pub fn new(inner: Arc<dyn CompletionService>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl CompletionService for TimedCompletion {
    async fn complete(&self, system_prompt: &str, input: &str) -> Result<String, BoxError> {
        match tokio::time::timeout(self.timeout, self.inner.complete(system_prompt, input)).await {
            Ok(result) => result,
            Err(_) => Err(format!("completion timed out after {:?}", self.timeout).into()),
        }
    }
}

/// Build the completion backend selected in the configuration
pub fn from_config(config: &Config) -> Arc<dyn CompletionService> {
    match config.provider {
        Provider::OpenRouter => {
            let mut client = OpenRouterClient::new(&config.completion_key);
            if let Some(model) = &config.model {
                client = client.with_model(model);
            }
            Arc::new(client)
        }
        Provider::Anthropic => {
            let mut client = AnthropicClient::new(&config.completion_key);
            if let Some(model) = &config.model {
                client = client.with_model(model);
            }
            Arc::new(client)
        }
    }
}

/// Round-trip a tiny request to confirm the configured key is accepted
pub async fn validate_credentials(config: &Config) -> Result<bool, BoxError> {
    match config.provider {
        Provider::OpenRouter => {
            let mut client = OpenRouterClient::new(&config.completion_key);
            if let Some(model) = &config.model {
                client = client.with_model(model);
            }
            client.validate_api_key().await
        }
        Provider::Anthropic => {
            let mut client = AnthropicClient::new(&config.completion_key);
            if let Some(model) = &config.model {
                client = client.with_model(model);
            }
            client.validate_api_key().await
        }
    }
}
