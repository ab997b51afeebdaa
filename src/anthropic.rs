use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub const CLAUDE_HAIKU: &str = "claude-3-5-haiku-20241022";

#[derive(Debug, Serialize, Clone)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.trim().to_string(),
            model: CLAUDE_HAIKU.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Send a messages request with an optional system prompt
    pub async fn chat_completion(
        &self,
        system_prompt: Option<&str>,
        messages: Vec<AnthropicMessage>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: max_tokens.unwrap_or(1024),
            system: system_prompt.map(|s| s.to_string()),
            messages,
            temperature: Some(temperature),
        };

        let response = self.client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            if let Ok(parsed_error) = serde_json::from_str::<AnthropicError>(&error_text) {
                return Err(format!(
                    "Anthropic API error ({}): {} - {}",
                    status, parsed_error.error.error_type, parsed_error.error.message
                ).into());
            }

            return Err(format!("Anthropic API error ({}): {}", status, error_text).into());
        }

        let completion: MessagesResponse = response.json().await?;

        last_text_block(&completion).ok_or_else(|| "No text response from Claude".into())
    }

    /// Validate the Anthropic API key
    pub async fn validate_api_key(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: 10,
            system: None,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: "Say 'ok'".to_string(),
            }],
            temperature: Some(0.0),
        };

        let response = self.client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(true)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err("Invalid Anthropic API key".into());
            } else if status.as_u16() == 429 {
                return Err("Rate limited - too many requests".into());
            }

            if let Ok(parsed_error) = serde_json::from_str::<AnthropicError>(&error_text) {
                return Err(format!("{}: {}", parsed_error.error.error_type, parsed_error.error.message).into());
            }

            Err(format!("Anthropic API error ({}): {}", status, error_text).into())
        }
    }
}

/// Last text block of a response; earlier blocks may be tool or thinking output
fn last_text_block(completion: &MessagesResponse) -> Option<String> {
    completion.content
        .iter()
        .filter(|c| c.content_type == "text")
        .last()
        .and_then(|c| c.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_text_block() {
        let raw = r#"{"content":[{"type":"thinking","thinking":"hmm"},{"type":"text","text":"first"},{"type":"text","text":"YouTubeAgent"}]}"#;
        let completion: MessagesResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(last_text_block(&completion), Some("YouTubeAgent".to_string()));
    }

    #[test]
    fn test_no_text_block() {
        let raw = r#"{"content":[{"type":"tool_use","id":"t1"}]}"#;
        let completion: MessagesResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(last_text_block(&completion), None);
    }

    #[test]
    fn test_request_serializes_system_prompt() {
        let request = MessagesRequest {
            model: CLAUDE_HAIKU.to_string(),
            max_tokens: 10,
            system: Some("You route messages.".to_string()),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            temperature: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["system"], "You route messages.");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("temperature").is_none());
    }
}
