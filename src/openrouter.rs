use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

#[derive(Debug, Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client pointed at OpenRouter
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens: max_tokens.or(Some(1024)),
        };

        let response = self.client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "MoodTube")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(format!("OpenRouter API error ({}): {}", status, error_text).into());
        }

        let completion: ChatCompletionResponse = response.json().await?;

        first_choice_text(completion).ok_or_else(|| "No response from OpenRouter".into())
    }

    pub async fn validate_api_key(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: "Say 'ok'".to_string(),
        }];

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: 0.0,
            max_tokens: Some(5),
        };

        let response = self.client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
                return Err("Invalid OpenRouter API key".into());
            } else if status.as_u16() == 429 {
                return Err("Rate limited - too many requests".into());
            }

            Err(format!("OpenRouter API error ({}): {}", status, error_text).into())
        }
    }
}

fn first_choice_text(completion: ChatCompletionResponse) -> Option<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice_text() {
        let raw = r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":"ChatCompanion"}},{"index":1,"message":{"role":"assistant","content":"other"}}]}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(first_choice_text(completion), Some("ChatCompanion".to_string()));
    }

    #[test]
    fn test_null_content_yields_none() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(first_choice_text(completion), None);
    }

    #[test]
    fn test_request_omits_missing_max_tokens() {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![],
            temperature: 0.7,
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "openai/gpt-4o-mini");
        assert!(value.get("max_tokens").is_none());
    }
}
