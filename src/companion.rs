use crate::completion::CompletionService;
use crate::error::PipelineError;
use crate::prompts::CHAT_COMPANION_PROMPT;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatReply {
    pub response: String,
}

impl ChatReply {
    /// Strict: exactly `{"response": "<non-empty>"}` after trimming whitespace
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let parsed: ChatReply = serde_json::from_str(raw.trim()).map_err(|e| PipelineError::ChatParse {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

        if parsed.response.trim().is_empty() {
            return Err(PipelineError::ChatParse {
                message: "response is empty".to_string(),
                raw: raw.to_string(),
            });
        }

        Ok(parsed)
    }
}

/// Supportive freeform replies for conversational messages
pub struct ConversationResponder {
    completion: Arc<dyn CompletionService>,
}

impl ConversationResponder {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    pub async fn respond(&self, user_message: &str) -> Result<ChatReply, PipelineError> {
        let raw = self.completion
            .complete(
                CHAT_COMPANION_PROMPT,
                &format!("Respond in a friendly way to this message: {}", user_message),
            )
            .await
            .map_err(|e| PipelineError::CompletionUnavailable(e.to_string()))?;

        ChatReply::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCompletion;

    #[tokio::test]
    async fn test_respond_parses_reply() {
        let completion = Arc::new(ScriptedCompletion::new(&[
            "  {\"response\": \"Of course! I'm here. How's your day going?\"}\n",
        ]));
        let responder = ConversationResponder::new(completion.clone());

        let reply = responder.respond("Can you just talk to me for a bit").await.unwrap();

        assert_eq!(reply.response, "Of course! I'm here. How's your day going?");
        assert!(completion.calls()[0].1.contains("Can you just talk to me for a bit"));
    }

    #[tokio::test]
    async fn test_respond_plain_text_is_parse_error() {
        let responder = ConversationResponder::new(Arc::new(ScriptedCompletion::new(&["Hi there!"])));

        let err = responder.respond("hello").await.unwrap_err();

        assert!(matches!(err, PipelineError::ChatParse { .. }));
    }

    #[tokio::test]
    async fn test_respond_wrong_field_is_parse_error() {
        let responder = ConversationResponder::new(Arc::new(ScriptedCompletion::new(&[
            r#"{"reply": "Hi there!"}"#,
        ])));

        assert!(responder.respond("hello").await.is_err());
    }

    #[test]
    fn test_parse_rejects_extra_fields() {
        let err = ChatReply::parse(r#"{"response": "hi", "mood": "x"}"#).unwrap_err();

        assert_eq!(err.kind(), "chat_parse");
    }

    #[test]
    fn test_parse_rejects_empty_response() {
        assert!(ChatReply::parse(r#"{"response": ""}"#).is_err());
        assert!(ChatReply::parse(r#"{"response": "   "}"#).is_err());
    }

    #[tokio::test]
    async fn test_respond_transport_failure() {
        let responder = ConversationResponder::new(Arc::new(ScriptedCompletion::failing("401")));

        let err = responder.respond("hello").await.unwrap_err();

        assert_eq!(err.kind(), "completion_unavailable");
    }
}
