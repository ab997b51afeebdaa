use crate::completion::CompletionService;
use crate::error::PipelineError;
use crate::prompts::{router_prompt, ROUTER_LABEL_CHAT, ROUTER_LABEL_VIDEO};
use std::sync::Arc;

/// Which branch handles a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ChatIntent,
    VideoSearchIntent,
    Unknown,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::ChatIntent => "chatcompanion",
            Route::VideoSearchIntent => "youtubeagent",
            Route::Unknown => "unknown",
        }
    }

    /// Normalize a raw label: trim, drop wrapping quotes/backticks, lower-case
    pub fn from_label(raw: &str) -> Route {
        let label = raw
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .trim()
            .to_lowercase();

        if label == ROUTER_LABEL_CHAT.to_lowercase() {
            Route::ChatIntent
        } else if label == ROUTER_LABEL_VIDEO.to_lowercase() {
            Route::VideoSearchIntent
        } else {
            Route::Unknown
        }
    }
}

pub struct Router {
    completion: Arc<dyn CompletionService>,
    prompt: String,
}

impl Router {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            prompt: router_prompt(),
        }
    }

    /// Classify a message. A malformed label is `Route::Unknown`, not an error;
    /// only a failed completion call is.
    pub async fn decide(&self, user_message: &str) -> Result<Route, PipelineError> {
        self.decide_with_label(user_message).await.map(|(route, _)| route)
    }

    /// Like `decide`, but keeps the raw label for diagnostics
    pub async fn decide_with_label(&self, user_message: &str) -> Result<(Route, String), PipelineError> {
        let raw = self.completion
            .complete(&self.prompt, &format!("User input: {}", user_message))
            .await
            .map_err(|e| PipelineError::CompletionUnavailable(e.to_string()))?;

        Ok((Route::from_label(&raw), raw.trim().to_string()))
    }
}
