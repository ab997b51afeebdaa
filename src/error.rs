use thiserror::Error;

/// Boxed error returned by the external collaborators (HTTP clients, fakes).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error taxonomy for a single pass through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Router produced a label that is neither of the two known routes.
    #[error("Ambiguous classification: {0:?}")]
    ClassificationAmbiguous(String),

    /// Mood uplift response was not the expected JSON object.
    #[error("Failed to parse uplift response: {message}. Response was: {raw}")]
    UpliftParse { message: String, raw: String },

    /// Companion response was not the expected JSON object.
    #[error("Failed to parse chat response: {message}. Response was: {raw}")]
    ChatParse { message: String, raw: String },

    /// Video platform call failed (network, quota, auth, timeout).
    #[error("Video search unavailable: {0}")]
    SearchUnavailable(String),

    /// Completion service call failed (network, auth, timeout).
    #[error("Completion service unavailable: {0}")]
    CompletionUnavailable(String),

    /// Required credentials or settings are absent. Startup only.
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),
}

impl PipelineError {
    /// Short machine-friendly kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ClassificationAmbiguous(_) => "classification_ambiguous",
            PipelineError::UpliftParse { .. } => "uplift_parse",
            PipelineError::ChatParse { .. } => "chat_parse",
            PipelineError::SearchUnavailable(_) => "search_unavailable",
            PipelineError::CompletionUnavailable(_) => "completion_unavailable",
            PipelineError::ConfigurationMissing(_) => "configuration_missing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_raw_response() {
        let err = PipelineError::UpliftParse {
            message: "expected value".to_string(),
            raw: "not json".to_string(),
        };

        assert_eq!(err.kind(), "uplift_parse");
        assert!(err.to_string().contains("not json"));
    }
}
