//! Mood uplift: rewrite a search topic toward a more positive tone.
//!
//! The model gets the full tone table and must answer with one JSON object.
//! The "never downgrade energy" rule lives only in the instructions; the
//! returned query is not checked against it.

use crate::completion::CompletionService;
use crate::error::PipelineError;
use crate::prompts::{uplift_from_topic_prompt, uplift_prompt};
use crate::tones::ToneTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const UNKNOWN_TONE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoodQuery {
    pub detected_tone: String,
    #[serde(rename = "search_query")]
    pub original_query: String,
    pub final_query: String,
}

impl MoodQuery {
    /// Strict parse of a completion response. Surrounding whitespace is the only slack.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let parsed: MoodQuery = serde_json::from_str(raw.trim()).map_err(|e| PipelineError::UpliftParse {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

        if parsed.final_query.trim().is_empty() {
            return Err(PipelineError::UpliftParse {
                message: "final_query is empty".to_string(),
                raw: raw.to_string(),
            });
        }

        Ok(parsed)
    }

    /// Whether the model reported a different tone than the one it was given
    pub fn tone_overridden(&self, supplied: Option<&str>) -> bool {
        let supplied = supplied.unwrap_or(UNKNOWN_TONE);
        !self.detected_tone.trim().eq_ignore_ascii_case(supplied.trim())
    }

    pub fn word_count(&self) -> usize {
        self.final_query.split_whitespace().count()
    }
}

pub struct MoodUplifter {
    completion: Arc<dyn CompletionService>,
    prompt: String,
    topic_only_prompt: String,
}

impl MoodUplifter {
    pub fn new(completion: Arc<dyn CompletionService>, tones: Arc<ToneTable>) -> Self {
        let prompt = uplift_prompt(&tones);
        let topic_only_prompt = uplift_from_topic_prompt(&tones);
        Self {
            completion,
            prompt,
            topic_only_prompt,
        }
    }

    /// Canonical path: the tone comes from keyword detection and must not be overridden
    pub async fn uplift(&self, topic: &str, tone: Option<&str>) -> Result<MoodQuery, PipelineError> {
        let input = format!(
            "search_query: {}\nuser_tone: {}",
            topic,
            tone.unwrap_or(UNKNOWN_TONE)
        );

        let raw = self.completion
            .complete(&self.prompt, &input)
            .await
            .map_err(|e| PipelineError::CompletionUnavailable(e.to_string()))?;

        MoodQuery::parse(&raw)
    }

    /// Comparison path: the model infers the tone from the topic text alone
    pub async fn uplift_from_topic(&self, topic: &str) -> Result<MoodQuery, PipelineError> {
        let raw = self.completion
            .complete(&self.topic_only_prompt, &format!("search_query: {}", topic))
            .await
            .map_err(|e| PipelineError::CompletionUnavailable(e.to_string()))?;

        MoodQuery::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCompletion;

    const ENERGETIC: &str = r#"{"detected_tone": "tired", "search_query": "some songs", "final_query": "energetic upbeat workout songs"}"#;

    fn uplifter(completion: Arc<ScriptedCompletion>) -> MoodUplifter {
        MoodUplifter::new(completion, Arc::new(ToneTable::default()))
    }

    #[test]
    fn test_round_trip_keeps_all_fields() {
        let query = MoodQuery {
            detected_tone: "sad".to_string(),
            original_query: "tamil songs".to_string(),
            final_query: "happy tamil hit songs".to_string(),
        };

        let json = serde_json::to_string(&query).unwrap();
        assert!(json.contains("\"search_query\":\"tamil songs\""));

        let parsed = MoodQuery::parse(&json).unwrap();
        assert_eq!(parsed, query);
    }

    #[test]
    fn test_parse_rejects_surrounding_text() {
        let raw = format!("Here you go: {}", ENERGETIC);

        assert!(matches!(MoodQuery::parse(&raw), Err(PipelineError::UpliftParse { .. })));
    }

    #[test]
    fn test_parse_rejects_markdown_fence() {
        let raw = format!("```json\n{}\n```", ENERGETIC);

        assert!(matches!(MoodQuery::parse(&raw), Err(PipelineError::UpliftParse { .. })));
    }

    #[test]
    fn test_parse_rejects_missing_and_extra_fields() {
        let missing = r#"{"detected_tone": "sad", "final_query": "happy songs"}"#;
        let extra = r#"{"detected_tone": "sad", "search_query": "songs", "final_query": "happy songs", "note": "cheer up"}"#;

        assert!(MoodQuery::parse(missing).is_err());
        assert!(MoodQuery::parse(extra).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_final_query() {
        let raw = r#"{"detected_tone": "sad", "search_query": "songs", "final_query": "  "}"#;

        assert!(MoodQuery::parse(raw).is_err());
    }

    #[test]
    fn test_tone_overridden() {
        let query = MoodQuery::parse(ENERGETIC).unwrap();

        assert!(!query.tone_overridden(Some("Tired")));
        assert!(query.tone_overridden(Some("sad")));
        assert!(query.tone_overridden(None));
        assert_eq!(query.word_count(), 4);
    }

    #[tokio::test]
    async fn test_uplift_sends_topic_and_tone() {
        let completion = Arc::new(ScriptedCompletion::new(&[ENERGETIC]));
        let uplifter = uplifter(completion.clone());

        let query = uplifter.uplift("some songs", Some("tired")).await.unwrap();

        assert_eq!(query.final_query, "energetic upbeat workout songs");
        let calls = completion.calls();
        assert_eq!(calls[0].1, "search_query: some songs\nuser_tone: tired");
        assert!(calls[0].0.contains(r#""tired": "energetic""#));
    }

    #[tokio::test]
    async fn test_uplift_without_tone_sends_unknown() {
        let completion = Arc::new(ScriptedCompletion::new(&[
            r#"{"detected_tone": "unknown", "search_query": "tamil songs", "final_query": "feel good tamil songs"}"#,
        ]));
        let uplifter = uplifter(completion.clone());

        let query = uplifter.uplift("tamil songs", None).await.unwrap();

        assert!(!query.tone_overridden(None));
        assert!(completion.calls()[0].1.ends_with("user_tone: unknown"));
    }

    #[tokio::test]
    async fn test_uplift_from_topic_uses_detection_prompt() {
        let completion = Arc::new(ScriptedCompletion::new(&[ENERGETIC]));
        let uplifter = uplifter(completion.clone());

        uplifter.uplift_from_topic("tired of these songs").await.unwrap();

        let calls = completion.calls();
        assert_eq!(calls[0].1, "search_query: tired of these songs");
        assert!(calls[0].0.contains("Detect the user's tone ONLY"));
    }

    #[tokio::test]
    async fn test_uplift_parse_failure_is_not_retried() {
        let completion = Arc::new(ScriptedCompletion::new(&["not json", ENERGETIC]));
        let uplifter = uplifter(completion.clone());

        let err = uplifter.uplift("songs", Some("sad")).await.unwrap_err();

        assert_eq!(err.kind(), "uplift_parse");
        assert_eq!(completion.calls().len(), 1);
    }
}
