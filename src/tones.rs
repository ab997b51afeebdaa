//! Tone keywords and their uplifted counterparts.
//!
//! Order matters: detection returns the first keyword in table order that
//! occurs in the message, not the earliest or longest textual match.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneEntry {
    pub keyword: String,
    pub uplifted_tone: String,
}

const DEFAULT_TONES: &[(&str, &str)] = &[
    ("bored", "funny"),
    ("tired", "energetic"),
    ("sad", "happy"),
    ("angry", "calm"),
    ("happy", "happy"),
    ("motivated", "motivated"),
    ("comedy", "comedy"),
    ("action", "motivated"),
    ("dramatic", "light-hearted"),
    ("fun", "fun"),
    ("excited", "excited"),
    ("charming", "happy"),
    ("romantic", "light-hearted"),
    ("thriller", "fun"),
    ("educational", "inspiring"),
    ("spiritual", "calm"),
    ("motivational", "motivated"),
    ("inspiring", "motivated"),
    ("relaxed", "soothing"),
    ("fear", "light-hearted"),
];

/// Ordered keyword → uplifted tone table. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneTable {
    entries: Vec<ToneEntry>,
}

impl Default for ToneTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TONES
                .iter()
                .map(|(keyword, tone)| ToneEntry {
                    keyword: keyword.to_string(),
                    uplifted_tone: tone.to_string(),
                })
                .collect(),
        }
    }
}

impl ToneTable {
    /// Build a custom table. Keywords are lower-cased and must be unique and non-empty.
    pub fn new(entries: Vec<ToneEntry>) -> Result<Self, String> {
        let mut normalized: Vec<ToneEntry> = Vec::with_capacity(entries.len());

        for entry in entries {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err("Tone keyword must not be empty".to_string());
            }
            if normalized.iter().any(|e| e.keyword == keyword) {
                return Err(format!("Duplicate tone keyword: {}", keyword));
            }
            normalized.push(ToneEntry {
                keyword,
                uplifted_tone: entry.uplifted_tone.trim().to_string(),
            });
        }

        Ok(Self { entries: normalized })
    }

    pub fn entries(&self) -> &[ToneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First keyword (in table order) contained in the lower-cased text
    pub fn detect(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.entries
            .iter()
            .find(|e| lowered.contains(e.keyword.as_str()))
            .map(|e| e.keyword.as_str())
    }

    /// Uplifted tone for an exact keyword, if the keyword is in the table
    pub fn uplift_for(&self, keyword: &str) -> Option<&str> {
        let keyword = keyword.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.uplifted_tone.as_str())
    }

    /// Render as an ordered JSON-style object for embedding into prompts
    pub fn to_prompt_mapping(&self) -> String {
        let pairs = self.entries
            .iter()
            .map(|e| {
                format!(
                    "{}: {}",
                    serde_json::Value::String(e.keyword.clone()),
                    serde_json::Value::String(e.uplifted_tone.clone())
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{{{}}}", pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keyword: &str, tone: &str) -> ToneEntry {
        ToneEntry {
            keyword: keyword.to_string(),
            uplifted_tone: tone.to_string(),
        }
    }

    #[test]
    fn test_detect_uses_table_order_not_text_position() {
        let table = ToneTable::default();

        assert_eq!(table.detect("I'm sad and tired"), Some("tired"));
        assert_eq!(table.detect("I'm so tired, play some songs"), Some("tired"));
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        let table = ToneTable::default();

        assert_eq!(table.detect("Feeling BORED today"), Some("bored"));
    }

    #[test]
    fn test_detect_matches_substrings() {
        let table = ToneTable::default();

        // "funny" contains "fun"
        assert_eq!(table.detect("show me something funny"), Some("fun"));
    }

    #[test]
    fn test_detect_no_match() {
        let table = ToneTable::default();

        assert_eq!(table.detect("play tamil songs"), None);
        assert_eq!(table.detect(""), None);
    }

    #[test]
    fn test_uplift_for() {
        let table = ToneTable::default();

        assert_eq!(table.uplift_for("tired"), Some("energetic"));
        assert_eq!(table.uplift_for("Sad"), Some("happy"));
        assert_eq!(table.uplift_for("melancholy"), None);
    }

    #[test]
    fn test_default_keywords_unique() {
        let table = ToneTable::default();
        let rebuilt = ToneTable::new(table.entries().to_vec()).unwrap();

        assert_eq!(rebuilt, table);
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = ToneTable::new(vec![entry("sad", "happy"), entry("SAD", "calm")]).unwrap_err();

        assert!(err.contains("sad"));
    }

    #[test]
    fn test_new_rejects_empty_keyword() {
        assert!(ToneTable::new(vec![entry("  ", "happy")]).is_err());
    }

    #[test]
    fn test_prompt_mapping_preserves_order() {
        let table = ToneTable::new(vec![entry("tired", "energetic"), entry("bored", "funny")]).unwrap();

        assert_eq!(
            table.to_prompt_mapping(),
            r#"{"tired": "energetic", "bored": "funny"}"#
        );
    }

    #[test]
    fn test_prompt_mapping_contains_every_entry() {
        let table = ToneTable::default();
        let rendered = table.to_prompt_mapping();

        for e in table.entries() {
            assert!(rendered.contains(&format!("\"{}\": \"{}\"", e.keyword, e.uplifted_tone)));
        }
    }
}
