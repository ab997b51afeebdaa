//! Search topic extraction.
//!
//! A `PhraseExtractor` proposes candidate noun-phrase spans; `TopicExtractor`
//! keeps the longest one, or falls back to the punctuation-stripped input.

use std::sync::Arc;

/// Candidate phrase spans for a text, in textual order (possibly empty)
pub trait PhraseExtractor: Send + Sync {
    fn phrases(&self, text: &str) -> Vec<String>;
}

/// Words that end a phrase run: pronouns, auxiliaries, request verbs, fillers
const BREAK_WORDS: &[&str] = &[
    // Pronouns
    "i", "i'm", "im", "i've", "i'd", "me", "my", "myself", "you", "you're", "your",
    "we", "us", "our", "he", "she", "it", "it's", "they", "them", "this", "that",
    "these", "those", "something", "anything",
    // Auxiliaries
    "am", "is", "are", "was", "were", "be", "been", "being", "can", "could", "would",
    "will", "should", "shall", "may", "might", "must", "do", "does", "did", "don't",
    "have", "has", "had", "let", "let's",
    // Request verbs
    "play", "show", "find", "fetch", "search", "get", "give", "want", "need", "watch",
    "listen", "help", "talk", "recommend", "put", "look", "make", "feel", "feeling",
    "feels", "felt",
    // Fillers and intensifiers
    "hey", "hi", "hello", "ok", "okay", "please", "so", "very", "really", "just",
    "too", "now", "today", "right", "kind", "bit",
    // Conjunctions and prepositions
    "and", "or", "but", "for", "to", "with", "about", "on", "of", "in", "up", "at",
    "from", "by", "like", "if", "because", "while",
];

const DETERMINERS: &[&str] = &["a", "an", "the", "some", "any", "more"];

/// Break words after which a bare run is a predicate ("I'm bored", "feeling low"), not a subject
const COPULAS: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "i'm", "im", "it's",
    "you're", "feel", "feeling", "feels", "felt",
];

/// Break words that sit between a copula and its predicate without ending it
const INTENSIFIERS: &[&str] = &["so", "very", "really", "just", "too", "kind", "of", "bit"];

/// Heuristic noun chunker: runs of content words between break words and punctuation
#[derive(Debug, Default, Clone, Copy)]
pub struct NounChunker;

impl NounChunker {
    fn normalize(word: &str) -> String {
        word.to_lowercase().replace('\u{2019}', "'")
    }

    fn is_break_word(word: &str) -> bool {
        BREAK_WORDS.contains(&word)
    }

    fn is_determiner(word: &str) -> bool {
        DETERMINERS.contains(&word.to_lowercase().as_str())
    }

    /// Predicate runs are dropped; so are runs of nothing but determiners
    fn flush(run: &mut Vec<String>, predicate: bool, out: &mut Vec<String>) {
        if !predicate && run.iter().any(|w| !Self::is_determiner(w)) {
            out.push(run.join(" "));
        }
        run.clear();
    }
}

impl PhraseExtractor for NounChunker {
    fn phrases(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();

        let clauses = text.split(|c: char| {
            !(c.is_alphanumeric() || c.is_whitespace() || c == '\'' || c == '\u{2019}' || c == '-' || c == '_')
        });

        for clause in clauses {
            let mut run: Vec<String> = Vec::new();
            let mut run_is_predicate = false;
            let mut after_copula = false;

            for word in clause.split_whitespace() {
                let word = word.trim_matches(|c: char| c == '\'' || c == '\u{2019}' || c == '-');
                if word.is_empty() {
                    continue;
                }

                let normalized = Self::normalize(word);
                if Self::is_break_word(&normalized) {
                    Self::flush(&mut run, run_is_predicate, &mut out);
                    after_copula = COPULAS.contains(&normalized.as_str())
                        || (after_copula && INTENSIFIERS.contains(&normalized.as_str()));
                } else {
                    if run.is_empty() {
                        // "I'm a big fan" still names something
                        run_is_predicate = after_copula && !Self::is_determiner(word);
                    }
                    after_copula = false;
                    run.push(word.to_string());
                }
            }
            Self::flush(&mut run, run_is_predicate, &mut out);
        }

        out
    }
}

pub struct TopicExtractor {
    phrases: Arc<dyn PhraseExtractor>,
}

impl TopicExtractor {
    pub fn new(phrases: Arc<dyn PhraseExtractor>) -> Self {
        Self { phrases }
    }

    /// Longest candidate phrase (first wins ties), lower-cased. Never fails.
    pub fn extract_topic(&self, text: &str) -> String {
        let candidates = self.phrases.phrases(text);

        let mut best: Option<&str> = None;
        for candidate in candidates.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            let longer = best
                .map(|b| candidate.chars().count() > b.chars().count())
                .unwrap_or(true);
            if longer {
                best = Some(candidate);
            }
        }

        match best {
            Some(phrase) => phrase.to_lowercase(),
            None => strip_punctuation(text),
        }
    }
}

impl Default for TopicExtractor {
    fn default() -> Self {
        Self::new(Arc::new(NounChunker))
    }
}

/// Drop everything but word characters and whitespace, then trim and lower-case
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase()
}
