//! Scripted stand-ins for the external collaborators, shared by unit tests.

use crate::completion::CompletionService;
use crate::error::BoxError;
use crate::topic::PhraseExtractor;
use crate::youtube::{VideoHit, VideoSearch};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub struct FixedPhrases {
    phrases: Vec<String>,
}

impl FixedPhrases {
    pub fn new(phrases: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl PhraseExtractor for FixedPhrases {
    fn phrases(&self, _text: &str) -> Vec<String> {
        self.phrases.clone()
    }
}

/// Replays queued responses in order and records every (system, input) pair
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
}

impl ScriptedCompletion {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| Ok(r.to_string())).collect()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        let scripted = Self::new(&[]);
        scripted.push_err(message);
        scripted
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_err(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(&self, system_prompt: &str, input: &str) -> Result<String, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), input.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(message.into()),
            None => Err("no scripted response left".into()),
        }
    }
}

/// Returns a fixed set of hits (or a fixed error) and records each request
pub struct FakeVideoSearch {
    hits: Result<Vec<VideoHit>, String>,
    calls: Mutex<Vec<(String, String, usize)>>,
}

impl FakeVideoSearch {
    pub fn with_hits(count: usize) -> Self {
        let hits = (0..count)
            .map(|i| VideoHit {
                id: format!("vid{}", i),
                title: format!("Title {}", i),
                description: format!("Description {}", i),
            })
            .collect();
        Self {
            hits: Ok(hits),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            hits: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for FakeVideoSearch {
    async fn search(&self, query: &str, kind: &str, max_results: usize) -> Result<Vec<VideoHit>, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), kind.to_string(), max_results));

        match &self.hits {
            Ok(hits) => Ok(hits.clone()),
            Err(message) => Err(message.clone().into()),
        }
    }
}
