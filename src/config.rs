//! Startup configuration loaded from the environment (and `.env` if present).
//!
//! Missing credentials are fatal here and never surface per request.

use crate::error::PipelineError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which completion backend drives routing, uplift and chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn from_str(s: &str) -> Option<Provider> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Some(Provider::OpenRouter),
            "anthropic" => Some(Provider::Anthropic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub completion_key: String,
    pub model: Option<String>,
    pub youtube_key: String,
    pub max_results: usize,
    pub call_timeout: Duration,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load `.env`, then read configuration from the process environment.
    pub fn from_env() -> Result<Self, PipelineError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("MOODTUBE_PROVIDER") {
            Some(raw) => Provider::from_str(&raw).ok_or_else(|| {
                PipelineError::ConfigurationMissing(format!(
                    "MOODTUBE_PROVIDER must be 'openrouter' or 'anthropic', got '{}'",
                    raw
                ))
            })?,
            None => Provider::OpenRouter,
        };

        let key_name = match provider {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        };
        let completion_key = get(key_name)
            .ok_or_else(|| PipelineError::ConfigurationMissing(format!("{} is not set", key_name)))?;

        let youtube_key = get("YOUTUBE_API_KEY")
            .or_else(|| get("YOUTUBE_API"))
            .ok_or_else(|| PipelineError::ConfigurationMissing("YOUTUBE_API_KEY is not set".to_string()))?;

        let max_results = match get("MOODTUBE_MAX_RESULTS") {
            Some(raw) => parse_positive(&raw, "MOODTUBE_MAX_RESULTS")? as usize,
            None => DEFAULT_MAX_RESULTS,
        };

        let timeout_secs = match get("MOODTUBE_TIMEOUT_SECS") {
            Some(raw) => parse_positive(&raw, "MOODTUBE_TIMEOUT_SECS")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            provider,
            completion_key,
            model: get("MOODTUBE_MODEL"),
            youtube_key,
            max_results,
            call_timeout: Duration::from_secs(timeout_secs),
            log_dir: get("MOODTUBE_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<u64, PipelineError> {
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PipelineError::ConfigurationMissing(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}
