//! Video search against the YouTube Data API, normalized into `VideoResult`.

use crate::error::{BoxError, PipelineError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound the search endpoint accepts for maxResults
const YOUTUBE_MAX_PAGE: usize = 50;

pub const RESULT_KIND_VIDEO: &str = "video";

/// One upstream hit, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHit {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, kind: &str, max_results: usize) -> Result<Vec<VideoHit>, BoxError>;
}

// ============ YouTube Data API ============

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct YouTubeError {
    error: YouTubeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct YouTubeErrorDetails {
    code: u16,
    message: String,
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.trim().to_string(),
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, kind: &str, max_results: usize) -> Result<Vec<VideoHit>, BoxError> {
        let max = max_results.min(YOUTUBE_MAX_PAGE).to_string();

        let response = self.client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", kind),
                ("q", query),
                ("maxResults", max.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(parsed) = serde_json::from_str::<YouTubeError>(&error_text) {
                return Err(format!(
                    "YouTube API error ({}): {}",
                    parsed.error.code, parsed.error.message
                ).into());
            }

            return Err(format!("YouTube API error ({}): {}", status, error_text).into());
        }

        let listing: SearchListResponse = response.json().await?;
        Ok(hits_from_listing(listing))
    }
}

/// Items without a video id (channels, playlists) are skipped
fn hits_from_listing(listing: SearchListResponse) -> Vec<VideoHit> {
    listing
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            let snippet = item.snippet.unwrap_or(Snippet {
                title: String::new(),
                description: String::new(),
            });
            Some(VideoHit {
                id,
                title: snippet.title,
                description: snippet.description,
            })
        })
        .collect()
}

/// Bounds every search call; expiry is reported like a transport error
pub struct TimedVideoSearch {
    inner: Arc<dyn VideoSearch>,
    timeout: Duration,
}

impl TimedVideoSearch {
    pub fn new(inner: Arc<dyn VideoSearch>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl VideoSearch for TimedVideoSearch {
    async fn search(&self, query: &str, kind: &str, max_results: usize) -> Result<Vec<VideoHit>, BoxError> {
        match tokio::time::timeout(self.timeout, self.inner.search(query, kind, max_results)).await {
            Ok(result) => result,
            Err(_) => Err(format!("video search timed out after {:?}", self.timeout).into()),
        }
    }
}

// ============ Normalized results ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub url: String,
    pub embed_url: String,
    pub title: String,
    pub description: String,
}

impl VideoResult {
    pub fn from_hit(hit: VideoHit) -> Self {
        Self {
            url: format!("https://www.youtube.com/watch?v={}", hit.id),
            embed_url: format!("https://www.youtube.com/embed/{}?start=0", hit.id),
            title: hit.title,
            description: hit.description,
        }
    }
}

pub struct VideoSearchAdapter {
    search: Arc<dyn VideoSearch>,
}

impl VideoSearchAdapter {
    pub fn new(search: Arc<dyn VideoSearch>) -> Self {
        Self { search }
    }

    /// At most `max_results` videos, in upstream order
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<VideoResult>, PipelineError> {
        let hits = self.search
            .search(query, RESULT_KIND_VIDEO, max_results)
            .await
            .map_err(|e| PipelineError::SearchUnavailable(e.to_string()))?;

        Ok(hits
            .into_iter()
            .take(max_results)
            .map(VideoResult::from_hit)
            .collect())
    }
}
