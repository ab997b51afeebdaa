//! Single-pass state graph: Start → Decide → {ChatBranch | VideoBranch} → End.
//!
//! Exactly one branch runs per request. Branch errors are caught at the
//! branch boundary and turned into a uniform failure response.

use crate::companion::{ChatReply, ConversationResponder};
use crate::completion::{self, CompletionService, TimedCompletion};
use crate::config::Config;
use crate::error::PipelineError;
use crate::logging;
use crate::router::{Route, Router};
use crate::tones::ToneTable;
use crate::topic::{NounChunker, PhraseExtractor, TopicExtractor};
use crate::uplift::MoodUplifter;
use crate::youtube::{TimedVideoSearch, VideoResult, VideoSearch, VideoSearchAdapter, YouTubeClient};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const UNKNOWN_TOOL_MESSAGE: &str = "Something went wrong or unknown tool used.";
pub const FAILURE_MESSAGE: &str = "Sorry, I couldn't complete that request right now.";

// ============ Response Shape ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

/// Final response: `{"tool": ..., "content": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "content", rename_all = "lowercase")]
pub enum ToolResponse {
    ChatCompanion(ChatReply),
    YoutubeAgent(Vec<VideoResult>),
    Unknown(Notice),
}

impl ToolResponse {
    pub fn unknown_tool() -> Self {
        ToolResponse::Unknown(Notice {
            message: UNKNOWN_TOOL_MESSAGE.to_string(),
        })
    }

    pub fn failure() -> Self {
        ToolResponse::Unknown(Notice {
            message: FAILURE_MESSAGE.to_string(),
        })
    }

    pub fn tool(&self) -> &'static str {
        match self {
            ToolResponse::ChatCompanion(_) => Route::ChatIntent.as_str(),
            ToolResponse::YoutubeAgent(_) => Route::VideoSearchIntent.as_str(),
            ToolResponse::Unknown(_) => Route::Unknown.as_str(),
        }
    }
}

// ============ Request State ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Start,
    Decide,
    ChatBranch,
    VideoBranch,
    End,
}

/// Conditional edge out of `Decide`. `Unknown` has no branch and ends the request.
pub fn next_after_decide(route: Route) -> Node {
    match route {
        Route::ChatIntent => Node::ChatBranch,
        Route::VideoSearchIntent => Node::VideoBranch,
        Route::Unknown => Node::End,
    }
}

/// Per-request state; created in `run`, consumed by `into_response`
#[derive(Debug)]
pub struct RequestState {
    pub request_id: String,
    pub user_message: String,
    route: OnceCell<Route>,
    pub chat_reply: Option<ChatReply>,
    pub video_results: Option<Vec<VideoResult>>,
    pub failure: Option<PipelineError>,
}

impl RequestState {
    pub fn new(user_message: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            user_message: user_message.to_string(),
            route: OnceCell::new(),
            chat_reply: None,
            video_results: None,
            failure: None,
        }
    }

    pub fn route(&self) -> Option<Route> {
        self.route.get().copied()
    }

    /// Returns false if a route was already recorded; the first one stands.
    pub fn set_route(&mut self, route: Route) -> bool {
        self.route.set(route).is_ok()
    }

    pub fn into_response(self) -> ToolResponse {
        if self.failure.is_some() {
            return ToolResponse::failure();
        }

        match (self.route(), self.chat_reply, self.video_results) {
            (Some(Route::ChatIntent), Some(reply), None) => ToolResponse::ChatCompanion(reply),
            (Some(Route::VideoSearchIntent), None, Some(videos)) => ToolResponse::YoutubeAgent(videos),
            (Some(Route::Unknown), None, None) => ToolResponse::unknown_tool(),
            _ => ToolResponse::failure(),
        }
    }
}

// ============ Pipeline ============

pub struct Pipeline {
    router: Router,
    responder: ConversationResponder,
    topics: TopicExtractor,
    tones: Arc<ToneTable>,
    uplifter: MoodUplifter,
    videos: VideoSearchAdapter,
    max_results: usize,
}

impl Pipeline {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        phrases: Arc<dyn PhraseExtractor>,
        search: Arc<dyn VideoSearch>,
        tones: ToneTable,
        max_results: usize,
    ) -> Self {
        let tones = Arc::new(tones);
        Self {
            router: Router::new(completion.clone()),
            responder: ConversationResponder::new(completion.clone()),
            topics: TopicExtractor::new(phrases),
            uplifter: MoodUplifter::new(completion, tones.clone()),
            tones,
            videos: VideoSearchAdapter::new(search),
            max_results,
        }
    }

    /// Production wiring: HTTP clients from config, each call bounded by the configured timeout
    pub fn from_config(config: &Config) -> Self {
        let completion: Arc<dyn CompletionService> = Arc::new(TimedCompletion::new(
            completion::from_config(config),
            config.call_timeout,
        ));
        let search: Arc<dyn VideoSearch> = Arc::new(TimedVideoSearch::new(
            Arc::new(YouTubeClient::new(&config.youtube_key)),
            config.call_timeout,
        ));

        Self::new(
            completion,
            Arc::new(NounChunker),
            search,
            ToneTable::default(),
            config.max_results,
        )
    }

    /// Handle one message end to end. Never fails; errors become a failure response.
    pub async fn handle(&self, message: &str) -> ToolResponse {
        self.run(message).await.into_response()
    }

    /// Walk the graph and return the populated request state
    pub async fn run(&self, message: &str) -> RequestState {
        let mut state = RequestState::new(message);
        let mut node = Node::Start;

        loop {
            node = match node {
                Node::Start => {
                    logging::log_pipeline(Some(&state.request_id), &format!(
                        "Request started: {}", preview(&state.user_message)
                    ));
                    Node::Decide
                }
                Node::Decide => self.decide(&mut state).await,
                Node::ChatBranch => self.chat_branch(&mut state).await,
                Node::VideoBranch => self.video_branch(&mut state).await,
                Node::End => break,
            };
        }

        logging::log_pipeline(Some(&state.request_id), &format!(
            "Request finished: route={}, failed={}",
            state.route().map(|r| r.as_str()).unwrap_or("none"),
            state.failure.is_some()
        ));

        state
    }

    async fn decide(&self, state: &mut RequestState) -> Node {
        let id = state.request_id.clone();

        match self.router.decide_with_label(&state.user_message).await {
            Ok((route, label)) => {
                state.set_route(route);
                logging::log_routing(Some(&id), &format!("label={:?} route={}", label, route.as_str()));

                if route == Route::Unknown {
                    let err = PipelineError::ClassificationAmbiguous(label);
                    logging::log_error(Some(&id), &format!("[{}] {}", err.kind(), err));
                }

                next_after_decide(route)
            }
            Err(e) => {
                self.record_failure(state, e);
                Node::End
            }
        }
    }

    async fn chat_branch(&self, state: &mut RequestState) -> Node {
        match self.responder.respond(&state.user_message).await {
            Ok(reply) => {
                logging::log_chat(Some(&state.request_id), &format!(
                    "Reply generated ({} chars)", reply.response.chars().count()
                ));
                state.chat_reply = Some(reply);
            }
            Err(e) => self.record_failure(state, e),
        }
        Node::End
    }

    async fn video_branch(&self, state: &mut RequestState) -> Node {
        let id = state.request_id.clone();

        match self.video_chain(&id, &state.user_message).await {
            Ok(videos) => state.video_results = Some(videos),
            Err(e) => self.record_failure(state, e),
        }
        Node::End
    }

    /// TopicExtractor → ToneDetector → MoodUplifter → VideoSearchAdapter
    async fn video_chain(&self, id: &str, message: &str) -> Result<Vec<VideoResult>, PipelineError> {
        let topic = self.topics.extract_topic(message);
        let tone = self.tones.detect(message);
        logging::log_topic(Some(id), &format!("topic={:?} tone={:?}", topic, tone));

        let mood = self.uplifter.uplift(&topic, tone).await?;
        if mood.tone_overridden(tone) {
            logging::log_uplift(Some(id), &format!(
                "Model reported tone {:?} instead of supplied {:?}", mood.detected_tone, tone
            ));
        }
        logging::log_uplift(Some(id), &format!(
            "final_query={:?} ({} words)", mood.final_query, mood.word_count()
        ));

        let videos = self.videos.search(&mood.final_query, self.max_results).await?;
        logging::log_search(Some(id), &format!("{} results for {:?}", videos.len(), mood.final_query));

        Ok(videos)
    }

    fn record_failure(&self, state: &mut RequestState, err: PipelineError) {
        logging::log_error(Some(&state.request_id), &format!("[{}] {}", err.kind(), err));
        state.failure = Some(err);
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(80).collect();
    if text.chars().count() > 80 {
        out.push_str("...");
    }
    out
}
