pub mod anthropic;
pub mod companion;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;
pub mod openrouter;
pub mod orchestrator;
pub mod prompts;
pub mod router;
pub mod tones;
pub mod topic;
pub mod uplift;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_support;

pub use companion::ChatReply;
pub use config::Config;
pub use error::PipelineError;
pub use orchestrator::{Pipeline, ToolResponse};
pub use router::Route;
pub use tones::{ToneEntry, ToneTable};
pub use uplift::MoodQuery;
pub use youtube::VideoResult;

// ============ App Initialization ============

/// Set up file logging and prune old logs. Logging failures are reported, not fatal.
pub fn init_app(config: &Config) {
    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);

    if let Err(e) = logging::init_logging(&log_dir) {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    match logging::cleanup_old_logs(&log_dir) {
        Ok(0) => {}
        Ok(n) => logging::log_pipeline(None, &format!("Removed {} old log files", n)),
        Err(e) => logging::log_error(None, &format!("Log cleanup failed: {}", e)),
    }

    logging::log_pipeline(None, &format!(
        "App initialized: provider={}, max_results={}, timeout={:?}",
        config.provider.as_str(),
        config.max_results,
        config.call_timeout
    ));
}
