//! Structured logging module for MoodTube
//!
//! Echoes every line to stderr and, once initialized, appends it to a daily
//! file in the configured log directory. Categories:
//! - ROUTING: Router label decisions
//! - TOPIC: Topic and tone extraction
//! - UPLIFT: Mood uplift query rewriting
//! - SEARCH: Video search calls
//! - CHAT: Companion replies
//! - PIPELINE: Request lifecycle
//! - ERROR: Branch failures

use chrono::{Local, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use once_cell::sync::Lazy;

/// Log categories for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Routing,
    Topic,
    Uplift,
    Search,
    Chat,
    Pipeline,
    Error,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Routing => "ROUTING",
            LogCategory::Topic => "TOPIC",
            LogCategory::Uplift => "UPLIFT",
            LogCategory::Search => "SEARCH",
            LogCategory::Chat => "CHAT",
            LogCategory::Pipeline => "PIPELINE",
            LogCategory::Error => "ERROR",
        }
    }
}

/// Log directory, set once `init_logging` succeeds. Until then lines only go to stderr.
static LOG_DIR: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

/// Default log directory when none is configured
pub fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".moodtube/logs")
}

fn log_file_path(dir: &Path) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    dir.join(format!("moodtube-{}.log", today))
}

/// Initialize the logging system - creates log directory if needed
pub fn init_logging(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    if let Ok(mut guard) = LOG_DIR.lock() {
        *guard = Some(log_dir.to_path_buf());
    }

    log(LogCategory::Pipeline, None, "MoodTube logging initialized");

    Ok(())
}

/// Format a single log line (without writing it)
pub fn format_line(category: LogCategory, request_id: Option<&str>, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let request_context = request_id
        .map(|id| format!("request={} | ", id.chars().take(8).collect::<String>()))
        .unwrap_or_default();

    format!(
        "[{}] [{}] {}{}\n",
        timestamp,
        category.as_str(),
        request_context,
        message
    )
}

/// Log a message with category and optional request context
pub fn log(category: LogCategory, request_id: Option<&str>, message: &str) {
    let log_line = format_line(category, request_id, message);

    // stderr, so stdout stays free for the response JSON
    eprint!("{}", log_line);

    let dir = LOG_DIR.lock().ok().and_then(|guard| guard.clone());
    if let Some(dir) = dir {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path(&dir))
        {
            let _ = file.write_all(log_line.as_bytes());
        }
    }
}

pub fn log_routing(request_id: Option<&str>, message: &str) {
    log(LogCategory::Routing, request_id, message);
}

pub fn log_topic(request_id: Option<&str>, message: &str) {
    log(LogCategory::Topic, request_id, message);
}

pub fn log_uplift(request_id: Option<&str>, message: &str) {
    log(LogCategory::Uplift, request_id, message);
}

pub fn log_search(request_id: Option<&str>, message: &str) {
    log(LogCategory::Search, request_id, message);
}

pub fn log_chat(request_id: Option<&str>, message: &str) {
    log(LogCategory::Chat, request_id, message);
}

/// Log a request lifecycle event
pub fn log_pipeline(request_id: Option<&str>, message: &str) {
    log(LogCategory::Pipeline, request_id, message);
}

/// Log an error
pub fn log_error(request_id: Option<&str>, message: &str) {
    log(LogCategory::Error, request_id, message);
}

/// Clean up old log files (keep last 7 days)
pub fn cleanup_old_logs(log_dir: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let mut deleted = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(7);

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_log = path.extension().map(|ext| ext == "log").unwrap_or(false);
        if !is_log {
            continue;
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                let modified_time: chrono::DateTime<Utc> = modified.into();
                if modified_time < cutoff && fs::remove_file(&path).is_ok() {
                    deleted += 1;
                }
            }
        }
    }

    Ok(deleted)
}
