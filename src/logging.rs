//! Structured logging: pretty stderr output plus an optional JSONL file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hotkey_kit::{config::LoggingConfig, logging};
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(&LoggingConfig::default());
//! tracing::info!(event_type = "app_start", "Started");
//! ```
//!
//! Trigger registrations and state changes are also kept in a small
//! in-memory ring buffer so a host UI can show recent activity.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "hotkey-kit.jsonl";
const MAX_LOG_LINES: usize = 50;

static LOG_BUFFER: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();

fn buffer() -> &'static Mutex<VecDeque<String>> {
    LOG_BUFFER.get_or_init(|| Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)))
}

/// Flushes the JSONL writer when dropped.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `config.filter`. If a subscriber is already
/// installed (e.g. by the host), the existing one is kept.
pub fn init(config: &LoggingConfig) -> LoggingGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.as_str()));

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let (json_layer, file_guard) = if config.json_log {
        match open_log_file(config) {
            Some((file, log_path)) => {
                let (non_blocking_file, guard) = tracing_appender::non_blocking(file);
                let layer = fmt::layer()
                    .json()
                    .with_writer(non_blocking_file)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE);
                eprintln!("[HOTKEY-KIT] JSONL log: {}", log_path.display());
                (Some(layer.boxed()), Some(guard))
            }
            None => (None, None),
        }
    } else {
        (None, None)
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init();

    match installed {
        Ok(()) => tracing::info!(
            event_type = "app_lifecycle",
            action = "logging_initialized",
            json_log = config.json_log,
            "Logging initialized"
        ),
        Err(e) => eprintln!("[LOGGING] Subscriber already installed: {}", e),
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

fn open_log_file(config: &LoggingConfig) -> Option<(fs::File, PathBuf)> {
    let log_dir = log_dir(config);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
        return None;
    }
    let log_path = log_dir.join(LOG_FILE_NAME);
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some((file, log_path)),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            None
        }
    }
}

/// Configured log directory, or ~/.hotkey-kit/logs
pub fn log_dir(config: &LoggingConfig) -> PathBuf {
    match &config.log_dir {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
        None => dirs::home_dir()
            .map(|h| h.join(".hotkey-kit").join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join("hotkey-kit-logs")),
    }
}

/// Path of the JSONL log file for `config`
pub fn log_path(config: &LoggingConfig) -> PathBuf {
    log_dir(config).join(LOG_FILE_NAME)
}

// =============================================================================
// TRIGGER EVENTS
// =============================================================================

/// Record a trigger event in the ring buffer and emit it at debug level.
pub fn log_trigger_event(kind: &str, pattern: &str, action: &str) {
    push_bounded(
        &mut buffer().lock(),
        format!("[{}] {} {}", kind.to_uppercase(), action, pattern),
    );

    tracing::debug!(
        event_type = "trigger_event",
        kind = kind,
        pattern = pattern,
        action = action,
        "{} {} {}",
        kind,
        action,
        pattern
    );
}

fn push_bounded(buf: &mut VecDeque<String>, line: String) {
    if buf.len() >= MAX_LOG_LINES {
        buf.pop_front();
    }
    buf.push_back(line);
}

/// Recent trigger events, oldest first
pub fn get_recent_logs() -> Vec<String> {
    buffer().lock().iter().cloned().collect()
}

/// The last `n` trigger events, newest first
pub fn get_last_logs(n: usize) -> Vec<String> {
    buffer().lock().iter().rev().take(n).cloned().collect()
}
