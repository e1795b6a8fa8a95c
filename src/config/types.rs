//! Configuration type definitions

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::options::{HotkeyOptions, HotstringOptions};

// ============================================
// LOGGING CONFIG
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Tracing filter directive (default: "info"); RUST_LOG wins if set
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Also write JSONL to `<logDir>/hotkey-kit.jsonl` (default: true)
    #[serde(default = "default_json_log")]
    pub json_log: bool,
    /// Log directory; `~` is expanded (default: ~/.hotkey-kit/logs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
fn default_json_log() -> bool {
    DEFAULT_JSON_LOG
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
            json_log: DEFAULT_JSON_LOG,
            log_dir: None,
        }
    }
}

// ============================================
// BINDINGS
// ============================================

/// A hotkey that sends keys when pressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyBinding {
    pub key: String,
    /// Keys sent when the hotkey fires, e.g. "{Volume_Up}"
    pub send: String,
    #[serde(flatten)]
    pub options: HotkeyOptions,
}

/// A text-replacement hotstring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotstringBinding {
    pub pattern: String,
    pub replacement: String,
    #[serde(flatten)]
    pub options: HotstringOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemapBinding {
    pub origin: String,
    pub destination: String,
}

// ============================================
// MAIN CONFIG
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hotkeys: Vec<HotkeyBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hotstrings: Vec<HotstringBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remaps: Vec<RemapBinding>,
    /// Level assigned to synthesized input, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_level: Option<u8>,
    /// Send mode for `send`: "input", "play" or "event"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_mode: Option<String>,
}

impl Config {
    pub fn trigger_count(&self) -> usize {
        self.hotkeys.len() + self.hotstrings.len() + self.remaps.len()
    }
}
