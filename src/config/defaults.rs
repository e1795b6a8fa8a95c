//! Default configuration values

/// Where `load_config` looks for the config file
pub const DEFAULT_CONFIG_PATH: &str = "~/.hotkey-kit/config.json";

/// Tracing filter used when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Write the JSONL log file by default
pub const DEFAULT_JSON_LOG: bool = true;
