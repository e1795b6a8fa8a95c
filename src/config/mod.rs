//! Configuration module - declarative triggers and logging settings
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.hotkey-kit/config.json
//! - Default values for all settings
//! - Registering the configured triggers against a context
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, LoggingConfig, bindings)
//! - `loader` - File system loading and parsing
//! - `apply` - Registration of configured bindings

mod apply;
mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};

pub use types::{Config, HotkeyBinding, HotstringBinding, LoggingConfig, RemapBinding};

pub use loader::{load_config, load_config_from};

pub use apply::AppliedBindings;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
