//! Option encoding - compact option strings for the trigger engine
//!
//! Hotkeys and hotstrings are configured through structured records whose
//! fields are each in one of three states:
//! - `None` - unset, the engine keeps whatever it has
//! - `Some(false)` / explicit value - emitted as an explicit token
//! - `Some(true)` - emitted as the "on" token
//!
//! # Module Structure
//!
//! - `types` - `HotkeyOptions`, `HotstringOptions`, `SendMode`
//! - `encode` - pure functions turning the records into option strings

mod encode;
mod types;

pub use encode::{
    encode_hotkey_options, encode_hotstring_options, encode_key_wait_options,
    hotstring_definition,
};
pub use types::{
    HotkeyOptions, HotstringOptions, SendMode, DEFAULT_INPUT_LEVEL, DEFAULT_MAX_THREADS,
    DEFAULT_PRIORITY, MAX_INPUT_LEVEL,
};

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
