//! Option record definitions
//!
//! `Option<bool>` carries the unset / explicit-false / true distinction, so
//! "not provided" and "explicitly cleared" serialize differently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Engine defaults, used by the `reset_*` builders
pub const DEFAULT_PRIORITY: i32 = 0;
pub const DEFAULT_MAX_THREADS: u32 = 1;
pub const DEFAULT_INPUT_LEVEL: u8 = 0;

/// Highest input level the engine accepts
pub const MAX_INPUT_LEVEL: u8 = 100;

// ============================================
// HOTKEY OPTIONS
// ============================================

/// Options for a key trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyOptions {
    /// Buffer presses that arrive while all threads are busy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Maximum number of concurrently running callback threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<u32>,
    /// Synthetic input below this level does not fire the hotkey (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_level: Option<u8>,
}

impl HotkeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(mut self, buffer: bool) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn max_threads(mut self, max_threads: u32) -> Self {
        self.max_threads = Some(max_threads);
        self
    }

    pub fn input_level(mut self, input_level: u8) -> Self {
        self.input_level = Some(input_level);
        self
    }

    pub fn reset_priority(self) -> Self {
        self.priority(DEFAULT_PRIORITY)
    }

    pub fn reset_max_threads(self) -> Self {
        self.max_threads(DEFAULT_MAX_THREADS)
    }

    pub fn reset_input_level(self) -> Self {
        self.input_level(DEFAULT_INPUT_LEVEL)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================
// SEND MODE
// ============================================

/// How replacement text is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendMode {
    Input,
    Play,
    Event,
}

impl SendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Play => "play",
            Self::Event => "event",
        }
    }

    /// Case-insensitive lookup; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "input" => Some(Self::Input),
            "play" => Some(Self::Play),
            "event" => Some(Self::Event),
            _ => None,
        }
    }

    pub(crate) fn token(&self) -> &'static str {
        match self {
            Self::Input => "SI",
            Self::Play => "SP",
            Self::Event => "SE",
        }
    }
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendMode {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::error::Error::invalid_argument(format!(
                "send mode must be one of input, play, event (got '{}')",
                s
            ))
        })
    }
}

impl AsRef<str> for SendMode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// ============================================
// HOTSTRING OPTIONS
// ============================================

/// Options for a string trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotstringOptions {
    /// `false` fires immediately without waiting for an ending character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_end_char: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_inside_word: Option<bool>,
    /// Erase the typed abbreviation before sending the replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backspacing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    /// Takes precedence over `case_sensitive`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conform_to_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_delay: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_end_char: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    /// Takes precedence over `raw`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<bool>,
    /// Matched case-insensitively against input/play/event when encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_recognizer: Option<bool>,
}

impl HotstringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_for_end_char(mut self, value: bool) -> Self {
        self.wait_for_end_char = Some(value);
        self
    }

    pub fn replace_inside_word(mut self, value: bool) -> Self {
        self.replace_inside_word = Some(value);
        self
    }

    pub fn backspacing(mut self, value: bool) -> Self {
        self.backspacing = Some(value);
        self
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = Some(value);
        self
    }

    pub fn conform_to_case(mut self, value: bool) -> Self {
        self.conform_to_case = Some(value);
        self
    }

    pub fn key_delay(mut self, delay: i32) -> Self {
        self.key_delay = Some(delay);
        self
    }

    pub fn omit_end_char(mut self, value: bool) -> Self {
        self.omit_end_char = Some(value);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn raw(mut self, value: bool) -> Self {
        self.raw = Some(value);
        self
    }

    pub fn text(mut self, value: bool) -> Self {
        self.text = Some(value);
        self
    }

    pub fn mode(mut self, mode: impl AsRef<str>) -> Self {
        self.mode = Some(mode.as_ref().to_string());
        self
    }

    pub fn reset_recognizer(mut self, value: bool) -> Self {
        self.reset_recognizer = Some(value);
        self
    }

    pub fn reset_priority(self) -> Self {
        self.priority(DEFAULT_PRIORITY)
    }
}
