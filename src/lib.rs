//! Hotkey Kit - hotkey, hotstring and key remap registration
//!
//! Triggers are registered through a [`Dispatcher`], the host's input
//! engine. Each trigger belongs to a [`TriggerContext`]: either the global
//! context or one gated by a predicate. Registrations under a predicate
//! context are bracketed by enter/exit scope calls that never overlap.

// Error types and logging helpers
pub mod error;

// Structured logging and the recent-activity buffer
pub mod logging;

// JSON configuration and bulk registration
pub mod config;

// Engine boundary and the dry-run engine
pub mod dispatcher;

// Option records and their engine string encoding
pub mod options;

// Registration contexts and the process-wide scope guard
pub mod context;
mod guard;

// Hotkeys, hotstrings and remapped keys
pub mod remap;
pub mod trigger;

// Key state queries, lock keys and sending
pub mod keys;

// Process-wide dispatcher and free functions
pub mod runtime;

pub use context::TriggerContext;
pub use dispatcher::{
    Callback, ContextToken, Dispatcher, DryRunDispatcher, KeyStateMode, Predicate, TriggerAction,
};
pub use error::{Error, Result, ResultExt};
pub use options::{HotkeyOptions, HotstringOptions, SendMode};
pub use remap::{RemapEdge, RemappedKey};
pub use runtime::{default_context, hotkey_context, init_dispatcher};
pub use trigger::{Hotkey, Hotstring, Replacement, Trigger};
