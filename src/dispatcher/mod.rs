//! Dispatcher - the call surface of the external trigger engine
//!
//! The engine owns the live trigger table and does the actual input
//! interception. This crate only drives it through the [`Dispatcher`] trait:
//! - scope push/pop around registrations (`enter_context_scope` / `exit_context_scope`)
//! - create-or-update of hotkeys and hotstrings
//! - on/off/toggle of existing triggers
//! - key sending and key state queries
//!
//! [`DryRunDispatcher`] is an in-memory engine that records every call.

mod dry_run;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::keys::{LockKey, LockState};

pub use dry_run::{DispatchCall, DryRunDispatcher, TriggerSnapshot};

/// Callback invoked by the engine when a trigger fires
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Correlates a registration with the context it was made under.
///
/// The global context is always token 0; every predicate context gets a
/// fresh token, so two contexts with identical predicates stay distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextToken(u64);

static NEXT_CONTEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl ContextToken {
    pub const GLOBAL: ContextToken = ContextToken(0);

    pub(crate) fn next() -> Self {
        ContextToken(NEXT_CONTEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Activation predicate for a context.
///
/// The engine may pass arguments (e.g. the key that fired); zero-argument
/// predicates ignore them.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&[String]) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |_args: &[String]| predicate()))
    }

    pub fn with_args<F>(predicate: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn evaluate(&self, args: &[String]) -> bool {
        (self.0)(args)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Requested state change for an existing trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerAction {
    On,
    Off,
    Toggle,
}

impl TriggerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
            Self::Toggle => "Toggle",
        }
    }
}

impl fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which state of a key to query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyStateMode {
    /// Logical state, as seen by applications
    Logical,
    /// Physical state, ignoring synthetic input
    Physical,
    /// Toggle state of CapsLock/NumLock/ScrollLock/Insert
    Toggled,
}

impl KeyStateMode {
    /// Engine mode code; `None` for the logical state
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Logical => None,
            Self::Physical => Some("P"),
            Self::Toggled => Some("T"),
        }
    }
}

/// Operations the trigger engine must provide.
///
/// Implementations are shared across threads. Scope calls are only ever
/// issued with the crate's context guard held, one registration per scope.
pub trait Dispatcher: Send + Sync {
    /// Push a predicate scope; subsequent registrations belong to it.
    fn enter_context_scope(&self, token: ContextToken, predicate: &Predicate) -> Result<()>;

    /// Pop the scope pushed by the matching `enter_context_scope`.
    fn exit_context_scope(&self) -> Result<()>;

    /// Create or update a key trigger. `callback` is `None` when only the
    /// options change.
    fn register_hotkey(
        &self,
        token: ContextToken,
        key_name: &str,
        callback: Option<Callback>,
        options: &str,
    ) -> Result<()>;

    fn set_hotkey_state(
        &self,
        token: ContextToken,
        key_name: &str,
        action: TriggerAction,
    ) -> Result<()>;

    /// Create or update a string trigger. `definition` is `:<options>:<pattern>`;
    /// `replacement` is empty when a callback is used instead.
    fn register_hotstring(
        &self,
        definition: &str,
        replacement: &str,
        callback: Option<Callback>,
    ) -> Result<()>;

    fn set_hotstring_state(&self, pattern: &str, action: TriggerAction) -> Result<()>;

    fn reset_hotstring_recognizer(&self) -> Result<()>;

    fn send_keys(&self, keys: &str) -> Result<()>;

    /// `Ok(None)` means the engine could not determine the state.
    fn query_key_state(&self, key_name: &str, mode: KeyStateMode) -> Result<Option<bool>>;

    /// Block until the key changes state. Returns `true` if the wait timed out.
    fn key_wait(&self, key_name: &str, options: &str) -> Result<bool>;

    fn set_lock_key_state(&self, key: LockKey, state: LockState) -> Result<()>;

    fn set_send_level(&self, level: u8) -> Result<()>;

    fn set_send_mode(&self, mode: &str) -> Result<()>;
}
