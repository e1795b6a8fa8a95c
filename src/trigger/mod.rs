//! Triggers - hotkeys and hotstrings bound to a context
//!
//! A trigger's identity is (context, pattern) and never changes. Its
//! configuration is not stored here: every `update` re-encodes the options
//! and re-registers, and the engine holds the current state.
//!
//! Lifecycle: constructed (unregistered) -> registered after the first
//! `update` -> enabled/disabled/toggled any number of times. There is no
//! unregister; the engine has no such primitive, so `disable` is the way
//! to retire a trigger.

mod hotkey;
mod hotstring;

use crate::context::TriggerContext;
use crate::dispatcher::TriggerAction;
use crate::error::Result;

pub use hotkey::Hotkey;
pub use hotstring::{Hotstring, Replacement};

/// Common capability of hotkeys and hotstrings
pub trait Trigger {
    /// Key name or string pattern
    fn pattern(&self) -> &str;

    fn context(&self) -> &TriggerContext;

    /// `true` once an `update` has succeeded
    fn is_registered(&self) -> bool;

    /// Lightweight state change; does not enter the context or re-encode options.
    fn set_state(&self, action: TriggerAction) -> Result<()>;

    fn enable(&self) -> Result<()> {
        self.set_state(TriggerAction::On)
    }

    fn disable(&self) -> Result<()> {
        self.set_state(TriggerAction::Off)
    }

    fn toggle(&self) -> Result<()> {
        self.set_state(TriggerAction::Toggle)
    }
}
