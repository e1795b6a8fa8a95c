use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument};

use super::Trigger;
use crate::context::TriggerContext;
use crate::dispatcher::{Callback, TriggerAction};
use crate::error::{Error, Result};
use crate::guard;
use crate::logging;
use crate::options::{encode_hotkey_options, HotkeyOptions, MAX_INPUT_LEVEL};

/// A key trigger, e.g. `^a`, `*CapsLock`, `F1 Up`.
///
/// Cheap to clone; clones share registration state.
#[derive(Clone, Debug)]
pub struct Hotkey {
    key_name: String,
    context: TriggerContext,
    registered: Arc<AtomicBool>,
}

impl Hotkey {
    /// Create an unregistered handle. Fails on an empty key name.
    pub fn new(key_name: impl Into<String>, context: TriggerContext) -> Result<Self> {
        let key_name = key_name.into();
        if key_name.is_empty() {
            return Err(Error::invalid_argument("invalid key name"));
        }
        Ok(Self {
            key_name,
            context,
            registered: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Create or re-register the hotkey.
    ///
    /// `callback: None` keeps the existing callback and only applies options;
    /// the engine rejects that for a hotkey it has never seen.
    ///
    /// `is_registered` follows the registration call itself. If only the
    /// scope exit fails, this returns the exit error but the hotkey is
    /// registered.
    #[instrument(skip(self, callback), fields(key = %self.key_name, context = %self.context.token()))]
    pub fn update(&self, callback: Option<Callback>, options: &HotkeyOptions) -> Result<()> {
        if let Some(level) = options.input_level {
            if level > MAX_INPUT_LEVEL {
                return Err(Error::invalid_argument(format!(
                    "input level must be between 0 and {}",
                    MAX_INPUT_LEVEL
                )));
            }
        }
        let option_str = encode_hotkey_options(options);
        let token = self.context.token();

        guard::with_context(&self.context, |dispatcher| {
            dispatcher.register_hotkey(token, &self.key_name, callback, &option_str)?;
            self.registered.store(true, Ordering::SeqCst);
            Ok(())
        })?;

        info!(
            event_type = "trigger_registered",
            kind = "hotkey",
            options = %option_str,
            "Registered hotkey '{}'",
            self.key_name
        );
        logging::log_trigger_event("hotkey", &self.key_name, "registered");
        Ok(())
    }
}

impl Trigger for Hotkey {
    fn pattern(&self) -> &str {
        &self.key_name
    }

    fn context(&self) -> &TriggerContext {
        &self.context
    }

    fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    fn set_state(&self, action: TriggerAction) -> Result<()> {
        guard::serialized(|| {
            self.context
                .dispatcher()
                .set_hotkey_state(self.context.token(), &self.key_name, action)
        })?;
        logging::log_trigger_event("hotkey", &self.key_name, action.as_str());
        Ok(())
    }
}

impl PartialEq for Hotkey {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context && self.key_name == other.key_name
    }
}

impl Eq for Hotkey {}

impl Hash for Hotkey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.hash(state);
        self.key_name.hash(state);
    }
}
