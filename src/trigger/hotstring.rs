use std::fmt;
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
use crate::options::{encode_hotstring_options, hotstring_definition, HotstringOptions};

/// What a hotstring produces when it fires
#[derive(Clone)]
pub enum Replacement {
    /// Literal text typed in place of the abbreviation
    Text(String),
    Callback(Callback),
}

impl Replacement {
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(callback))
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Callback> for Replacement {
    fn from(callback: Callback) -> Self {
        Self::Callback(callback)
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// A string trigger, e.g. `btw` expanding to `by the way`.
#[derive(Clone, Debug)]
pub struct Hotstring {
    pattern: String,
    context: TriggerContext,
    registered: Arc<AtomicBool>,
}

impl Hotstring {
    /// Create an unregistered handle. Fails on an empty pattern.
    pub fn new(pattern: impl Into<String>, context: TriggerContext) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(Error::invalid_argument("invalid hotstring pattern"));
        }
        Ok(Self {
            pattern,
            context,
            registered: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn string(&self) -> &str {
        &self.pattern
    }

    /// Create or re-register the hotstring as `:<options>:<pattern>`.
    ///
    /// With `replacement: None` only the options change. As with hotkeys,
    /// `is_registered` follows the registration call, not the scope exit.
    #[instrument(skip(self, replacement), fields(pattern = %self.pattern, context = %self.context.token()))]
    pub fn update(
        &self,
        replacement: Option<Replacement>,
        options: &HotstringOptions,
    ) -> Result<()> {
        let option_str = encode_hotstring_options(options);
        let definition = hotstring_definition(&option_str, &self.pattern);
        let (text, callback) = match replacement {
            Some(Replacement::Text(text)) => (text, None),
            Some(Replacement::Callback(callback)) => (String::new(), Some(callback)),
            None => (String::new(), None),
        };

        guard::with_context(&self.context, |dispatcher| {
            dispatcher.register_hotstring(&definition, &text, callback)?;
            self.registered.store(true, Ordering::SeqCst);
            Ok(())
        })?;

        info!(
            event_type = "trigger_registered",
            kind = "hotstring",
            definition = %definition,
            "Registered hotstring '{}'",
            self.pattern
        );
        logging::log_trigger_event("hotstring", &self.pattern, "registered");
        Ok(())
    }
}

impl Trigger for Hotstring {
    fn pattern(&self) -> &str {
        &self.pattern
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
                .set_hotstring_state(&self.pattern, action)
        })?;
        logging::log_trigger_event("hotstring", &self.pattern, action.as_str());
        Ok(())
    }
}

impl PartialEq for Hotstring {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context && self.pattern == other.pattern
    }
}

impl Eq for Hotstring {}

impl Hash for Hotstring {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.hash(state);
        self.pattern.hash(state);
    }
}
