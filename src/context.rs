//! Trigger contexts - activation predicates for hotkeys and hotstrings
//!
//! A context owns no triggers. Triggers reference it, and it is re-entered
//! around every single registration instead of being held open, so scopes
//! never nest.
//!
//! # Example
//!
//! ```ignore
//! use hotkey_kit::{HotkeyOptions, TriggerContext};
//!
//! let editor = TriggerContext::when(dispatcher.clone(), || editor_focused());
//! editor.hotkey("^s", || save(), &HotkeyOptions::new().priority(1))?;
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::dispatcher::{ContextToken, Dispatcher, Predicate};
use crate::error::Result;
use crate::options::{HotkeyOptions, HotstringOptions};
use crate::remap::{self, RemappedKey};
use crate::trigger::{Hotkey, Hotstring, Replacement};

/// An activation scope: the global context or a predicate-guarded one.
///
/// Identity is the context token. Clones are the same context; two contexts
/// built from equivalent predicates are not.
#[derive(Clone)]
pub struct TriggerContext {
    token: ContextToken,
    predicate: Option<Predicate>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl TriggerContext {
    /// The always-active context. Entering and exiting it are no-ops.
    pub fn global(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            token: ContextToken::GLOBAL,
            predicate: None,
            dispatcher,
        }
    }

    pub fn with_predicate(dispatcher: Arc<dyn Dispatcher>, predicate: Predicate) -> Self {
        Self {
            token: ContextToken::next(),
            predicate: Some(predicate),
            dispatcher,
        }
    }

    /// Context active while a zero-argument predicate returns `true`.
    pub fn when<F>(dispatcher: Arc<dyn Dispatcher>, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::with_predicate(dispatcher, Predicate::new(predicate))
    }

    /// Context whose predicate receives the arguments the engine passes.
    pub fn when_args<F>(dispatcher: Arc<dyn Dispatcher>, predicate: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        Self::with_predicate(dispatcher, Predicate::with_args(predicate))
    }

    pub fn token(&self) -> ContextToken {
        self.token
    }

    pub fn is_global(&self) -> bool {
        self.predicate.is_none()
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn dispatcher(&self) -> &Arc<dyn Dispatcher> {
        &self.dispatcher
    }

    pub(crate) fn enter(&self) -> Result<()> {
        match &self.predicate {
            Some(predicate) => self.dispatcher.enter_context_scope(self.token, predicate),
            None => Ok(()),
        }
    }

    pub(crate) fn exit(&self) -> Result<()> {
        match self.predicate {
            Some(_) => self.dispatcher.exit_context_scope(),
            None => Ok(()),
        }
    }

    /// Register `key_name` in this context and return its handle.
    pub fn hotkey<F>(&self, key_name: &str, callback: F, options: &HotkeyOptions) -> Result<Hotkey>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let hotkey = Hotkey::new(key_name, self.clone())?;
        hotkey.update(Some(Arc::new(callback)), options)?;
        Ok(hotkey)
    }

    /// Register `pattern` in this context with replacement text or a callback.
    pub fn hotstring(
        &self,
        pattern: &str,
        replacement: impl Into<Replacement>,
        options: &HotstringOptions,
    ) -> Result<Hotstring> {
        let hotstring = Hotstring::new(pattern, self.clone())?;
        hotstring.update(Some(replacement.into()), options)?;
        Ok(hotstring)
    }

    /// Remap `origin` to `destination` within this context.
    pub fn remap_key(&self, origin: &str, destination: &str) -> Result<RemappedKey> {
        remap::remap_key(self, origin, destination)
    }
}

impl PartialEq for TriggerContext {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for TriggerContext {}

impl Hash for TriggerContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl fmt::Debug for TriggerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerContext")
            .field("token", &self.token)
            .field("global", &self.is_global())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{DispatchCall, DryRunDispatcher};
    use std::collections::HashSet;

    fn dry_run() -> Arc<DryRunDispatcher> {
        Arc::new(DryRunDispatcher::new())
    }

    #[test]
    fn test_equivalent_predicates_are_distinct_contexts() {
        let dispatcher = dry_run();
        let a = TriggerContext::when(dispatcher.clone(), || true);
        let b = TriggerContext::when(dispatcher.clone(), || true);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_global_contexts_share_identity() {
        let dispatcher = dry_run();
        let a = TriggerContext::global(dispatcher.clone());
        let b = TriggerContext::global(dispatcher);
        assert_eq!(a, b);
        assert!(a.is_global());
        assert_eq!(a.token(), ContextToken::GLOBAL);
    }

    #[test]
    fn test_zero_arg_predicate_ignores_engine_arguments() {
        let dispatcher = dry_run();
        let context = TriggerContext::when(dispatcher.clone(), || false);
        context.enter().unwrap();
        assert_eq!(
            dispatcher.evaluate_active_scope(&["F1".to_string(), "x".to_string()]),
            Some(false)
        );
        context.exit().unwrap();
    }

    #[test]
    fn test_arg_predicate_receives_arguments() {
        let dispatcher = dry_run();
        let context =
            TriggerContext::when_args(dispatcher.clone(), |args| args.first().map(String::as_str) == Some("F1"));
        context.enter().unwrap();
        assert_eq!(dispatcher.evaluate_active_scope(&["F1".to_string()]), Some(true));
        assert_eq!(dispatcher.evaluate_active_scope(&["F2".to_string()]), Some(false));
        context.exit().unwrap();
        assert_eq!(dispatcher.scope_depth(), 0);
    }

    #[test]
    fn test_predicate_context_scopes_each_registration() {
        let dispatcher = dry_run();
        let context = TriggerContext::when(dispatcher.clone(), || true);
        context.hotkey("F5", || {}, &HotkeyOptions::default()).unwrap();
        context
            .hotstring("sig", "Best regards", &HotstringOptions::default())
            .unwrap();

        let token = context.token();
        assert_eq!(
            dispatcher.calls(),
            vec![
                DispatchCall::EnterScope(token),
                DispatchCall::RegisterHotkey {
                    token,
                    key_name: "F5".to_string(),
                    options: String::new(),
                    has_callback: true,
                },
                DispatchCall::ExitScope,
                DispatchCall::EnterScope(token),
                DispatchCall::RegisterHotstring {
                    definition: "::sig".to_string(),
                    replacement: "Best regards".to_string(),
                    has_callback: false,
                },
                DispatchCall::ExitScope,
            ]
        );
        assert_eq!(dispatcher.hotstring("sig").unwrap().context, token);
    }
}
