//! In-memory trigger engine.
//!
//! Keeps a live trigger table and an ordered log of every call it receives.
//! No input is intercepted; callbacks only run through [`DryRunDispatcher::fire_hotkey`]
//! and [`DryRunDispatcher::fire_hotstring`].

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::thread;
use std::time::Duration;
use tracing::debug;

use super::{Callback, ContextToken, Dispatcher, KeyStateMode, Predicate, TriggerAction};
use crate::error::{Error, Result};
use crate::keys::{LockKey, LockState};

/// One call received by the dry-run engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchCall {
    EnterScope(ContextToken),
    ExitScope,
    RegisterHotkey {
        token: ContextToken,
        key_name: String,
        options: String,
        has_callback: bool,
    },
    SetHotkeyState {
        token: ContextToken,
        key_name: String,
        action: TriggerAction,
    },
    RegisterHotstring {
        definition: String,
        replacement: String,
        has_callback: bool,
    },
    SetHotstringState {
        pattern: String,
        action: TriggerAction,
    },
    ResetHotstringRecognizer,
    SendKeys(String),
    QueryKeyState {
        key_name: String,
        mode: KeyStateMode,
    },
    KeyWait {
        key_name: String,
        options: String,
    },
    SetLockKeyState {
        key: LockKey,
        state: LockState,
    },
    SetSendLevel(u8),
    SetSendMode(String),
}

/// Current view of one registered trigger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerSnapshot {
    pub context: ContextToken,
    /// Option strings in registration order
    pub options: Vec<String>,
    /// Hotstring replacement text; empty for hotkeys
    pub replacement: String,
    pub enabled: bool,
    pub has_callback: bool,
}

struct Entry {
    snapshot: TriggerSnapshot,
    callback: Option<Callback>,
}

impl Entry {
    fn new(context: ContextToken) -> Self {
        Self {
            snapshot: TriggerSnapshot {
                context,
                options: Vec::new(),
                replacement: String::new(),
                enabled: true,
                has_callback: false,
            },
            callback: None,
        }
    }

    fn apply(&mut self, action: TriggerAction) {
        self.snapshot.enabled = match action {
            TriggerAction::On => true,
            TriggerAction::Off => false,
            TriggerAction::Toggle => !self.snapshot.enabled,
        };
    }

    fn set_callback(&mut self, callback: Option<Callback>) {
        if let Some(callback) = callback {
            self.callback = Some(callback);
            self.snapshot.has_callback = true;
        }
    }
}

#[derive(Default)]
struct DryRunState {
    calls: Vec<DispatchCall>,
    scopes: Vec<(ContextToken, Predicate)>,
    hotkeys: HashMap<(ContextToken, String), Entry>,
    hotstrings: HashMap<String, Entry>,
    key_states: HashMap<(String, KeyStateMode), bool>,
    rejected: HashSet<String>,
    key_wait_times_out: bool,
    fail_scope_enter: bool,
    fail_exit_after: HashSet<String>,
    last_registered: Option<String>,
    register_delay: Option<Duration>,
}

impl DryRunState {
    fn record(&mut self, call: DispatchCall) {
        debug!(event_type = "dispatch", call = ?call, "Dry-run dispatcher call");
        self.calls.push(call);
    }

    fn active_token(&self) -> ContextToken {
        self.scopes
            .last()
            .map(|(token, _)| *token)
            .unwrap_or(ContextToken::GLOBAL)
    }

    fn check_rejected(&self, operation: &'static str, pattern: &str) -> Result<()> {
        if self.rejected.contains(pattern) {
            return Err(Error::dispatcher(
                operation,
                format!("'{}' was rejected by the engine", pattern),
            ));
        }
        Ok(())
    }
}

/// Headless [`Dispatcher`] with an inspectable trigger table
#[derive(Default)]
pub struct DryRunDispatcher {
    state: Mutex<DryRunState>,
}

impl DryRunDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Keys sent through `send_keys`, in order.
    pub fn sent_keys(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                DispatchCall::SendKeys(keys) => Some(keys.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn scope_depth(&self) -> usize {
        self.state.lock().scopes.len()
    }

    pub fn hotkey(&self, token: ContextToken, key_name: &str) -> Option<TriggerSnapshot> {
        self.state
            .lock()
            .hotkeys
            .get(&(token, key_name.to_string()))
            .map(|entry| entry.snapshot.clone())
    }

    pub fn hotstring(&self, pattern: &str) -> Option<TriggerSnapshot> {
        self.state
            .lock()
            .hotstrings
            .get(pattern)
            .map(|entry| entry.snapshot.clone())
    }

    /// Make every later registration or state change of `pattern` fail.
    pub fn reject(&self, pattern: impl Into<String>) {
        self.state.lock().rejected.insert(pattern.into());
    }

    /// Set the value returned by `query_key_state`; `None` makes it indeterminate.
    pub fn set_key_state(&self, key_name: &str, mode: KeyStateMode, value: Option<bool>) {
        let mut state = self.state.lock();
        let key = (key_name.to_ascii_lowercase(), mode);
        match value {
            Some(value) => {
                state.key_states.insert(key, value);
            }
            None => {
                state.key_states.remove(&key);
            }
        }
    }

    pub fn set_key_wait_times_out(&self, times_out: bool) {
        self.state.lock().key_wait_times_out = times_out;
    }

    /// Make `enter_context_scope` fail without pushing a scope.
    pub fn fail_scope_enter(&self, fail: bool) {
        self.state.lock().fail_scope_enter = fail;
    }

    /// Make `exit_context_scope` fail right after `pattern` is registered.
    /// The registration is kept and the scope stays on the stack.
    pub fn fail_scope_exit_after(&self, pattern: impl Into<String>) {
        self.state.lock().fail_exit_after.insert(pattern.into());
    }

    /// Sleep before applying each hotkey registration, with the table unlocked.
    pub fn set_register_delay(&self, delay: Option<Duration>) {
        self.state.lock().register_delay = delay;
    }

    /// Evaluate the innermost active scope's predicate, if any.
    pub fn evaluate_active_scope(&self, args: &[String]) -> Option<bool> {
        let predicate = self.state.lock().scopes.last().map(|(_, p)| p.clone());
        predicate.map(|p| p.evaluate(args))
    }

    /// Run a hotkey's callback as the engine would when it fires.
    ///
    /// The callback runs without the table lock held, so it may call back
    /// into the dispatcher.
    pub fn fire_hotkey(&self, token: ContextToken, key_name: &str) -> Result<()> {
        let callback = {
            let state = self.state.lock();
            let entry = state
                .hotkeys
                .get(&(token, key_name.to_string()))
                .ok_or_else(|| Error::dispatcher("fire hotkey", format!("no hotkey '{}'", key_name)))?;
            if !entry.snapshot.enabled {
                return Err(Error::dispatcher(
                    "fire hotkey",
                    format!("hotkey '{}' is disabled", key_name),
                ));
            }
            entry.callback.clone()
        };
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }

    /// Fire a hotstring: run its callback or send its replacement text.
    pub fn fire_hotstring(&self, pattern: &str) -> Result<()> {
        let (callback, replacement) = {
            let state = self.state.lock();
            let entry = state
                .hotstrings
                .get(pattern)
                .ok_or_else(|| Error::dispatcher("fire hotstring", format!("no hotstring '{}'", pattern)))?;
            if !entry.snapshot.enabled {
                return Err(Error::dispatcher(
                    "fire hotstring",
                    format!("hotstring '{}' is disabled", pattern),
                ));
            }
            (entry.callback.clone(), entry.snapshot.replacement.clone())
        };
        match callback {
            Some(callback) => {
                callback();
                Ok(())
            }
            None => self.send_keys(&replacement),
        }
    }
}

/// Split `:<options>:<pattern>` into its parts.
fn split_definition(definition: &str) -> Option<(&str, &str)> {
    let rest = definition.strip_prefix(':')?;
    rest.split_once(':')
}

impl Dispatcher for DryRunDispatcher {
    fn enter_context_scope(&self, token: ContextToken, predicate: &Predicate) -> Result<()> {
        let mut state = self.state.lock();
        state.record(DispatchCall::EnterScope(token));
        if state.fail_scope_enter {
            return Err(Error::dispatcher("enter context scope", "scope refused"));
        }
        state.scopes.push((token, predicate.clone()));
        Ok(())
    }

    fn exit_context_scope(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.record(DispatchCall::ExitScope);
        let last = state.last_registered.take();
        let stuck = last.is_some_and(|pattern| state.fail_exit_after.contains(&pattern));
        if stuck {
            return Err(Error::dispatcher("exit context scope", "scope stuck"));
        }
        state
            .scopes
            .pop()
            .map(|_| ())
            .ok_or_else(|| Error::dispatcher("exit context scope", "no active scope"))
    }

    fn register_hotkey(
        &self,
        token: ContextToken,
        key_name: &str,
        callback: Option<Callback>,
        options: &str,
    ) -> Result<()> {
        let delay = self.state.lock().register_delay;
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        let mut state = self.state.lock();
        state.record(DispatchCall::RegisterHotkey {
            token,
            key_name: key_name.to_string(),
            options: options.to_string(),
            has_callback: callback.is_some(),
        });
        state.check_rejected("register hotkey", key_name)?;

        let active = state.active_token();
        if active != token {
            return Err(Error::dispatcher(
                "register hotkey",
                format!("registration for context {} made under context {}", token, active),
            ));
        }

        let key = (token, key_name.to_string());
        if !state.hotkeys.contains_key(&key) && callback.is_none() {
            return Err(Error::dispatcher(
                "register hotkey",
                format!("nonexistent hotkey '{}' needs a callback", key_name),
            ));
        }
        let entry = state.hotkeys.entry(key).or_insert_with(|| Entry::new(token));
        entry.set_callback(callback);
        entry.snapshot.options.push(options.to_string());
        state.last_registered = Some(key_name.to_string());
        Ok(())
    }

    fn set_hotkey_state(
        &self,
        token: ContextToken,
        key_name: &str,
        action: TriggerAction,
    ) -> Result<()> {
        let mut state = self.state.lock();
        state.record(DispatchCall::SetHotkeyState {
            token,
            key_name: key_name.to_string(),
            action,
        });
        state.check_rejected("set hotkey state", key_name)?;
        let entry = state
            .hotkeys
            .get_mut(&(token, key_name.to_string()))
            .ok_or_else(|| {
                Error::dispatcher("set hotkey state", format!("nonexistent hotkey '{}'", key_name))
            })?;
        entry.apply(action);
        Ok(())
    }

    fn register_hotstring(
        &self,
        definition: &str,
        replacement: &str,
        callback: Option<Callback>,
    ) -> Result<()> {
        let mut state = self.state.lock();
        state.record(DispatchCall::RegisterHotstring {
            definition: definition.to_string(),
            replacement: replacement.to_string(),
            has_callback: callback.is_some(),
        });
        let (options, pattern) = split_definition(definition).ok_or_else(|| {
            Error::dispatcher(
                "register hotstring",
                format!("malformed definition '{}'", definition),
            )
        })?;
        if pattern.is_empty() {
            return Err(Error::dispatcher("register hotstring", "empty hotstring"));
        }
        state.check_rejected("register hotstring", pattern)?;

        let active = state.active_token();
        let entry = state
            .hotstrings
            .entry(pattern.to_string())
            .or_insert_with(|| Entry::new(active));
        entry.snapshot.context = active;
        entry.snapshot.options.push(options.to_string());
        if callback.is_some() {
            entry.snapshot.replacement.clear();
        } else if !replacement.is_empty() {
            entry.snapshot.replacement = replacement.to_string();
        }
        entry.set_callback(callback);
        state.last_registered = Some(pattern.to_string());
        Ok(())
    }

    fn set_hotstring_state(&self, pattern: &str, action: TriggerAction) -> Result<()> {
        let mut state = self.state.lock();
        state.record(DispatchCall::SetHotstringState {
            pattern: pattern.to_string(),
            action,
        });
        state.check_rejected("set hotstring state", pattern)?;
        let entry = state.hotstrings.get_mut(pattern).ok_or_else(|| {
            Error::dispatcher(
                "set hotstring state",
                format!("nonexistent hotstring '{}'", pattern),
            )
        })?;
        entry.apply(action);
        Ok(())
    }

    fn reset_hotstring_recognizer(&self) -> Result<()> {
        self.state
            .lock()
            .record(DispatchCall::ResetHotstringRecognizer);
        Ok(())
    }

    fn send_keys(&self, keys: &str) -> Result<()> {
        self.state
            .lock()
            .record(DispatchCall::SendKeys(keys.to_string()));
        Ok(())
    }

    fn query_key_state(&self, key_name: &str, mode: KeyStateMode) -> Result<Option<bool>> {
        let mut state = self.state.lock();
        state.record(DispatchCall::QueryKeyState {
            key_name: key_name.to_string(),
            mode,
        });
        Ok(state
            .key_states
            .get(&(key_name.to_ascii_lowercase(), mode))
            .copied())
    }

    fn key_wait(&self, key_name: &str, options: &str) -> Result<bool> {
        let mut state = self.state.lock();
        state.record(DispatchCall::KeyWait {
            key_name: key_name.to_string(),
            options: options.to_string(),
        });
        Ok(state.key_wait_times_out)
    }

    fn set_lock_key_state(&self, key: LockKey, lock_state: LockState) -> Result<()> {
        let mut state = self.state.lock();
        state.record(DispatchCall::SetLockKeyState {
            key,
            state: lock_state,
        });
        let toggled = matches!(lock_state, LockState::On | LockState::AlwaysOn);
        state
            .key_states
            .insert((key.as_str().to_ascii_lowercase(), KeyStateMode::Toggled), toggled);
        Ok(())
    }

    fn set_send_level(&self, level: u8) -> Result<()> {
        self.state.lock().record(DispatchCall::SetSendLevel(level));
        Ok(())
    }

    fn set_send_mode(&self, mode: &str) -> Result<()> {
        self.state
            .lock()
            .record(DispatchCall::SetSendMode(mode.to_string()));
        Ok(())
    }
}
