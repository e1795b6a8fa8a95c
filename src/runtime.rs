//! Process-wide entry points
//!
//! The host installs its engine once with [`init_dispatcher`]; the free
//! functions here then work on the global context of that engine.

use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::context::TriggerContext;
use crate::dispatcher::{Dispatcher, Predicate};
use crate::error::{Error, Result};
use crate::keys;
use crate::options::{HotkeyOptions, HotstringOptions};
use crate::remap::RemappedKey;
use crate::trigger::{Hotkey, Hotstring, Replacement};

/// Installed on first `init_dispatcher`, never replaced.
static DISPATCHER: OnceLock<Arc<dyn Dispatcher>> = OnceLock::new();

/// Install the process-wide dispatcher.
/// Returns an error if one is already installed.
pub fn init_dispatcher(dispatcher: Arc<dyn Dispatcher>) -> Result<()> {
    DISPATCHER
        .set(dispatcher)
        .map_err(|_| Error::AlreadyInitialized)?;
    info!(event_type = "app_lifecycle", action = "dispatcher_installed", "Dispatcher installed");
    Ok(())
}

pub fn dispatcher() -> Result<Arc<dyn Dispatcher>> {
    DISPATCHER.get().cloned().ok_or(Error::NotInitialized)
}

/// The always-active context of the installed dispatcher
pub fn default_context() -> Result<TriggerContext> {
    Ok(TriggerContext::global(dispatcher()?))
}

/// A new context active while `predicate` returns `true`
pub fn hotkey_context<F>(predicate: F) -> Result<TriggerContext>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Ok(TriggerContext::with_predicate(
        dispatcher()?,
        Predicate::new(predicate),
    ))
}

pub fn hotkey<F>(key_name: &str, callback: F, options: &HotkeyOptions) -> Result<Hotkey>
where
    F: Fn() + Send + Sync + 'static,
{
    default_context()?.hotkey(key_name, callback, options)
}

pub fn hotstring(
    pattern: &str,
    replacement: impl Into<Replacement>,
    options: &HotstringOptions,
) -> Result<Hotstring> {
    default_context()?.hotstring(pattern, replacement, options)
}

pub fn remap_key(origin: &str, destination: &str) -> Result<RemappedKey> {
    default_context()?.remap_key(origin, destination)
}

pub fn send(keys: &str) -> Result<()> {
    keys::send(dispatcher()?.as_ref(), keys)
}

pub fn get_key_state(key_name: &str) -> Result<bool> {
    keys::get_key_state(dispatcher()?.as_ref(), key_name)
}

pub fn reset_hotstring() -> Result<()> {
    keys::reset_hotstring(dispatcher()?.as_ref())
}
