//! Registration of configured bindings

use anyhow::Context;
use tracing::{info, instrument};

use super::types::Config;
use crate::context::TriggerContext;
use crate::error::ResultExt;
use crate::keys;
use crate::options::SendMode;
use crate::remap::RemappedKey;
use crate::trigger::{Hotkey, Hotstring};

/// Handles for everything `Config::apply` registered
#[derive(Debug, Default)]
pub struct AppliedBindings {
    pub hotkeys: Vec<Hotkey>,
    pub hotstrings: Vec<Hotstring>,
    pub remaps: Vec<RemappedKey>,
}

impl AppliedBindings {
    pub fn len(&self) -> usize {
        self.hotkeys.len() + self.hotstrings.len() + self.remaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Config {
    /// Register every configured binding under `context`.
    ///
    /// Stops at the first failure; bindings registered before it stay live.
    #[instrument(skip_all, fields(context = %context.token()))]
    pub fn apply(&self, context: &TriggerContext) -> anyhow::Result<AppliedBindings> {
        let dispatcher = context.dispatcher();

        let send_mode = self
            .send_mode
            .as_deref()
            .map(str::parse::<SendMode>)
            .transpose()
            .context("Invalid sendMode")?;

        if let Some(level) = self.send_level {
            keys::send_level(dispatcher.as_ref(), level).context("Invalid sendLevel")?;
        }
        if let Some(mode) = send_mode {
            keys::send_mode(dispatcher.as_ref(), mode).context("Failed to set sendMode")?;
        }

        let mut applied = AppliedBindings::default();

        for binding in &self.hotkeys {
            let sender = dispatcher.clone();
            let to_send = binding.send.clone();
            let hotkey = context
                .hotkey(
                    &binding.key,
                    move || {
                        sender.send_keys(&to_send).log_err();
                    },
                    &binding.options,
                )
                .with_context(|| format!("Failed to register hotkey '{}'", binding.key))?;
            applied.hotkeys.push(hotkey);
        }

        for binding in &self.hotstrings {
            let hotstring = context
                .hotstring(&binding.pattern, binding.replacement.as_str(), &binding.options)
                .with_context(|| format!("Failed to register hotstring '{}'", binding.pattern))?;
            applied.hotstrings.push(hotstring);
        }

        for binding in &self.remaps {
            let remapped = context
                .remap_key(&binding.origin, &binding.destination)
                .with_context(|| {
                    format!(
                        "Failed to remap '{}' to '{}'",
                        binding.origin, binding.destination
                    )
                })?;
            applied.remaps.push(remapped);
        }

        info!(count = applied.len(), "Applied configured bindings");
        Ok(applied)
    }
}
