//! Key remapping built from two wildcard hotkeys
//!
//! `origin -> destination` registers `*<origin>` (press) and `*<origin> Up`
//! (release). Their callbacks send `{Blind}{<destination> DownR}` and
//! `{Blind}{<destination> Up}`; blind mode leaves held modifiers alone.
//!
//! The pair is not atomic. If the release edge fails to register, the press
//! edge is disabled again (best effort, since the engine cannot unregister)
//! and the error names the failing edge and whether the rollback worked.
//! An edge that reached the engine but whose scope exit failed is disabled
//! as well.
//!
//! Rollback does not know what was live before. Re-applying an existing
//! remap whose release edge then fails leaves the previously working press
//! edge disabled; call [`RemappedKey::enable`] on the old handle to restore it.

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::context::TriggerContext;
use crate::dispatcher::{Callback, Dispatcher, TriggerAction};
use crate::error::{Error, Result, ResultExt};
use crate::options::HotkeyOptions;
use crate::trigger::{Hotkey, Trigger};

/// Origins that only matter while held; remapping them is not supported.
const MODIFIER_KEYS: &[&str] = &[
    "ctrl", "lctrl", "rctrl", "control", "lcontrol", "rcontrol", "shift", "lshift", "rshift",
    "alt", "lalt", "ralt", "lwin", "rwin",
];

/// Mouse destinations; keyboard-to-mouse remapping is not supported.
const MOUSE_KEYS: &[&str] = &[
    "lbutton",
    "rbutton",
    "mbutton",
    "xbutton1",
    "xbutton2",
    "wheelup",
    "wheeldown",
    "wheelleft",
    "wheelright",
];

/// Which member of a remapped key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemapEdge {
    Down,
    Up,
}

impl fmt::Display for RemapEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => f.write_str("down"),
            Self::Up => f.write_str("up"),
        }
    }
}

/// A logical remapped key: press and release hotkeys handled as one.
#[derive(Clone, Debug)]
pub struct RemappedKey {
    down: Hotkey,
    up: Hotkey,
}

impl RemappedKey {
    pub fn down_edge(&self) -> &Hotkey {
        &self.down
    }

    pub fn up_edge(&self) -> &Hotkey {
        &self.up
    }

    pub fn enable(&self) -> Result<()> {
        self.set_state(TriggerAction::On)
    }

    pub fn disable(&self) -> Result<()> {
        self.set_state(TriggerAction::Off)
    }

    pub fn toggle(&self) -> Result<()> {
        self.set_state(TriggerAction::Toggle)
    }

    /// Down edge first, then up edge. Stops at the first failure.
    fn set_state(&self, action: TriggerAction) -> Result<()> {
        self.down
            .set_state(action)
            .map_err(|source| edge_error(RemapEdge::Down, false, source))?;
        self.up
            .set_state(action)
            .map_err(|source| edge_error(RemapEdge::Up, false, source))
    }
}

fn edge_error(edge: RemapEdge, rolled_back: bool, source: Error) -> Error {
    Error::Remap {
        edge,
        rolled_back,
        source: Box::new(source),
    }
}

fn send_callback(dispatcher: Arc<dyn Dispatcher>, keys: String) -> Callback {
    Arc::new(move || {
        dispatcher.send_keys(&keys).log_err();
    })
}

fn validate(origin: &str, destination: &str) -> Result<()> {
    if origin.is_empty() || destination.is_empty() {
        return Err(Error::invalid_argument(
            "origin and destination keys must not be empty",
        ));
    }
    if MODIFIER_KEYS.contains(&origin.to_ascii_lowercase().as_str()) {
        return Err(Error::Unsupported(format!(
            "remapping modifier key '{}' as origin",
            origin
        )));
    }
    if MOUSE_KEYS.contains(&destination.to_ascii_lowercase().as_str()) {
        return Err(Error::Unsupported(format!(
            "remapping a key to mouse button '{}'",
            destination
        )));
    }
    Ok(())
}

/// Remap `origin` to `destination` under `context`.
pub fn remap_key(context: &TriggerContext, origin: &str, destination: &str) -> Result<RemappedKey> {
    validate(origin, destination)?;

    let down = Hotkey::new(format!("*{}", origin), context.clone())?;
    let up = Hotkey::new(format!("*{} Up", origin), context.clone())?;
    let dispatcher = context.dispatcher().clone();
    let options = HotkeyOptions::default();

    if let Err(source) = down.update(
        Some(send_callback(
            dispatcher.clone(),
            format!("{{Blind}}{{{} DownR}}", destination),
        )),
        &options,
    ) {
        let rolled_back = down.is_registered() && down.disable().warn_on_err().is_some();
        return Err(edge_error(RemapEdge::Down, rolled_back, source));
    }

    if let Err(source) = up.update(
        Some(send_callback(
            dispatcher,
            format!("{{Blind}}{{{} Up}}", destination),
        )),
        &options,
    ) {
        let mut rolled_back = down.disable().warn_on_err().is_some();
        if up.is_registered() {
            rolled_back &= up.disable().warn_on_err().is_some();
        }
        warn!(
            origin = origin,
            destination = destination,
            rolled_back = rolled_back,
            "Remap release edge failed to register"
        );
        return Err(edge_error(RemapEdge::Up, rolled_back, source));
    }

    info!(
        event_type = "remap_registered",
        origin = origin,
        destination = destination,
        context = %context.token(),
        "Remapped '{}' to '{}'",
        origin,
        destination
    );
    Ok(RemappedKey { down, up })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{ContextToken, DispatchCall, DryRunDispatcher};

    fn global() -> (Arc<DryRunDispatcher>, TriggerContext) {
        let dispatcher = Arc::new(DryRunDispatcher::new());
        let context = TriggerContext::global(dispatcher.clone());
        (dispatcher, context)
    }

    #[test]
    fn test_remap_registers_both_wildcard_edges() {
        let (dispatcher, context) = global();
        let remapped = remap_key(&context, "CapsLock", "Esc").unwrap();

        assert_eq!(remapped.down_edge().key_name(), "*CapsLock");
        assert_eq!(remapped.up_edge().key_name(), "*CapsLock Up");
        assert!(dispatcher.hotkey(ContextToken::GLOBAL, "*CapsLock").is_some());
        assert!(dispatcher.hotkey(ContextToken::GLOBAL, "*CapsLock Up").is_some());
    }

    #[test]
    fn test_remap_callbacks_send_blind_keys() {
        let (dispatcher, context) = global();
        remap_key(&context, "a", "b").unwrap();

        dispatcher.fire_hotkey(ContextToken::GLOBAL, "*a").unwrap();
        dispatcher.fire_hotkey(ContextToken::GLOBAL, "*a Up").unwrap();
        assert_eq!(
            dispatcher.sent_keys(),
            vec!["{Blind}{b DownR}".to_string(), "{Blind}{b Up}".to_string()]
        );
    }

    #[test]
    fn test_fan_out_order_is_down_then_up() {
        let (dispatcher, context) = global();
        let remapped = remap_key(&context, "F1", "F2").unwrap();

        for action in [TriggerAction::On, TriggerAction::Off, TriggerAction::Toggle] {
            dispatcher.clear_calls();
            match action {
                TriggerAction::On => remapped.enable().unwrap(),
                TriggerAction::Off => remapped.disable().unwrap(),
                TriggerAction::Toggle => remapped.toggle().unwrap(),
            }
            assert_eq!(
                dispatcher.calls(),
                vec![
                    DispatchCall::SetHotkeyState {
                        token: ContextToken::GLOBAL,
                        key_name: "*F1".to_string(),
                        action,
                    },
                    DispatchCall::SetHotkeyState {
                        token: ContextToken::GLOBAL,
                        key_name: "*F1 Up".to_string(),
                        action,
                    },
                ]
            );
        }
    }

    #[test]
    fn test_up_edge_failure_rolls_back_down_edge() {
        let (dispatcher, context) = global();
        dispatcher.reject("*x Up");

        let err = remap_key(&context, "x", "y").unwrap_err();
        match err {
            Error::Remap {
                edge, rolled_back, ..
            } => {
                assert_eq!(edge, RemapEdge::Up);
                assert!(rolled_back);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let down = dispatcher.hotkey(ContextToken::GLOBAL, "*x").unwrap();
        assert!(!down.enabled);
    }

    #[test]
    fn test_up_edge_scope_exit_failure_disables_both_edges() {
        let dispatcher = Arc::new(DryRunDispatcher::new());
        let context = TriggerContext::when(dispatcher.clone(), || true);
        dispatcher.fail_scope_exit_after("*m Up");

        let err = context.remap_key("m", "n").unwrap_err();
        match err {
            Error::Remap {
                edge, rolled_back, ..
            } => {
                assert_eq!(edge, RemapEdge::Up);
                assert!(rolled_back);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // the release edge reached the engine, so it is switched off too
        assert!(!dispatcher.hotkey(context.token(), "*m").unwrap().enabled);
        assert!(!dispatcher.hotkey(context.token(), "*m Up").unwrap().enabled);
    }

    #[test]
    fn test_down_edge_scope_exit_failure_disables_it() {
        let dispatcher = Arc::new(DryRunDispatcher::new());
        let context = TriggerContext::when(dispatcher.clone(), || true);
        dispatcher.fail_scope_exit_after("*j");

        let err = context.remap_key("j", "k").unwrap_err();
        assert!(matches!(
            err,
            Error::Remap { edge: RemapEdge::Down, rolled_back: true, .. }
        ));
        assert!(!dispatcher.hotkey(context.token(), "*j").unwrap().enabled);
        assert!(dispatcher.hotkey(context.token(), "*j Up").is_none());
    }

    #[test]
    fn test_down_edge_failure_registers_nothing_else() {
        let (dispatcher, context) = global();
        dispatcher.reject("*q");

        let err = remap_key(&context, "q", "w").unwrap_err();
        assert!(matches!(err, Error::Remap { edge: RemapEdge::Down, .. }));
        assert!(dispatcher.hotkey(ContextToken::GLOBAL, "*q Up").is_none());
    }

    #[test]
    fn test_fan_out_reports_failing_member() {
        let (dispatcher, context) = global();
        let remapped = remap_key(&context, "z", "x").unwrap();
        dispatcher.reject("*z Up");

        let err = remapped.disable().unwrap_err();
        assert!(matches!(err, Error::Remap { edge: RemapEdge::Up, rolled_back: false, .. }));
        // first member already applied: the composite is partially toggled
        assert!(!dispatcher.hotkey(ContextToken::GLOBAL, "*z").unwrap().enabled);
    }

    #[test]
    fn test_unsupported_variants_fail_before_dispatch() {
        let (dispatcher, context) = global();
        assert!(matches!(
            remap_key(&context, "LCtrl", "a"),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            remap_key(&context, "a", "RButton"),
            Err(Error::Unsupported(_))
        ));
        assert!(remap_key(&context, "", "a").unwrap_err().is_invalid_argument());
        assert_eq!(dispatcher.call_count(), 0);
    }

    #[test]
    fn test_remap_in_predicate_context() {
        let dispatcher = Arc::new(DryRunDispatcher::new());
        let context = TriggerContext::when(dispatcher.clone(), || true);
        let remapped = context.remap_key("Tab", "Space").unwrap();
        assert_eq!(remapped.down_edge().context(), &context);
        assert!(dispatcher.hotkey(context.token(), "*Tab Up").is_some());
        assert_eq!(dispatcher.scope_depth(), 0);
    }
}
