//! Key state queries and key sending
//!
//! Thin wrappers over the [`Dispatcher`] that validate arguments before any
//! engine call and turn indeterminate answers into errors.

use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::dispatcher::{Dispatcher, KeyStateMode};
use crate::error::{Error, Result};
use crate::options::{encode_key_wait_options, SendMode, MAX_INPUT_LEVEL};

/// Keys whose toggle state can be queried
const TOGGLE_KEYS: &[&str] = &["capslock", "numlock", "scrolllock", "insert", "ins"];

/// Keys with a settable lock state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockKey {
    CapsLock,
    NumLock,
    ScrollLock,
}

impl LockKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapsLock => "CapsLock",
            Self::NumLock => "NumLock",
            Self::ScrollLock => "ScrollLock",
        }
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock key state. The `Always*` variants also prevent the user from
/// changing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockState {
    On,
    Off,
    AlwaysOn,
    AlwaysOff,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
            Self::AlwaysOn => "AlwaysOn",
            Self::AlwaysOff => "AlwaysOff",
        }
    }
}

impl From<bool> for LockState {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl FromStr for LockState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "always_on" | "alwayson" => Ok(Self::AlwaysOn),
            "always_off" | "alwaysoff" => Ok(Self::AlwaysOff),
            "on" | "true" => Ok(Self::On),
            "off" | "false" => Ok(Self::Off),
            _ => Err(Error::invalid_argument(format!(
                "lock state must be on, off, always_on or always_off (got '{}')",
                s
            ))),
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// KEY STATE
// ============================================

fn query(dispatcher: &dyn Dispatcher, key_name: &str, mode: KeyStateMode) -> Result<bool> {
    if key_name.is_empty() {
        return Err(Error::invalid_argument("key name must not be empty"));
    }
    let state = dispatcher.query_key_state(key_name, mode)?;
    debug!(key = key_name, mode = ?mode, state = ?state, "Queried key state");
    state.ok_or_else(|| Error::IndeterminateKeyState {
        key: key_name.to_string(),
    })
}

/// Logical state of a key: `true` if down.
pub fn get_key_state(dispatcher: &dyn Dispatcher, key_name: &str) -> Result<bool> {
    query(dispatcher, key_name, KeyStateMode::Logical)
}

/// Physical state of a key, ignoring synthetic input.
pub fn get_physical_key_state(dispatcher: &dyn Dispatcher, key_name: &str) -> Result<bool> {
    query(dispatcher, key_name, KeyStateMode::Physical)
}

/// Toggle state of CapsLock, NumLock, ScrollLock or Insert.
pub fn is_key_toggled(dispatcher: &dyn Dispatcher, key_name: &str) -> Result<bool> {
    if !TOGGLE_KEYS.contains(&key_name.to_ascii_lowercase().as_str()) {
        return Err(Error::invalid_argument(
            "key_name must be one of CapsLock, NumLock, ScrollLock, or Insert",
        ));
    }
    query(dispatcher, key_name, KeyStateMode::Toggled)
}

pub fn set_caps_lock_state(dispatcher: &dyn Dispatcher, state: LockState) -> Result<()> {
    dispatcher.set_lock_key_state(LockKey::CapsLock, state)
}

pub fn set_num_lock_state(dispatcher: &dyn Dispatcher, state: LockState) -> Result<()> {
    dispatcher.set_lock_key_state(LockKey::NumLock, state)
}

pub fn set_scroll_lock_state(dispatcher: &dyn Dispatcher, state: LockState) -> Result<()> {
    dispatcher.set_lock_key_state(LockKey::ScrollLock, state)
}

// ============================================
// KEY WAIT
// ============================================

/// Wait for the key to be pressed. Returns `false` if `timeout` (seconds) elapsed.
pub fn key_wait_pressed(
    dispatcher: &dyn Dispatcher,
    key_name: &str,
    logical_state: bool,
    timeout: Option<f64>,
) -> Result<bool> {
    key_wait(dispatcher, key_name, true, logical_state, timeout)
}

/// Wait for the key to be released. Returns `false` if `timeout` (seconds) elapsed.
pub fn key_wait_released(
    dispatcher: &dyn Dispatcher,
    key_name: &str,
    logical_state: bool,
    timeout: Option<f64>,
) -> Result<bool> {
    key_wait(dispatcher, key_name, false, logical_state, timeout)
}

#[instrument(skip(dispatcher))]
fn key_wait(
    dispatcher: &dyn Dispatcher,
    key_name: &str,
    down: bool,
    logical_state: bool,
    timeout: Option<f64>,
) -> Result<bool> {
    if key_name.is_empty() {
        return Err(Error::invalid_argument("key name must not be empty"));
    }
    if matches!(timeout, Some(t) if t.is_nan() || t < 0.0) {
        return Err(Error::invalid_argument("timeout must be a non-negative number"));
    }
    let options = encode_key_wait_options(down, logical_state, timeout);
    let timed_out = dispatcher.key_wait(key_name, &options)?;
    Ok(!timed_out)
}

// ============================================
// SENDING
// ============================================

pub fn send(dispatcher: &dyn Dispatcher, keys: &str) -> Result<()> {
    dispatcher.send_keys(keys)
}

/// Level assigned to synthesized input (0-100).
pub fn send_level(dispatcher: &dyn Dispatcher, level: u8) -> Result<()> {
    if level > MAX_INPUT_LEVEL {
        return Err(Error::invalid_argument(format!(
            "level must be between 0 and {}",
            MAX_INPUT_LEVEL
        )));
    }
    dispatcher.set_send_level(level)
}

pub fn send_mode(dispatcher: &dyn Dispatcher, mode: SendMode) -> Result<()> {
    dispatcher.set_send_mode(mode.as_str())
}

/// Clear the hotstring recognizer's buffer of typed characters.
pub fn reset_hotstring(dispatcher: &dyn Dispatcher) -> Result<()> {
    dispatcher.reset_hotstring_recognizer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{DispatchCall, DryRunDispatcher};

    #[test]
    fn test_toggle_query_rejects_other_keys_before_dispatch() {
        let dispatcher = DryRunDispatcher::new();
        let err = is_key_toggled(&dispatcher, "x").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(dispatcher.call_count(), 0);
    }

    #[test]
    fn test_toggle_query_accepts_any_case() {
        let dispatcher = DryRunDispatcher::new();
        dispatcher.set_key_state("capslock", KeyStateMode::Toggled, Some(true));
        assert!(is_key_toggled(&dispatcher, "CapsLock").unwrap());
        assert!(matches!(
            is_key_toggled(&dispatcher, "INS"),
            Err(Error::IndeterminateKeyState { .. })
        ));
    }

    #[test]
    fn test_indeterminate_state_is_an_error_not_false() {
        let dispatcher = DryRunDispatcher::new();
        let err = get_key_state(&dispatcher, "NoSuchKey").unwrap_err();
        assert!(matches!(err, Error::IndeterminateKeyState { ref key } if key == "NoSuchKey"));

        dispatcher.set_key_state("a", KeyStateMode::Logical, Some(false));
        assert!(!get_key_state(&dispatcher, "a").unwrap());
    }

    #[test]
    fn test_physical_query_uses_physical_mode() {
        let dispatcher = DryRunDispatcher::new();
        dispatcher.set_key_state("LButton", KeyStateMode::Physical, Some(true));
        assert!(get_physical_key_state(&dispatcher, "LButton").unwrap());
        assert_eq!(
            dispatcher.calls(),
            vec![DispatchCall::QueryKeyState {
                key_name: "LButton".to_string(),
                mode: KeyStateMode::Physical,
            }]
        );
    }

    #[test]
    fn test_lock_state_parsing() {
        assert_eq!("always_on".parse::<LockState>().unwrap(), LockState::AlwaysOn);
        assert_eq!("AlwaysOff".parse::<LockState>().unwrap(), LockState::AlwaysOff);
        assert_eq!("on".parse::<LockState>().unwrap(), LockState::On);
        assert_eq!(LockState::from(false), LockState::Off);
        assert!("sideways".parse::<LockState>().is_err());
    }

    #[test]
    fn test_set_lock_state_is_visible_as_toggle() {
        let dispatcher = DryRunDispatcher::new();
        set_num_lock_state(&dispatcher, LockState::AlwaysOn).unwrap();
        assert!(is_key_toggled(&dispatcher, "NumLock").unwrap());
        set_num_lock_state(&dispatcher, LockState::Off).unwrap();
        assert!(!is_key_toggled(&dispatcher, "numlock").unwrap());
    }

    #[test]
    fn test_key_wait_encodes_options_and_inverts_timeout() {
        let dispatcher = DryRunDispatcher::new();
        assert!(key_wait_pressed(&dispatcher, "a", true, Some(0.5)).unwrap());
        dispatcher.set_key_wait_times_out(true);
        assert!(!key_wait_released(&dispatcher, "a", false, None).unwrap());
        assert_eq!(
            dispatcher.calls(),
            vec![
                DispatchCall::KeyWait {
                    key_name: "a".to_string(),
                    options: "DLT0.5".to_string(),
                },
                DispatchCall::KeyWait {
                    key_name: "a".to_string(),
                    options: "".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_send_level_range() {
        let dispatcher = DryRunDispatcher::new();
        send_level(&dispatcher, 100).unwrap();
        assert!(send_level(&dispatcher, 101).unwrap_err().is_invalid_argument());
        assert_eq!(dispatcher.calls(), vec![DispatchCall::SetSendLevel(100)]);
    }

    #[test]
    fn test_send_and_reset() {
        let dispatcher = DryRunDispatcher::new();
        send(&dispatcher, "{Enter}").unwrap();
        send_mode(&dispatcher, "Input".parse().unwrap()).unwrap();
        reset_hotstring(&dispatcher).unwrap();
        assert_eq!(
            dispatcher.calls(),
            vec![
                DispatchCall::SendKeys("{Enter}".to_string()),
                DispatchCall::SetSendMode("input".to_string()),
                DispatchCall::ResetHotstringRecognizer,
            ]
        );
    }
}
