//! Option string encoding
//!
//! Pure functions, no validation beyond what the grammar itself needs.
//! Tokens are concatenated without separators.

use super::types::{HotkeyOptions, HotstringOptions, SendMode};

/// Push `on` for `Some(true)`, `off` for `Some(false)`, nothing for `None`.
fn push_flag(out: &mut String, value: Option<bool>, on: &str, off: &str) {
    match value {
        Some(true) => out.push_str(on),
        Some(false) => out.push_str(off),
        None => {}
    }
}

fn push_number<T: std::fmt::Display>(out: &mut String, prefix: char, value: Option<T>) {
    if let Some(value) = value {
        out.push(prefix);
        out.push_str(&value.to_string());
    }
}

/// Encode hotkey options as `B`/`B0`, `P<n>`, `T<n>`, `I<n>`, in that order.
pub fn encode_hotkey_options(options: &HotkeyOptions) -> String {
    let mut out = String::new();
    push_flag(&mut out, options.buffer, "B", "B0");
    push_number(&mut out, 'P', options.priority);
    push_number(&mut out, 'T', options.max_threads);
    push_number(&mut out, 'I', options.input_level);
    out
}

/// Encode hotstring options. Token order is significant.
pub fn encode_hotstring_options(options: &HotstringOptions) -> String {
    let mut out = String::new();

    // End-char handling: an explicit `false` wait wins over everything.
    if options.wait_for_end_char == Some(false) {
        out.push('*');
    } else if options.omit_end_char == Some(true) {
        out.push_str("*0");
        out.push('O');
    } else {
        if options.wait_for_end_char == Some(true) {
            out.push_str("*0");
        }
        if options.omit_end_char == Some(false) {
            out.push_str("O0");
        }
    }

    push_flag(&mut out, options.replace_inside_word, "?", "?0");
    push_flag(&mut out, options.backspacing, "B", "B0");

    if options.conform_to_case == Some(true) {
        out.push_str("C1");
    } else if options.case_sensitive == Some(true) {
        out.push('C');
    } else if options.case_sensitive.is_some() || options.conform_to_case.is_some() {
        out.push_str("C0");
    }

    push_number(&mut out, 'K', options.key_delay);
    push_number(&mut out, 'P', options.priority);

    if options.text == Some(true) {
        out.push('T');
    } else if options.raw == Some(true) {
        out.push('R');
    } else if options.raw.is_some() || options.text.is_some() {
        out.push_str("R0");
    }

    if let Some(mode) = options.mode.as_deref().and_then(SendMode::parse) {
        out.push_str(mode.token());
    }

    push_flag(&mut out, options.reset_recognizer, "Z", "Z0");
    out
}

/// Full hotstring definition: `:<options>:<pattern>`
pub fn hotstring_definition(options: &str, pattern: &str) -> String {
    format!(":{}:{}", options, pattern)
}

/// Encode key-wait options: `D` (wait for press), `L` (logical state), `T<secs>`.
pub fn encode_key_wait_options(down: bool, logical_state: bool, timeout: Option<f64>) -> String {
    let mut out = String::new();
    if down {
        out.push('D');
    }
    if logical_state {
        out.push('L');
    }
    push_number(&mut out, 'T', timeout);
    out
}
