use super::*;

const TRISTATE: [Option<bool>; 3] = [None, Some(false), Some(true)];

// ============================================
// HOTKEY
// ============================================

#[test]
fn test_empty_hotkey_options_encode_to_empty_string() {
    assert_eq!(encode_hotkey_options(&HotkeyOptions::default()), "");
    assert!(HotkeyOptions::new().is_empty());
}

#[test]
fn test_hotkey_buffer_tristate() {
    assert_eq!(encode_hotkey_options(&HotkeyOptions { buffer: None, ..Default::default() }), "");
    assert_eq!(encode_hotkey_options(&HotkeyOptions::new().buffer(false)), "B0");
    assert_eq!(encode_hotkey_options(&HotkeyOptions::new().buffer(true)), "B");
}

#[test]
fn test_hotkey_full_example() {
    let options = HotkeyOptions::new().buffer(true).priority(5).max_threads(2);
    assert_eq!(encode_hotkey_options(&options), "BP5T2");
}

#[test]
fn test_hotkey_token_order_is_fixed() {
    let options = HotkeyOptions::new()
        .input_level(3)
        .max_threads(4)
        .priority(-2)
        .buffer(false);
    assert_eq!(encode_hotkey_options(&options), "B0P-2T4I3");
}

#[test]
fn test_hotkey_reset_emits_engine_defaults() {
    let options = HotkeyOptions::new()
        .reset_priority()
        .reset_max_threads()
        .reset_input_level();
    assert_eq!(encode_hotkey_options(&options), "P0T1I0");
}

// ============================================
// HOTSTRING
// ============================================

#[test]
fn test_empty_hotstring_options_encode_to_empty_string() {
    assert_eq!(encode_hotstring_options(&HotstringOptions::default()), "");
    assert_eq!(hotstring_definition("", "btw"), "::btw");
}

#[test]
fn test_no_wait_for_end_char_wins_over_omit() {
    for omit in TRISTATE {
        let options = HotstringOptions {
            wait_for_end_char: Some(false),
            omit_end_char: omit,
            ..Default::default()
        };
        assert_eq!(encode_hotstring_options(&options), "*", "omit={:?}", omit);
    }
}

#[test]
fn test_omit_end_char_forces_wait() {
    for wait in [None, Some(true)] {
        let options = HotstringOptions {
            wait_for_end_char: wait,
            omit_end_char: Some(true),
            ..Default::default()
        };
        assert_eq!(encode_hotstring_options(&options), "*0O");
    }
}

#[test]
fn test_end_char_branches_fire_independently() {
    let both = HotstringOptions::new()
        .wait_for_end_char(true)
        .omit_end_char(false);
    assert_eq!(encode_hotstring_options(&both), "*0O0");
    assert_eq!(
        encode_hotstring_options(&HotstringOptions::new().wait_for_end_char(true)),
        "*0"
    );
    assert_eq!(
        encode_hotstring_options(&HotstringOptions::new().omit_end_char(false)),
        "O0"
    );
}

#[test]
fn test_inside_word_and_backspacing_tristate() {
    let cases = [
        (None, None, ""),
        (Some(true), Some(true), "?B"),
        (Some(false), Some(false), "?0B0"),
        (Some(true), Some(false), "?B0"),
    ];
    for (inside, backspacing, expected) in cases {
        let options = HotstringOptions {
            replace_inside_word: inside,
            backspacing,
            ..Default::default()
        };
        assert_eq!(encode_hotstring_options(&options), expected);
    }
}

#[test]
fn test_conform_to_case_always_yields_c1() {
    for case_sensitive in TRISTATE {
        let options = HotstringOptions {
            conform_to_case: Some(true),
            case_sensitive,
            ..Default::default()
        };
        assert_eq!(encode_hotstring_options(&options), "C1");
    }
}

#[test]
fn test_case_handling_fallbacks() {
    let cases = [
        (None, None, ""),
        (None, Some(true), "C"),
        (Some(false), Some(true), "C"),
        (None, Some(false), "C0"),
        (Some(false), None, "C0"),
        (Some(false), Some(false), "C0"),
    ];
    for (conform, sensitive, expected) in cases {
        let options = HotstringOptions {
            conform_to_case: conform,
            case_sensitive: sensitive,
            ..Default::default()
        };
        assert_eq!(
            encode_hotstring_options(&options),
            expected,
            "conform={:?} sensitive={:?}",
            conform,
            sensitive
        );
    }
}

#[test]
fn test_text_wins_over_raw() {
    for raw in TRISTATE {
        let options = HotstringOptions {
            text: Some(true),
            raw,
            ..Default::default()
        };
        assert_eq!(encode_hotstring_options(&options), "T");
    }
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().raw(true)), "R");
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().raw(false)), "R0");
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().text(false)), "R0");
    assert_eq!(
        encode_hotstring_options(&HotstringOptions::new().text(false).raw(true)),
        "R"
    );
}

#[test]
fn test_send_mode_is_case_insensitive() {
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().mode("INPUT")), "SI");
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().mode(SendMode::Play)), "SP");
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().mode("Event")), "SE");
    assert_eq!(encode_hotstring_options(&HotstringOptions::new().mode("bogus")), "");
}

#[test]
fn test_full_hotstring_token_order() {
    let options = HotstringOptions::new()
        .reset_recognizer(false)
        .mode("play")
        .raw(true)
        .priority(2)
        .key_delay(-1)
        .case_sensitive(true)
        .backspacing(false)
        .replace_inside_word(true)
        .wait_for_end_char(false);
    assert_eq!(encode_hotstring_options(&options), "*?B0CK-1P2RSPZ0");

    let options = HotstringOptions::new()
        .omit_end_char(true)
        .conform_to_case(true)
        .text(true)
        .reset_recognizer(true);
    assert_eq!(encode_hotstring_options(&options), "*0OC1TZ");
}

#[test]
fn test_send_mode_from_str() {
    assert_eq!("Input".parse::<SendMode>().unwrap(), SendMode::Input);
    let err = "fast".parse::<SendMode>().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_key_wait_options() {
    assert_eq!(encode_key_wait_options(false, false, None), "");
    assert_eq!(encode_key_wait_options(true, true, Some(1.5)), "DLT1.5");
    assert_eq!(encode_key_wait_options(false, false, Some(2.0)), "T2");
}

#[test]
fn test_options_deserialize_keeps_tristate() {
    let options: HotstringOptions =
        serde_json::from_str(r#"{"caseSensitive": false, "waitForEndChar": true}"#).unwrap();
    assert_eq!(options.case_sensitive, Some(false));
    assert_eq!(options.conform_to_case, None);
    assert_eq!(encode_hotstring_options(&options), "*0C0");

    let hotkey: HotkeyOptions = serde_json::from_str(r#"{"maxThreads": 3}"#).unwrap();
    assert_eq!(encode_hotkey_options(&hotkey), "T3");
}
