// Host-side tests for keyboard mapping.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod keyboard {
    include!("../src/events/keyboard.rs");
}

use keyboard::*;

#[test]
fn escape_closes_overlay() {
    assert_eq!(action_for_key("Escape"), Some(KeyAction::CloseOverlay));
    assert_eq!(action_for_key("Esc"), Some(KeyAction::CloseOverlay));
}

#[test]
fn m_toggles_mute_in_either_case() {
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleMute));
    assert_eq!(action_for_key("M"), Some(KeyAction::ToggleMute));
}

#[test]
fn other_keys_do_nothing() {
    for key in ["a", "Enter", " ", "ArrowDown", ""] {
        assert_eq!(action_for_key(key), None, "{key:?}");
    }
}
