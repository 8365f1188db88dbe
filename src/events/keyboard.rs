#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    CloseOverlay,
    ToggleMute,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "Escape" | "Esc" => Some(KeyAction::CloseOverlay),
        "m" | "M" => Some(KeyAction::ToggleMute),
        _ => None,
    }
}
