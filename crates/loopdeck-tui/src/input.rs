use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Drag toward earlier cards
    DragPrev,
    /// Drag toward later cards
    DragNext,
    FlingPrev,
    FlingNext,
    /// Rotate the source list by one, forcing a rebuild
    RotateSource,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('h'), KeyModifiers::NONE) => Action::DragPrev,
        (KeyCode::Left, KeyModifiers::NONE) => Action::DragPrev,
        (KeyCode::Char('l'), KeyModifiers::NONE) => Action::DragNext,
        (KeyCode::Right, KeyModifiers::NONE) => Action::DragNext,

        (KeyCode::Char('H'), _) => Action::FlingPrev,
        (KeyCode::Left, KeyModifiers::SHIFT) => Action::FlingPrev,
        (KeyCode::Char('L'), _) => Action::FlingNext,
        (KeyCode::Right, KeyModifiers::SHIFT) => Action::FlingNext,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::RotateSource,

        _ => Action::None,
    }
}
