//! Terminal events delivered to components

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The event payload components react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Keyboard event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

impl EventKind {
    /// The key event, if this is one
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            EventKind::Key(key) => Some(key),
            EventKind::Resize(..) => None,
        }
    }

    /// Whether this is ctrl+c, which always quits
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self.as_key(),
            Some(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL)
        )
    }
}
