//! Key chords and the input events the dispatcher listens to.

use bitflags::bitflags;

bitflags! {
    /// Modifier set of a chord.
    ///
    /// `PRIMARY` stands for Ctrl on Linux/Windows and Cmd on macOS; raw
    /// events fold both onto it so one chord table serves every platform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const PRIMARY = 0b0001;
        const SHIFT = 0b0010;
        const ALT = 0b0100;
    }
}

impl KeyModifiers {
    pub const NONE: Self = Self::empty();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn primary(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::PRIMARY)
    }

    pub fn primary_shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::PRIMARY | KeyModifiers::SHIFT)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    pub fn has_primary(&self) -> bool {
        self.modifiers.contains(KeyModifiers::PRIMARY)
    }
}

/// What kind of element held focus when the key went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Other,
    /// A text input, textarea or content-editable element.
    Editable,
}

/// A raw key press as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
    pub target: FocusTarget,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            target: FocusTarget::Other,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn in_editable(mut self) -> Self {
        self.target = FocusTarget::Editable;
        self
    }

    pub fn is_editable_target(&self) -> bool {
        self.target == FocusTarget::Editable
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let mut code = event.code;
        let mut modifiers = KeyModifiers::NONE;

        if event.ctrl || event.meta {
            modifiers |= KeyModifiers::PRIMARY;
        }
        if event.shift {
            modifiers |= KeyModifiers::SHIFT;
        }
        if event.alt {
            modifiers |= KeyModifiers::ALT;
        }

        if let KeyCode::Char(ch) = code {
            if ch.is_ascii_uppercase() {
                code = KeyCode::Char(ch.to_ascii_lowercase());
                modifiers |= KeyModifiers::SHIFT;
            }
        }

        Self::new(code, modifiers)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/event.rs"]
mod tests;
