//! Chord table: key → command, with a palette-only layer on top of the
//! global one.

use crate::core::event::{Key, KeyCode, KeyEvent};
use crate::core::Command;
use crate::kernel::services::ports::KeybindingRule;
use rustc_hash::FxHashMap;

use super::settings::parse_keybinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindingContext {
    Global,
    CommandPalette,
}

impl KeybindingContext {
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_ascii_lowercase();
        match v.as_str() {
            "global" => Some(Self::Global),
            "palette" | "commandpalette" | "command_palette" => Some(Self::CommandPalette),
            _ => None,
        }
    }
}

pub struct KeybindingService {
    global: FxHashMap<Key, Command>,
    command_palette: FxHashMap<Key, Command>,
}

impl KeybindingService {
    pub fn new() -> Self {
        Self::with_defaults()
    }

    pub fn with_defaults() -> Self {
        Self {
            global: default_global_keybindings(),
            command_palette: default_command_palette_keybindings(),
        }
    }

    pub fn resolve(&self, context: KeybindingContext, key: &Key) -> Option<&Command> {
        match context {
            KeybindingContext::Global => self.global.get(key),
            KeybindingContext::CommandPalette => self
                .command_palette
                .get(key)
                .or_else(|| self.global.get(key)),
        }
    }

    /// Resolves a raw key press. Chords that would clash with text editing
    /// are dropped while focus is in an editable element.
    pub fn resolve_event(&self, context: KeybindingContext, event: &KeyEvent) -> Option<Command> {
        let key = Key::from(*event);
        let command = *self.resolve(context, &key)?;
        if event.is_editable_target() && command.conflicts_with_text_editing() {
            tracing::debug!(command = command.name(), "chord suppressed in editable target");
            return None;
        }
        Some(command)
    }

    pub fn bindings(&self, context: KeybindingContext) -> &FxHashMap<Key, Command> {
        match context {
            KeybindingContext::Global => &self.global,
            KeybindingContext::CommandPalette => &self.command_palette,
        }
    }

    pub fn bind(&mut self, context: KeybindingContext, key: Key, command: Command) {
        self.map_mut(context).insert(key, command);
    }

    pub fn unbind(&mut self, context: KeybindingContext, key: &Key) -> Option<Command> {
        self.map_mut(context).remove(key)
    }

    /// Applies user overrides, on the global table unless the rule names a
    /// context. Entries that do not parse are skipped.
    pub fn apply_rules(&mut self, rules: &[KeybindingRule]) -> usize {
        let mut applied = 0;
        for rule in rules {
            let context = match rule.context.as_deref() {
                None => KeybindingContext::Global,
                Some(value) => match KeybindingContext::parse(value) {
                    Some(context) => context,
                    None => {
                        tracing::warn!(context = %value, "unknown keybinding context, skipped");
                        continue;
                    }
                },
            };
            let Some(key) = parse_keybinding(&rule.key) else {
                tracing::warn!(key = %rule.key, "unknown key in keybinding, skipped");
                continue;
            };
            let Some(command) = Command::from_name(&rule.command) else {
                tracing::warn!(command = %rule.command, "unknown command in keybinding, skipped");
                continue;
            };
            self.bind(context, key, command);
            applied += 1;
        }
        applied
    }

    fn map_mut(&mut self, context: KeybindingContext) -> &mut FxHashMap<Key, Command> {
        match context {
            KeybindingContext::Global => &mut self.global,
            KeybindingContext::CommandPalette => &mut self.command_palette,
        }
    }
}

impl Default for KeybindingService {
    fn default() -> Self {
        Self::new()
    }
}

fn default_global_keybindings() -> FxHashMap<Key, Command> {
    let mut bindings = FxHashMap::default();
    bindings.reserve(16);

    bindings.insert(Key::simple(KeyCode::Esc), Command::Escape);

    bindings.insert(Key::primary(KeyCode::Char('s')), Command::Save);
    bindings.insert(Key::primary(KeyCode::Enter), Command::Run);
    bindings.insert(Key::primary_shift(KeyCode::Char('p')), Command::OpenCommandPalette);
    bindings.insert(Key::primary(KeyCode::Char('f')), Command::ToggleSearchPanel);
    bindings.insert(Key::primary_shift(KeyCode::Char('n')), Command::NewFile);
    bindings.insert(Key::primary_shift(KeyCode::Backspace), Command::DeleteFile);
    bindings.insert(Key::primary_shift(KeyCode::Delete), Command::DeleteFile);

    bindings
}

fn default_command_palette_keybindings() -> FxHashMap<Key, Command> {
    let mut bindings = FxHashMap::default();
    bindings.reserve(4);

    bindings.insert(Key::simple(KeyCode::Up), Command::PaletteMoveUp);
    bindings.insert(Key::simple(KeyCode::Down), Command::PaletteMoveDown);
    bindings.insert(Key::simple(KeyCode::Enter), Command::PaletteConfirm);

    bindings
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/keybinding.rs"]
mod tests;
