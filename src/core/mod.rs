//! Input vocabulary shared by the kernel and its hosts:
//! - Command: semantic intents
//! - Event: key chords and raw key events

pub mod command;
pub mod event;

pub use command::Command;
pub use event::{FocusTarget, Key, KeyCode, KeyEvent, KeyModifiers};
