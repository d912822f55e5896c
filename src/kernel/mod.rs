//! Headless session core (state/action/effect).

pub mod action;
pub mod effect;
pub mod error;
pub mod palette;
pub mod search;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use effect::Effect;
pub use error::{SessionError, SessionResult};
pub use palette::CommandEntry;
pub use search::{SearchState, Span};
pub use state::{
    AppState, Overlay, PendingAction, Prompt, PromptKind, SessionState, StatusKind, StatusLine,
    UiState,
};
pub use store::{DispatchResult, Store};
