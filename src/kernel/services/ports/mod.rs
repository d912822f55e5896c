//! Service ports: traits + data contracts.

pub mod settings;
pub mod workspace;

pub use settings::{KeybindingRule, Settings};
pub use workspace::{ExecutionOutput, Result as WorkspaceResult, WorkspaceBackend, WorkspaceError};
