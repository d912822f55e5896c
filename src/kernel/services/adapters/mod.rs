//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod keybinding;
pub mod local;
pub mod memory;
pub mod runtime;
pub mod settings;

pub use keybinding::{KeybindingContext, KeybindingService};
pub use local::LocalWorkspace;
pub use memory::{MemoryWorkspace, WorkspaceOp};
pub use runtime::{run_effect, AsyncRuntime};
pub use settings::{
    default_workspace_root, ensure_settings_file, get_log_dir, get_settings_path, load_settings,
    parse_keybinding,
};
