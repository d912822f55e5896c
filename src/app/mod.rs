//! Application layer (Workbench).

mod workbench;

pub use workbench::Workbench;
