//! Collaborator plumbing around the store.
//!
//! - `ports`: collaborator contract and settings data
//! - `adapters`: runtime, disk/in-memory collaborators, keybindings, settings IO
//! - `bus`: completions flowing back to the store

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
