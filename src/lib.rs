//! sphere - headless session core for a browser-hosted code workspace
//!
//! Module layout:
//! - core: commands and key chords
//! - models: path tree, buffer cache
//! - kernel: state / action / effect / store, search, palette, services
//! - app: workbench (store + key listener + runtime)

pub mod app;
pub mod core;
pub mod kernel;
pub mod models;
