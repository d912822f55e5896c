//! Reducers split by concern; each one is an `impl Store` block.

mod completion;
mod palette;
mod prompt;
mod search;
mod session;
