//! Async runtime adapter: executes collaborator effects off the kernel
//! thread and sends completion actions back over the kernel bus.

mod runtime;

pub use runtime::{run_effect, AsyncRuntime};
