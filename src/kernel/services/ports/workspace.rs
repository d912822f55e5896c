//! Project/file persistence and code execution contract.
//!
//! The kernel never talks to storage directly; every call goes through an
//! implementation of [`WorkspaceBackend`] run by the async runtime adapter.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkspaceError>;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    /// The collaborator answered with a failure and a message.
    #[error("{0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub stdout: String,
}

pub trait WorkspaceBackend: Send + Sync {
    fn list_projects(&self) -> Result<Vec<String>>;

    fn list_files(&self, project: &str) -> Result<Vec<String>>;

    fn read_file(&self, project: &str, path: &str) -> Result<String>;

    /// Creates the file when absent.
    fn write_file(&self, project: &str, path: &str, text: &str) -> Result<()>;

    fn delete_file(&self, project: &str, path: &str) -> Result<()>;

    /// Fails with [`WorkspaceError::AlreadyExists`] for a taken name.
    fn create_project(&self, name: &str) -> Result<()>;

    fn delete_project(&self, name: &str) -> Result<()>;

    fn execute(&self, project: &str, path: &str, stdin: &str) -> Result<ExecutionOutput>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/workspace.rs"]
mod tests;
