use thiserror::Error;

use crate::kernel::services::ports::WorkspaceError;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Every failure a session operation can report. The message is shown to
/// the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Rejected locally before any collaborator call.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Io(String),
    #[error("{path} is not open")]
    NotOpen { path: String },
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_open(path: impl Into<String>) -> Self {
        Self::NotOpen { path: path.into() }
    }
}

impl From<WorkspaceError> for SessionError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::NotFound(message) => Self::NotFound(message),
            WorkspaceError::AlreadyExists(message) => Self::Conflict(message),
            WorkspaceError::Failed(message) => Self::Io(message),
            WorkspaceError::Io(e) => Self::Io(e.to_string()),
        }
    }
}
