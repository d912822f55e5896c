use crate::kernel::error::SessionError;
use crate::kernel::services::ports::WorkspaceBackend;
use crate::kernel::services::KernelBusSender;
use crate::kernel::{Action, Effect};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    backend: Arc<dyn WorkspaceBackend>,
    tx: KernelBusSender,
    in_flight: Arc<AtomicUsize>,
}

impl AsyncRuntime {
    pub fn new(backend: Arc<dyn WorkspaceBackend>, tx: KernelBusSender) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            backend,
            tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Effects spawned whose completion has not been sent yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn spawn_effect(&self, effect: Effect) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let kind = effect.kind();

        tracing::debug!(effect = kind, "spawn effect");
        in_flight.fetch_add(1, Ordering::AcqRel);
        self.runtime.spawn(async move {
            let task = tokio::task::spawn_blocking(move || run_effect(backend.as_ref(), effect));
            let action = match task.await {
                Ok(action) => Some(action),
                Err(e) => {
                    tracing::error!(effect = kind, error = %e, "effect task failed");
                    None
                }
            };

            if let Some(action) = action {
                if tx.send_completion(kind, action).is_err() {
                    tracing::debug!(effect = kind, "kernel bus closed, dropping completion");
                }
            }
            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }
}

/// Performs one effect against the collaborator and turns the answer into
/// its completion action.
pub fn run_effect(backend: &dyn WorkspaceBackend, effect: Effect) -> Action {
    match effect {
        Effect::ListProjects => {
            Action::ProjectsLoaded(backend.list_projects().map_err(SessionError::from))
        }
        Effect::ListFiles { project } => {
            let result = backend.list_files(&project).map_err(SessionError::from);
            Action::FilesLoaded { project, result }
        }
        Effect::ReadFile { project, path } => {
            let result = backend.read_file(&project, &path).map_err(SessionError::from);
            Action::FileLoaded {
                project,
                path,
                result,
            }
        }
        Effect::WriteFile {
            project,
            path,
            text,
        } => {
            let result = backend
                .write_file(&project, &path, &text)
                .map_err(SessionError::from);
            Action::FileSaved {
                project,
                path,
                text,
                result,
            }
        }
        Effect::CreateFile { project, path } => {
            let result = backend
                .write_file(&project, &path, "")
                .map_err(SessionError::from);
            Action::FileCreated {
                project,
                path,
                result,
            }
        }
        Effect::DeleteFile { project, path } => {
            let result = backend.delete_file(&project, &path).map_err(SessionError::from);
            Action::FileDeleted {
                project,
                path,
                result,
            }
        }
        Effect::CreateProject { name } => {
            let result = backend.create_project(&name).map_err(SessionError::from);
            Action::ProjectCreated { name, result }
        }
        Effect::DeleteProject { name } => {
            let result = backend.delete_project(&name).map_err(SessionError::from);
            Action::ProjectDeleted { name, result }
        }
        Effect::Execute {
            project,
            path,
            stdin,
        } => {
            let result = backend
                .execute(&project, &path, &stdin)
                .map_err(SessionError::from);
            Action::ExecutionFinished {
                project,
                path,
                result,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime.rs"]
mod tests;
