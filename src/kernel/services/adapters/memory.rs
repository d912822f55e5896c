//! In-process collaborator backed by maps, with injectable failures.

use crate::kernel::services::ports::{
    ExecutionOutput, WorkspaceBackend, WorkspaceError, WorkspaceResult,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Collaborator operations a failure can be injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceOp {
    ListProjects,
    ListFiles,
    ReadFile,
    WriteFile,
    DeleteFile,
    CreateProject,
    DeleteProject,
    Execute,
}

#[derive(Default)]
struct Inner {
    projects: BTreeMap<String, BTreeMap<String, String>>,
    failures: FxHashMap<WorkspaceOp, String>,
    reads: FxHashMap<(String, String), usize>,
}

#[derive(Default)]
pub struct MemoryWorkspace {
    inner: Mutex<Inner>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, name: &str, files: &[(&str, &str)]) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            let project = inner.projects.entry(name.to_string()).or_default();
            for (path, text) in files {
                project.insert(path.to_string(), text.to_string());
            }
        }
        self
    }

    /// The next call of `op` fails with `message`.
    pub fn fail_next(&self, op: WorkspaceOp, message: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures.insert(op, message.into());
        }
    }

    pub fn file(&self, project: &str, path: &str) -> Option<String> {
        let inner = self.inner.lock().ok()?;
        inner.projects.get(project)?.get(path).cloned()
    }

    /// How many times `path` was read from storage.
    pub fn read_count(&self, project: &str, path: &str) -> usize {
        let Ok(inner) = self.inner.lock() else {
            return 0;
        };
        let key = (project.to_string(), path.to_string());
        inner.reads.get(&key).copied().unwrap_or(0)
    }

    fn lock(&self, op: WorkspaceOp) -> WorkspaceResult<MutexGuard<'_, Inner>> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| WorkspaceError::Failed("workspace state poisoned".to_string()))?;
        if let Some(message) = inner.failures.remove(&op) {
            return Err(WorkspaceError::Failed(message));
        }
        Ok(inner)
    }
}

fn project_mut<'a>(
    inner: &'a mut Inner,
    project: &str,
) -> WorkspaceResult<&'a mut BTreeMap<String, String>> {
    inner
        .projects
        .get_mut(project)
        .ok_or_else(|| WorkspaceError::NotFound("Project not found".to_string()))
}

impl WorkspaceBackend for MemoryWorkspace {
    fn list_projects(&self) -> WorkspaceResult<Vec<String>> {
        let inner = self.lock(WorkspaceOp::ListProjects)?;
        Ok(inner.projects.keys().cloned().collect())
    }

    fn list_files(&self, project: &str) -> WorkspaceResult<Vec<String>> {
        let mut inner = self.lock(WorkspaceOp::ListFiles)?;
        Ok(project_mut(&mut inner, project)?.keys().cloned().collect())
    }

    fn read_file(&self, project: &str, path: &str) -> WorkspaceResult<String> {
        let mut inner = self.lock(WorkspaceOp::ReadFile)?;
        let text = project_mut(&mut inner, project)?
            .get(path)
            .cloned()
            .ok_or_else(|| WorkspaceError::NotFound("File not found".to_string()))?;
        *inner
            .reads
            .entry((project.to_string(), path.to_string()))
            .or_default() += 1;
        Ok(text)
    }

    fn write_file(&self, project: &str, path: &str, text: &str) -> WorkspaceResult<()> {
        let mut inner = self.lock(WorkspaceOp::WriteFile)?;
        project_mut(&mut inner, project)?.insert(path.to_string(), text.to_string());
        Ok(())
    }

    fn delete_file(&self, project: &str, path: &str) -> WorkspaceResult<()> {
        let mut inner = self.lock(WorkspaceOp::DeleteFile)?;
        project_mut(&mut inner, project)?
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| WorkspaceError::NotFound("File not found".to_string()))
    }

    fn create_project(&self, name: &str) -> WorkspaceResult<()> {
        let mut inner = self.lock(WorkspaceOp::CreateProject)?;
        if inner.projects.contains_key(name) {
            return Err(WorkspaceError::AlreadyExists(
                "Project already exists".to_string(),
            ));
        }
        inner.projects.insert(name.to_string(), BTreeMap::new());
        Ok(())
    }

    fn delete_project(&self, name: &str) -> WorkspaceResult<()> {
        let mut inner = self.lock(WorkspaceOp::DeleteProject)?;
        inner
            .projects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| WorkspaceError::NotFound("Project not found".to_string()))
    }

    /// Echoes stdin for runnable files.
    fn execute(&self, project: &str, path: &str, stdin: &str) -> WorkspaceResult<ExecutionOutput> {
        let mut inner = self.lock(WorkspaceOp::Execute)?;
        if !project_mut(&mut inner, project)?.contains_key(path) {
            return Err(WorkspaceError::NotFound("File not found".to_string()));
        }
        if !(path.ends_with(".py") || path.ends_with(".js")) {
            return Err(WorkspaceError::Failed("Unsupported file type".to_string()));
        }
        Ok(ExecutionOutput {
            stdout: stdin.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
