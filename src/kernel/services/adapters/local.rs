//! Local-disk collaborator: each project is a directory under one root and
//! files are `/`-separated paths inside it.

use crate::kernel::services::ports::{
    ExecutionOutput, WorkspaceBackend, WorkspaceError, WorkspaceResult,
};
use ignore::WalkBuilder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct LocalWorkspace {
    root: PathBuf,
    timeout: Duration,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, project: &str) -> WorkspaceResult<PathBuf> {
        let rel = relative_path(project)?;
        if rel.components().count() != 1 {
            return Err(WorkspaceError::Failed("Invalid project name".to_string()));
        }
        Ok(self.root.join(rel))
    }

    fn existing_project_dir(&self, project: &str) -> WorkspaceResult<PathBuf> {
        let dir = self.project_dir(project)?;
        if !dir.is_dir() {
            return Err(WorkspaceError::NotFound("Project not found".to_string()));
        }
        Ok(dir)
    }

    fn file_path(&self, project: &str, path: &str) -> WorkspaceResult<PathBuf> {
        Ok(self.existing_project_dir(project)?.join(relative_path(path)?))
    }
}

/// Rejects absolute paths and parent references so every path stays inside
/// its project.
fn relative_path(value: &str) -> WorkspaceResult<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(value).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(WorkspaceError::Failed(format!("Invalid path: {value}"))),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(WorkspaceError::Failed(format!("Invalid path: {value}")));
    }
    Ok(out)
}

fn interpreter_for(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "py" => Some("python3"),
        "js" => Some("node"),
        _ => None,
    }
}

impl WorkspaceBackend for LocalWorkspace {
    fn list_projects(&self) -> WorkspaceResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut projects = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                projects.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        projects.sort();
        Ok(projects)
    }

    fn list_files(&self, project: &str) -> WorkspaceResult<Vec<String>> {
        let dir = self.existing_project_dir(project)?;
        let walker = WalkBuilder::new(&dir)
            .standard_filters(false)
            .hidden(false)
            .build();

        let mut files = Vec::new();
        for entry in walker.flatten() {
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&dir) else {
                continue;
            };
            let parts: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect();
            files.push(parts.join("/"));
        }
        files.sort();
        Ok(files)
    }

    fn read_file(&self, project: &str, path: &str) -> WorkspaceResult<String> {
        let file = self.file_path(project, path)?;
        if !file.is_file() {
            return Err(WorkspaceError::NotFound("File not found".to_string()));
        }
        Ok(fs::read_to_string(file)?)
    }

    fn write_file(&self, project: &str, path: &str, text: &str) -> WorkspaceResult<()> {
        let file = self.file_path(project, path)?;
        if let Some(parent) = file.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(fs::write(file, text)?)
    }

    fn delete_file(&self, project: &str, path: &str) -> WorkspaceResult<()> {
        let file = self.file_path(project, path)?;
        if !file.is_file() {
            return Err(WorkspaceError::NotFound("File not found".to_string()));
        }
        Ok(fs::remove_file(file)?)
    }

    fn create_project(&self, name: &str) -> WorkspaceResult<()> {
        let dir = self.project_dir(name)?;
        if dir.exists() {
            return Err(WorkspaceError::AlreadyExists(
                "Project already exists".to_string(),
            ));
        }
        Ok(fs::create_dir_all(dir)?)
    }

    fn delete_project(&self, name: &str) -> WorkspaceResult<()> {
        let dir = self.existing_project_dir(name)?;
        Ok(fs::remove_dir_all(dir)?)
    }

    fn execute(&self, project: &str, path: &str, stdin: &str) -> WorkspaceResult<ExecutionOutput> {
        let file = self.file_path(project, path)?;
        if !file.is_file() {
            return Err(WorkspaceError::NotFound("File not found".to_string()));
        }
        let interpreter = interpreter_for(path)
            .ok_or_else(|| WorkspaceError::Failed("Unsupported file type".to_string()))?;

        tracing::info!(project, path, interpreter, "execute");
        let mut child = Command::new(interpreter)
            .arg(&file)
            .current_dir(self.existing_project_dir(project)?)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Output is drained and input fed off this thread so a script that
        // fills a pipe before reading stdin cannot outlive the timeout.
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());
        spawn_writer(child.stdin.take(), stdin.as_bytes().to_vec());

        let status = match wait_with_timeout(&mut child, self.timeout)? {
            Some(status) => status,
            None => {
                if let Err(e) = child.kill() {
                    tracing::warn!(error = %e, "failed to kill timed out process");
                }
                let _ = child.wait();
                return Err(WorkspaceError::Failed("Execution timed out".to_string()));
            }
        };

        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);
        if !status.success() {
            let message = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(WorkspaceError::Failed(message));
        }
        Ok(ExecutionOutput { stdout })
    }
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<thread::JoinHandle<String>> {
    let mut pipe = pipe?;
    Some(thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            tracing::debug!(error = %e, "pipe read failed");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }))
}

/// Writes `input` and closes the pipe. A script that never reads stdin
/// closes it early.
fn spawn_writer<W: Write + Send + 'static>(pipe: Option<W>, input: Vec<u8>) {
    let Some(mut pipe) = pipe else {
        return;
    };
    thread::spawn(move || {
        if !input.is_empty() {
            if let Err(e) = pipe.write_all(&input) {
                tracing::debug!(error = %e, "stdin not fully consumed");
            }
        }
    });
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/local.rs"]
mod tests;
