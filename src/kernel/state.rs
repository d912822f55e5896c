use crate::kernel::search::{SearchState, Span};
use crate::models::{BufferCache, FolderExpansion, PathTree, PathTreeError, PathTreeRow};

/// Open-file session of the selected project.
#[derive(Debug, Default)]
pub struct SessionState {
    pub project: Option<String>,
    /// Tab order is open order.
    pub open_paths: Vec<String>,
    pub active_path: Option<String>,
    pub buffers: BufferCache,
    /// Flat file list last reported for `project`.
    pub files: Vec<String>,
    pub expansion: FolderExpansion,
}

impl SessionState {
    /// Drops every tab and buffer and the file list, keeping the project.
    pub fn reset(&mut self) {
        self.open_paths.clear();
        self.active_path = None;
        self.buffers.clear();
        self.files.clear();
        self.expansion.clear();
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open_paths.iter().any(|p| p == path)
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    pub fn active_text(&self) -> Option<&str> {
        self.buffers.text(self.active_path.as_deref()?)
    }

    pub fn is_current_project(&self, project: &str) -> bool {
        self.project.as_deref() == Some(project)
    }

    /// Removes `path` from the tab strip. Returns whether it was open.
    pub fn remove_tab(&mut self, path: &str) -> bool {
        let Some(index) = self.open_paths.iter().position(|p| p == path) else {
            return false;
        };
        self.open_paths.remove(index);
        if self.active_path.as_deref() == Some(path) {
            self.active_path = self.open_paths.last().cloned();
        }
        true
    }

    pub fn tree(&self) -> Result<PathTree, PathTreeError> {
        PathTree::build(&self.files)
    }

    pub fn tree_rows(&self) -> Result<Vec<PathTreeRow>, PathTreeError> {
        Ok(self.tree()?.flatten_for_view(&self.expansion))
    }

    /// Paths of open tabs whose buffer differs from what was last persisted.
    pub fn dirty_paths(&self) -> Vec<&str> {
        self.open_paths
            .iter()
            .filter(|p| self.buffers.dirty(p))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteFile { project: String, path: String },
    DeleteProject { name: String },
}

/// The single modal layer above the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    Palette {
        query: String,
        selected: usize,
        /// The search panel was open underneath and comes back on close.
        resume_search: bool,
    },
    Search,
    ConfirmPending(PendingAction),
}

impl Overlay {
    pub fn is_palette(&self) -> bool {
        matches!(self, Overlay::Palette { .. })
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Overlay::Search)
    }

    /// Whether the search panel is showing, directly or under the palette.
    pub fn search_visible(&self) -> bool {
        matches!(
            self,
            Overlay::Search
                | Overlay::Palette {
                    resume_search: true,
                    ..
                }
        )
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match self {
            Overlay::ConfirmPending(action) => Some(action),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewFile,
    NewProject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            text: String::new(),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
    /// File the status refers to, when there is one.
    pub path: Option<String>,
}

#[derive(Debug, Default)]
pub struct UiState {
    pub overlay: Overlay,
    pub prompt: Option<Prompt>,
    pub status: Option<StatusLine>,
    /// Live selection in the active document. `None` when the editor has
    /// no cursor context.
    pub selection: Option<Span>,
    pub stdin: String,
    pub output: Option<String>,
    pub running: bool,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub projects: Vec<String>,
    pub session: SessionState,
    pub search: SearchState,
    pub ui: UiState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
