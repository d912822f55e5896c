use crate::core::Command;
use crate::kernel::error::SessionResult;
use crate::kernel::search::Span;
use crate::kernel::services::ports::ExecutionOutput;
use crate::kernel::state::PromptKind;

#[derive(Debug, Clone)]
pub enum Action {
    RunCommand(Command),

    // ==================== session ====================
    LoadProjects,
    SelectProject(String),
    OpenFile(String),
    CloseFile(String),
    Edit {
        path: String,
        text: String,
    },
    /// Reported by the display layer for the active document.
    SetSelection(Option<Span>),
    SaveFile(String),
    RequestDeleteFile(String),
    RequestDeleteProject(String),
    ToggleFolder {
        path: String,
        depth: u16,
    },
    SetStdin(String),

    // ==================== prompts ====================
    OpenPrompt(PromptKind),
    PromptSetText(String),
    PromptSubmit,
    PromptCancel,

    // ==================== search ====================
    SearchSetQuery(String),
    SearchSetReplacement(String),

    // ==================== palette ====================
    PaletteSetQuery(String),
    PaletteMoveSelection(isize),

    // ==================== completions ====================
    ProjectsLoaded(SessionResult<Vec<String>>),
    FilesLoaded {
        project: String,
        result: SessionResult<Vec<String>>,
    },
    FileLoaded {
        project: String,
        path: String,
        result: SessionResult<String>,
    },
    FileSaved {
        project: String,
        path: String,
        /// Text that was sent, which becomes the persisted snapshot.
        text: String,
        result: SessionResult<()>,
    },
    FileCreated {
        project: String,
        path: String,
        result: SessionResult<()>,
    },
    FileDeleted {
        project: String,
        path: String,
        result: SessionResult<()>,
    },
    ProjectCreated {
        name: String,
        result: SessionResult<()>,
    },
    ProjectDeleted {
        name: String,
        result: SessionResult<()>,
    },
    ExecutionFinished {
        project: String,
        path: String,
        result: SessionResult<ExecutionOutput>,
    },
}

impl Action {
    /// Whether this action is an effect completion coming back from the
    /// runtime.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Action::ProjectsLoaded(_)
                | Action::FilesLoaded { .. }
                | Action::FileLoaded { .. }
                | Action::FileSaved { .. }
                | Action::FileCreated { .. }
                | Action::FileDeleted { .. }
                | Action::ProjectCreated { .. }
                | Action::ProjectDeleted { .. }
                | Action::ExecutionFinished { .. }
        )
    }
}
