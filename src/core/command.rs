//! Semantic commands: what a chord or palette entry asks for, independent
//! of the key that produced it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== session ====================
    Save,
    Run,
    NewFile,
    NewProject,
    DeleteFile,
    DeleteProject,
    CloseTab,

    // ==================== overlays ====================
    OpenCommandPalette,
    ToggleSearchPanel,
    Escape,
    ConfirmPending,
    CancelPending,

    // ==================== palette ====================
    PaletteMoveUp,
    PaletteMoveDown,
    PaletteConfirm,

    // ==================== find / replace ====================
    FindNext,
    ReplaceNext,
    ReplaceAll,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Save => "save",
            Command::Run => "run",
            Command::NewFile => "newFile",
            Command::NewProject => "newProject",
            Command::DeleteFile => "deleteFile",
            Command::DeleteProject => "deleteProject",
            Command::CloseTab => "closeTab",
            Command::OpenCommandPalette => "commandPalette",
            Command::ToggleSearchPanel => "toggleSearchPanel",
            Command::Escape => "escape",
            Command::ConfirmPending => "confirmPending",
            Command::CancelPending => "cancelPending",
            Command::PaletteMoveUp => "paletteMoveUp",
            Command::PaletteMoveDown => "paletteMoveDown",
            Command::PaletteConfirm => "paletteConfirm",
            Command::FindNext => "findNext",
            Command::ReplaceNext => "replaceNext",
            Command::ReplaceAll => "replaceAll",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name.trim() {
            "save" => Command::Save,
            "run" => Command::Run,
            "newFile" => Command::NewFile,
            "newProject" => Command::NewProject,
            "deleteFile" => Command::DeleteFile,
            "deleteProject" => Command::DeleteProject,
            "closeTab" => Command::CloseTab,
            "commandPalette" => Command::OpenCommandPalette,
            "toggleSearchPanel" => Command::ToggleSearchPanel,
            "escape" => Command::Escape,
            "confirmPending" => Command::ConfirmPending,
            "cancelPending" => Command::CancelPending,
            "paletteMoveUp" => Command::PaletteMoveUp,
            "paletteMoveDown" => Command::PaletteMoveDown,
            "paletteConfirm" => Command::PaletteConfirm,
            "findNext" => Command::FindNext,
            "replaceNext" => Command::ReplaceNext,
            "replaceAll" => Command::ReplaceAll,
            _ => return None,
        };
        Some(command)
    }

    /// Commands that destroy data and must not fire while the user is
    /// typing into a text field.
    pub fn conflicts_with_text_editing(&self) -> bool {
        matches!(self, Command::DeleteFile | Command::DeleteProject)
    }
}
