use crate::core::Command;
use crate::kernel::state::{AppState, Overlay};

/// One row of the command palette, derived from the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub shortcut: Option<&'static str>,
    pub enabled: bool,
    pub command: Command,
}

pub fn command_entries(state: &AppState) -> Vec<CommandEntry> {
    let has_file = state.session.active_path.is_some();
    let has_project = state.session.project.is_some();
    let search_label = if state.ui.overlay.search_visible() {
        "Hide Search Panel"
    } else {
        "Show Search Panel"
    };

    vec![
        CommandEntry {
            id: "new-project",
            label: "Create Project",
            shortcut: None,
            enabled: true,
            command: Command::NewProject,
        },
        CommandEntry {
            id: "new-file",
            label: "Create File",
            shortcut: Some("Ctrl+Shift+N"),
            enabled: true,
            command: Command::NewFile,
        },
        CommandEntry {
            id: "save-file",
            label: "Save File",
            shortcut: Some("Ctrl+S"),
            enabled: has_file,
            command: Command::Save,
        },
        CommandEntry {
            id: "run-file",
            label: "Run File",
            shortcut: Some("Ctrl+Enter"),
            enabled: has_file,
            command: Command::Run,
        },
        CommandEntry {
            id: "delete-file",
            label: "Delete File",
            shortcut: Some("Ctrl+Shift+Backspace"),
            enabled: has_file,
            command: Command::DeleteFile,
        },
        CommandEntry {
            id: "delete-project",
            label: "Delete Project",
            shortcut: None,
            enabled: has_project,
            command: Command::DeleteProject,
        },
        CommandEntry {
            id: "search",
            label: search_label,
            shortcut: Some("Ctrl+F"),
            enabled: true,
            command: Command::ToggleSearchPanel,
        },
    ]
}

/// Entries whose label contains `query`, ignoring case.
pub fn filter_entries(entries: Vec<CommandEntry>, query: &str) -> Vec<CommandEntry> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| entry.label.to_lowercase().contains(&query))
        .collect()
}

/// Palette rows currently visible; empty when the palette is closed.
pub fn visible_entries(state: &AppState) -> Vec<CommandEntry> {
    match &state.ui.overlay {
        Overlay::Palette { query, .. } => {
            filter_entries(command_entries(state), query)
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/palette.rs"]
mod tests;
