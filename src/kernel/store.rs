use crate::core::Command;
use crate::kernel::error::SessionError;

use super::state::{Overlay, PromptKind, StatusKind, StatusLine};
use super::{Action, AppState, Effect};

mod reducers;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    pub fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    pub fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    pub fn with_effect(effect: Effect, state_changed: bool) -> Self {
        Self {
            effects: vec![effect],
            state_changed,
        }
    }

    pub fn merge(&mut self, other: DispatchResult) {
        self.effects.extend(other.effects);
        self.state_changed |= other.state_changed;
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::RunCommand(cmd) => self.dispatch_command(cmd),
            Action::LoadProjects => DispatchResult::with_effect(Effect::ListProjects, false),
            action @ (Action::SelectProject(_)
            | Action::OpenFile(_)
            | Action::CloseFile(_)
            | Action::Edit { .. }
            | Action::SetSelection(_)
            | Action::SaveFile(_)
            | Action::RequestDeleteFile(_)
            | Action::RequestDeleteProject(_)
            | Action::ToggleFolder { .. }
            | Action::SetStdin(_)) => self.reduce_session_action(action),
            action @ (Action::OpenPrompt(_)
            | Action::PromptSetText(_)
            | Action::PromptSubmit
            | Action::PromptCancel) => self.reduce_prompt_action(action),
            action @ (Action::SearchSetQuery(_) | Action::SearchSetReplacement(_)) => {
                self.reduce_search_action(action)
            }
            action @ (Action::PaletteSetQuery(_) | Action::PaletteMoveSelection(_)) => {
                self.reduce_palette_action(action)
            }
            action if action.is_completion() => self.reduce_completion(action),
            action => {
                tracing::warn!(?action, "action has no reducer");
                DispatchResult::unchanged()
            }
        }
    }

    fn dispatch_command(&mut self, command: Command) -> DispatchResult {
        match command {
            Command::Save => match self.state.session.active_path.clone() {
                Some(path) => self.save_file(path),
                None => self.report_validation("Select a file first"),
            },
            Command::Run => self.run_active(),
            Command::NewFile => {
                let submit = self
                    .state
                    .ui
                    .prompt
                    .as_ref()
                    .is_some_and(|p| p.kind == PromptKind::NewFile && p.has_text());
                if submit {
                    self.reduce_prompt_action(Action::PromptSubmit)
                } else {
                    self.reduce_prompt_action(Action::OpenPrompt(PromptKind::NewFile))
                }
            }
            Command::NewProject => {
                self.reduce_prompt_action(Action::OpenPrompt(PromptKind::NewProject))
            }
            Command::DeleteFile => match self.state.session.active_path.clone() {
                Some(path) => self.request_delete_file(path),
                None => self.report_validation("Select a file first"),
            },
            Command::DeleteProject => match self.state.session.project.clone() {
                Some(name) => self.request_delete_project(name),
                None => DispatchResult::unchanged(),
            },
            Command::CloseTab => match self.state.session.active_path.clone() {
                Some(path) => self.reduce_session_action(Action::CloseFile(path)),
                None => DispatchResult::unchanged(),
            },
            Command::OpenCommandPalette => {
                let resume_search = match self.state.ui.overlay {
                    Overlay::Palette { .. } | Overlay::ConfirmPending(_) => {
                        return DispatchResult::unchanged();
                    }
                    Overlay::Search => true,
                    Overlay::None => false,
                };
                self.state.ui.overlay = Overlay::Palette {
                    query: String::new(),
                    selected: 0,
                    resume_search,
                };
                DispatchResult::changed(true)
            }
            Command::ToggleSearchPanel => self.toggle_search_panel(),
            Command::Escape => {
                let next = match &self.state.ui.overlay {
                    Overlay::Palette { resume_search, .. } => {
                        if *resume_search {
                            Overlay::Search
                        } else {
                            Overlay::None
                        }
                    }
                    Overlay::Search => Overlay::None,
                    Overlay::None | Overlay::ConfirmPending(_) => {
                        return DispatchResult::unchanged();
                    }
                };
                self.state.ui.overlay = next;
                DispatchResult::changed(true)
            }
            Command::ConfirmPending => self.confirm_pending(),
            Command::CancelPending => {
                if self.state.ui.overlay.pending().is_none() {
                    return DispatchResult::unchanged();
                }
                self.state.ui.overlay = Overlay::None;
                DispatchResult::changed(true)
            }
            Command::PaletteMoveUp => self.reduce_palette_action(Action::PaletteMoveSelection(-1)),
            Command::PaletteMoveDown => self.reduce_palette_action(Action::PaletteMoveSelection(1)),
            Command::PaletteConfirm => self.confirm_palette(),
            Command::FindNext => self.find_next(),
            Command::ReplaceNext => self.replace_next(),
            Command::ReplaceAll => self.replace_all(),
        }
    }

    fn toggle_search_panel(&mut self) -> DispatchResult {
        match self.state.ui.overlay {
            Overlay::Search => {
                self.state.ui.overlay = Overlay::None;
                DispatchResult::changed(true)
            }
            Overlay::None => {
                let seed = self.state.ui.selection.and_then(|span| {
                    let text = self.state.session.active_text()?;
                    span.slice(text)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                });
                if let Some(seed) = seed {
                    self.state.search.set_query(seed);
                }
                self.state.ui.overlay = Overlay::Search;
                DispatchResult::changed(true)
            }
            Overlay::Palette { .. } | Overlay::ConfirmPending(_) => DispatchResult::unchanged(),
        }
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>, path: Option<&str>) {
        self.state.ui.status = Some(StatusLine {
            kind,
            message: message.into(),
            path: path.map(str::to_string),
        });
    }

    fn report_error(&mut self, op: &'static str, err: &SessionError, path: Option<&str>) {
        tracing::warn!(op, path = path.unwrap_or(""), error = %err, "session operation failed");
        self.set_status(StatusKind::Error, err.to_string(), path);
    }

    fn report_validation(&mut self, message: &str) -> DispatchResult {
        self.report_error("validate", &SessionError::validation(message), None);
        DispatchResult::changed(true)
    }

    /// Makes `path` the active tab. The live selection and the last search
    /// match belong to the old document and are dropped.
    fn set_active(&mut self, path: Option<String>) -> bool {
        if self.state.session.active_path == path {
            return false;
        }
        self.state.session.active_path = path;
        self.forget_cursor();
        true
    }

    fn forget_cursor(&mut self) {
        self.state.ui.selection = None;
        self.state.search.clear_match();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
