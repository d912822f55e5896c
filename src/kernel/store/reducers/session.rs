use crate::kernel::error::SessionError;
use crate::kernel::state::{Overlay, PendingAction, StatusKind};
use crate::kernel::store::{DispatchResult, Store};
use crate::kernel::{Action, Effect};
use crate::models::{normalize_path, PathTree};

impl Store {
    pub(in crate::kernel::store) fn reduce_session_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::SelectProject(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return DispatchResult::unchanged();
                }

                tracing::info!(project = %name, "select project");
                self.state.session.project = Some(name.clone());
                self.state.session.reset();
                self.state.search.clear_match();
                self.state.ui.selection = None;
                self.state.ui.output = None;
                self.state.ui.running = false;
                self.set_status(
                    StatusKind::Success,
                    format!("Project {name} selected"),
                    None,
                );
                DispatchResult::with_effect(Effect::ListFiles { project: name }, true)
            }
            Action::OpenFile(path) => {
                let Some(project) = self.state.session.project.clone() else {
                    return self.report_validation("Select a project first");
                };

                if self.state.session.is_open(&path) {
                    return DispatchResult::changed(self.set_active(Some(path)));
                }

                if self.state.session.buffers.contains(&path) {
                    self.state.session.open_paths.push(path.clone());
                    self.set_active(Some(path));
                    return DispatchResult::changed(true);
                }

                tracing::debug!(project = %project, path = %path, "load file");
                DispatchResult::with_effect(Effect::ReadFile { project, path }, false)
            }
            Action::CloseFile(path) => {
                let was_active = self.state.session.active_path.as_deref() == Some(path.as_str());
                if !self.state.session.remove_tab(&path) {
                    return DispatchResult::unchanged();
                }
                if was_active {
                    self.forget_cursor();
                }
                DispatchResult::changed(true)
            }
            Action::Edit { path, text } => {
                if let Err(err) = self.state.session.buffers.edit(&path, text) {
                    self.report_error("edit", &err, Some(&path));
                }
                DispatchResult::changed(true)
            }
            Action::SetSelection(selection) => {
                if self.state.session.active_path.is_none() || self.state.ui.selection == selection
                {
                    return DispatchResult::unchanged();
                }
                self.state.ui.selection = selection;
                DispatchResult::changed(true)
            }
            Action::SaveFile(path) => self.save_file(path),
            Action::RequestDeleteFile(path) => self.request_delete_file(path),
            Action::RequestDeleteProject(name) => self.request_delete_project(name),
            Action::ToggleFolder { path, depth } => {
                self.state.session.expansion.toggle(&path, depth);
                DispatchResult::changed(true)
            }
            Action::SetStdin(stdin) => {
                self.state.ui.stdin = stdin;
                DispatchResult::changed(true)
            }
            _ => unreachable!("non-session action passed to reduce_session_action"),
        }
    }

    pub(in crate::kernel::store) fn save_file(&mut self, path: String) -> DispatchResult {
        let Some(project) = self.state.session.project.clone() else {
            return self.report_validation("Select a file first");
        };
        let Some(text) = self.state.session.buffers.text(&path).map(str::to_string) else {
            self.report_error("save", &SessionError::not_open(&path), Some(&path));
            return DispatchResult::changed(true);
        };

        tracing::debug!(project = %project, path = %path, "save file");
        DispatchResult::with_effect(Effect::WriteFile { project, path, text }, false)
    }

    pub(in crate::kernel::store) fn run_active(&mut self) -> DispatchResult {
        let (Some(project), Some(path)) = (
            self.state.session.project.clone(),
            self.state.session.active_path.clone(),
        ) else {
            return self.report_validation("Select a file first");
        };

        self.state.ui.running = true;
        self.set_status(StatusKind::Running, "Running...", Some(&path));
        let stdin = self.state.ui.stdin.clone();
        DispatchResult::with_effect(
            Effect::Execute {
                project,
                path,
                stdin,
            },
            true,
        )
    }

    pub(in crate::kernel::store) fn request_delete_file(&mut self, path: String) -> DispatchResult {
        let Some(project) = self.state.session.project.clone() else {
            return self.report_validation("Select a project first");
        };
        self.state.ui.overlay = Overlay::ConfirmPending(PendingAction::DeleteFile { project, path });
        DispatchResult::changed(true)
    }

    pub(in crate::kernel::store) fn request_delete_project(&mut self, name: String) -> DispatchResult {
        if name.trim().is_empty() {
            return DispatchResult::unchanged();
        }
        self.state.ui.overlay = Overlay::ConfirmPending(PendingAction::DeleteProject { name });
        DispatchResult::changed(true)
    }

    pub(in crate::kernel::store) fn confirm_pending(&mut self) -> DispatchResult {
        if self.state.ui.overlay.pending().is_none() {
            return DispatchResult::unchanged();
        }
        let Overlay::ConfirmPending(pending) = std::mem::take(&mut self.state.ui.overlay) else {
            return DispatchResult::unchanged();
        };

        let effect = match pending {
            PendingAction::DeleteFile { project, path } => Effect::DeleteFile { project, path },
            PendingAction::DeleteProject { name } => Effect::DeleteProject { name },
        };
        DispatchResult::with_effect(effect, true)
    }

    /// Validates a new file name against the current project before any
    /// collaborator call.
    pub(in crate::kernel::store) fn create_file(&mut self, name: &str) -> DispatchResult {
        let Some(project) = self.state.session.project.clone() else {
            return self.report_validation("Select a project first");
        };
        let Some(path) = normalize_path(name.trim()) else {
            return self.report_validation("File name is required");
        };

        if self.state.session.files.iter().any(|f| f == &path) {
            self.report_error(
                "create_file",
                &SessionError::Conflict("File already exists".to_string()),
                Some(&path),
            );
            return DispatchResult::changed(true);
        }

        let candidate = self
            .state
            .session
            .files
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(path.as_str()));
        if let Err(err) = PathTree::build(candidate) {
            return self.report_validation(&err.to_string());
        }

        DispatchResult::with_effect(Effect::CreateFile { project, path }, false)
    }

    pub(in crate::kernel::store) fn create_project(&mut self, name: &str) -> DispatchResult {
        let name = name.trim();
        if name.is_empty() {
            return self.report_validation("Project name is required");
        }
        if name.contains('/') || name == "." || name == ".." {
            return self.report_validation("Invalid project name");
        }
        if self.state.projects.iter().any(|p| p == name) {
            self.report_error(
                "create_project",
                &SessionError::Conflict("Project already exists".to_string()),
                None,
            );
            return DispatchResult::changed(true);
        }

        DispatchResult::with_effect(
            Effect::CreateProject {
                name: name.to_string(),
            },
            false,
        )
    }
}
