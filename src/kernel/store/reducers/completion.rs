use crate::kernel::state::{PromptKind, StatusKind};
use crate::kernel::store::{DispatchResult, Store};
use crate::kernel::{Action, Effect};

impl Store {
    /// Applies the answer to an effect. A failure only updates the status
    /// line; answers for a project that is no longer selected are dropped.
    pub(in crate::kernel::store) fn reduce_completion(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::ProjectsLoaded(result) => match result {
                Ok(projects) => {
                    self.state.projects = projects;
                    DispatchResult::changed(true)
                }
                Err(err) => {
                    self.report_error("list_projects", &err, None);
                    DispatchResult::changed(true)
                }
            },
            Action::FilesLoaded { project, result } => {
                if !self.is_current(&project, "list_files") {
                    return DispatchResult::unchanged();
                }
                match result {
                    Ok(files) => self.state.session.files = files,
                    Err(err) => self.report_error("list_files", &err, None),
                }
                DispatchResult::changed(true)
            }
            Action::FileLoaded {
                project,
                path,
                result,
            } => {
                if !self.is_current(&project, "read_file") {
                    return DispatchResult::unchanged();
                }
                match result {
                    Ok(text) => {
                        let opened = self.state.session.buffers.open(&path, |_| Ok(text)).map(|_| ());
                        if let Err(err) = opened {
                            self.report_error("read_file", &err, Some(&path));
                            return DispatchResult::changed(true);
                        }
                        if !self.state.session.is_open(&path) {
                            self.state.session.open_paths.push(path.clone());
                        }
                        self.set_active(Some(path));
                    }
                    Err(err) => self.report_error("read_file", &err, Some(&path)),
                }
                DispatchResult::changed(true)
            }
            Action::FileSaved {
                project,
                path,
                text,
                result,
            } => {
                if !self.is_current(&project, "write_file") {
                    return DispatchResult::unchanged();
                }
                match result {
                    Ok(()) => {
                        // The buffer may have been discarded by a delete in the meantime.
                        if self.state.session.buffers.mark_persisted_as(&path, &text).is_ok() {
                            tracing::info!(project = %project, path = %path, "file saved");
                        }
                        self.set_status(StatusKind::Success, "File saved", Some(&path));
                    }
                    Err(err) => self.report_error("write_file", &err, Some(&path)),
                }
                DispatchResult::changed(true)
            }
            Action::FileCreated {
                project,
                path,
                result,
            } => {
                if !self.is_current(&project, "create_file") {
                    return DispatchResult::unchanged();
                }
                if let Err(err) = result {
                    self.report_error("create_file", &err, Some(&path));
                    return DispatchResult::changed(true);
                }

                tracing::info!(project = %project, path = %path, "file created");
                let session = &mut self.state.session;
                if !session.files.contains(&path) {
                    session.files.push(path.clone());
                }
                session.buffers.discard(&path);
                let opened = session.buffers.open(&path, |_| Ok(String::new())).map(|_| ());
                if let Err(err) = opened {
                    self.report_error("create_file", &err, Some(&path));
                    return DispatchResult::changed(true);
                }
                if !self.state.session.is_open(&path) {
                    self.state.session.open_paths.push(path.clone());
                }
                self.set_active(Some(path.clone()));
                self.close_prompt(PromptKind::NewFile);
                self.set_status(StatusKind::Success, "File created", Some(&path));
                DispatchResult::with_effect(Effect::ListFiles { project }, true)
            }
            Action::FileDeleted {
                project,
                path,
                result,
            } => {
                if !self.is_current(&project, "delete_file") {
                    return DispatchResult::unchanged();
                }
                if let Err(err) = result {
                    self.report_error("delete_file", &err, Some(&path));
                    return DispatchResult::changed(true);
                }

                tracing::info!(project = %project, path = %path, "file deleted");
                let session = &mut self.state.session;
                session.buffers.discard(&path);
                session.open_paths.retain(|p| p != &path);
                session.files.retain(|p| p != &path);
                if session.active_path.as_deref() == Some(path.as_str()) {
                    self.set_active(None);
                }
                self.set_status(StatusKind::Success, "File deleted", Some(&path));
                DispatchResult::with_effect(Effect::ListFiles { project }, true)
            }
            Action::ProjectCreated { name, result } => {
                if let Err(err) = result {
                    self.report_error("create_project", &err, None);
                    return DispatchResult::changed(true);
                }

                tracing::info!(project = %name, "project created");
                self.close_prompt(PromptKind::NewProject);
                self.set_status(StatusKind::Success, "Project created", None);
                DispatchResult::with_effect(Effect::ListProjects, true)
            }
            Action::ProjectDeleted { name, result } => {
                if let Err(err) = result {
                    self.report_error("delete_project", &err, None);
                    return DispatchResult::changed(true);
                }

                tracing::info!(project = %name, "project deleted");
                self.state.projects.retain(|p| p != &name);
                if self.state.session.is_current_project(&name) {
                    self.state.session.project = None;
                    self.state.session.reset();
                    self.state.search.clear_match();
                    self.state.ui.selection = None;
                    self.state.ui.output = None;
                    self.state.ui.running = false;
                }
                self.set_status(StatusKind::Success, "Project deleted", None);
                DispatchResult::with_effect(Effect::ListProjects, true)
            }
            Action::ExecutionFinished {
                project,
                path,
                result,
            } => {
                if !self.is_current(&project, "execute") {
                    return DispatchResult::unchanged();
                }
                self.state.ui.running = false;
                match result {
                    Ok(output) => {
                        self.state.ui.output = Some(output.stdout);
                        self.set_status(StatusKind::Success, "Execution finished", Some(&path));
                    }
                    Err(err) => {
                        self.state.ui.output = Some(err.to_string());
                        self.report_error("execute", &err, Some(&path));
                    }
                }
                DispatchResult::changed(true)
            }
            _ => unreachable!("non-completion action passed to reduce_completion"),
        }
    }

    fn is_current(&self, project: &str, op: &'static str) -> bool {
        let current = self.state.session.is_current_project(project);
        if !current {
            tracing::debug!(op, project, "dropping completion for inactive project");
        }
        current
    }
}
