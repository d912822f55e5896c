use super::*;
use crate::kernel::search::Span;
use crate::kernel::services::adapters::{run_effect, MemoryWorkspace, WorkspaceOp};
use crate::kernel::services::ports::{ExecutionOutput, WorkspaceBackend};
use crate::kernel::state::PendingAction;
use crate::kernel::SessionError;

fn new_store() -> Store {
    Store::new(AppState::new())
}

/// Runs every effect of `result` against `backend`, feeding completions
/// back until nothing is left to do.
fn settle(store: &mut Store, backend: &MemoryWorkspace, result: DispatchResult) {
    let mut queue: std::collections::VecDeque<Effect> = result.effects.into();
    while let Some(effect) = queue.pop_front() {
        let completion = run_effect(backend, effect);
        queue.extend(store.dispatch(completion).effects);
    }
}

fn dispatch(store: &mut Store, backend: &MemoryWorkspace, action: Action) {
    let result = store.dispatch(action);
    settle(store, backend, result);
}

fn demo_backend() -> MemoryWorkspace {
    MemoryWorkspace::new()
        .with_project(
            "demo",
            &[("main.py", "print('hi')\nprint('hi')\n"), ("lib/util.js", "x")],
        )
        .with_project("other", &[("a.py", "a")])
}

fn opened(path: &str) -> (Store, MemoryWorkspace) {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::LoadProjects);
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    dispatch(&mut store, &backend, Action::OpenFile(path.into()));
    (store, backend)
}

fn status_message(store: &Store) -> &str {
    store
        .state
        .ui
        .status
        .as_ref()
        .map(|s| s.message.as_str())
        .unwrap_or("")
}

#[test]
fn select_project_lists_files_and_resets_session() {
    let (mut store, backend) = opened("main.py");
    assert_eq!(store.state.session.open_paths, vec!["main.py"]);

    dispatch(&mut store, &backend, Action::SelectProject("other".into()));
    assert_eq!(store.state.session.project.as_deref(), Some("other"));
    assert!(store.state.session.open_paths.is_empty());
    assert!(store.state.session.active_path.is_none());
    assert!(store.state.session.buffers.is_empty());
    assert_eq!(store.state.session.files, vec!["a.py"]);
    assert_eq!(status_message(&store), "Project other selected");
}

#[test]
fn open_file_reads_once_and_reuses_buffer() {
    let (mut store, backend) = opened("main.py");
    assert_eq!(backend.read_count("demo", "main.py"), 1);
    assert_eq!(store.state.session.active_path(), Some("main.py"));

    dispatch(&mut store, &backend, Action::OpenFile("lib/util.js".into()));
    dispatch(&mut store, &backend, Action::OpenFile("main.py".into()));
    assert_eq!(backend.read_count("demo", "main.py"), 1);
    assert_eq!(store.state.session.active_path(), Some("main.py"));
    assert_eq!(store.state.session.open_paths.len(), 2);
}

#[test]
fn reopening_closed_tab_keeps_unsaved_edits() {
    let (mut store, backend) = opened("main.py");
    dispatch(
        &mut store,
        &backend,
        Action::Edit {
            path: "main.py".into(),
            text: "edited".into(),
        },
    );
    dispatch(&mut store, &backend, Action::CloseFile("main.py".into()));
    assert!(store.state.session.open_paths.is_empty());
    assert!(store.state.session.active_path.is_none());

    let result = store.dispatch(Action::OpenFile("main.py".into()));
    assert!(result.effects.is_empty());
    assert_eq!(store.state.session.active_text(), Some("edited"));
    assert_eq!(backend.read_count("demo", "main.py"), 1);
}

#[test]
fn open_file_without_project_is_rejected() {
    let mut store = new_store();
    let result = store.dispatch(Action::OpenFile("main.py".into()));
    assert!(result.effects.is_empty());
    assert_eq!(status_message(&store), "Select a project first");
}

#[test]
fn failed_read_leaves_tabs_untouched() {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    backend.fail_next(WorkspaceOp::ReadFile, "disk gone");
    dispatch(&mut store, &backend, Action::OpenFile("main.py".into()));

    assert!(store.state.session.open_paths.is_empty());
    assert!(store.state.session.buffers.is_empty());
    let status = store.state.ui.status.as_ref().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.message, "disk gone");
}

#[test]
fn edit_on_unopened_path_reports_not_open() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::Edit {
        path: "ghost.py".into(),
        text: "x".into(),
    });
    assert_eq!(status_message(&store), "ghost.py is not open");
}

#[test]
fn save_persists_snapshot_and_clears_dirty() {
    let (mut store, backend) = opened("main.py");
    dispatch(
        &mut store,
        &backend,
        Action::Edit {
            path: "main.py".into(),
            text: "print(1)".into(),
        },
    );
    assert_eq!(store.state.session.dirty_paths(), vec!["main.py"]);

    dispatch(&mut store, &backend, Action::RunCommand(Command::Save));
    assert_eq!(backend.file("demo", "main.py").as_deref(), Some("print(1)"));
    assert!(store.state.session.dirty_paths().is_empty());
    assert_eq!(status_message(&store), "File saved");
}

#[test]
fn edits_after_save_request_stay_dirty() {
    let (mut store, backend) = opened("main.py");
    store.dispatch(Action::Edit {
        path: "main.py".into(),
        text: "first".into(),
    });
    let save = store.dispatch(Action::RunCommand(Command::Save));
    store.dispatch(Action::Edit {
        path: "main.py".into(),
        text: "second".into(),
    });
    settle(&mut store, &backend, save);

    assert_eq!(backend.file("demo", "main.py").as_deref(), Some("first"));
    assert_eq!(store.state.session.active_text(), Some("second"));
    assert!(store.state.session.buffers.dirty("main.py"));
}

#[test]
fn failed_save_keeps_buffer_dirty() {
    let (mut store, backend) = opened("main.py");
    store.dispatch(Action::Edit {
        path: "main.py".into(),
        text: "changed".into(),
    });
    backend.fail_next(WorkspaceOp::WriteFile, "read-only");
    dispatch(&mut store, &backend, Action::RunCommand(Command::Save));

    assert!(store.state.session.buffers.dirty("main.py"));
    assert_eq!(status_message(&store), "read-only");
}

#[test]
fn save_without_active_file_is_rejected() {
    let mut store = new_store();
    let result = store.dispatch(Action::RunCommand(Command::Save));
    assert!(result.effects.is_empty());
    assert_eq!(status_message(&store), "Select a file first");
}

#[test]
fn create_file_opens_empty_tab_and_refreshes() {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    dispatch(&mut store, &backend, Action::RunCommand(Command::NewFile));
    assert!(store.state.ui.prompt.is_some());

    store.dispatch(Action::PromptSetText("/src/new.py".into()));
    dispatch(&mut store, &backend, Action::RunCommand(Command::NewFile));

    assert!(store.state.ui.prompt.is_none());
    assert_eq!(store.state.session.active_path(), Some("src/new.py"));
    assert_eq!(store.state.session.active_text(), Some(""));
    assert!(store.state.session.files.contains(&"src/new.py".to_string()));
    assert_eq!(backend.file("demo", "src/new.py").as_deref(), Some(""));
}

#[test]
fn create_file_validation_skips_collaborator() {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));

    store.dispatch(Action::OpenPrompt(PromptKind::NewFile));
    store.dispatch(Action::PromptSetText("  ".into()));
    assert!(store.dispatch(Action::PromptSubmit).effects.is_empty());
    assert_eq!(status_message(&store), "File name is required");

    store.dispatch(Action::PromptSetText("main.py".into()));
    assert!(store.dispatch(Action::PromptSubmit).effects.is_empty());
    assert_eq!(status_message(&store), "File already exists");

    store.dispatch(Action::PromptSetText("main.py/inner.py".into()));
    assert!(store.dispatch(Action::PromptSubmit).effects.is_empty());
    let status = store.state.ui.status.as_ref().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert!(store.state.ui.prompt.is_some());
}

#[test]
fn delete_file_needs_confirmation() {
    let (mut store, backend) = opened("main.py");
    let result = store.dispatch(Action::RunCommand(Command::DeleteFile));
    assert!(result.effects.is_empty());
    assert_eq!(
        store.state.ui.overlay.pending(),
        Some(&PendingAction::DeleteFile {
            project: "demo".into(),
            path: "main.py".into(),
        })
    );

    dispatch(&mut store, &backend, Action::RunCommand(Command::CancelPending));
    assert_eq!(store.state.ui.overlay, Overlay::None);
    assert!(backend.file("demo", "main.py").is_some());

    dispatch(&mut store, &backend, Action::RunCommand(Command::DeleteFile));
    dispatch(&mut store, &backend, Action::RunCommand(Command::ConfirmPending));
    assert!(backend.file("demo", "main.py").is_none());
    assert!(store.state.session.open_paths.is_empty());
    assert!(store.state.session.active_path.is_none());
    assert!(!store.state.session.buffers.contains("main.py"));
    assert_eq!(store.state.session.files, vec!["lib/util.js"]);

    backend.write_file("demo", "main.py", "print('new')").unwrap();
    dispatch(&mut store, &backend, Action::OpenFile("main.py".into()));
    assert_eq!(backend.read_count("demo", "main.py"), 2);
    assert_eq!(store.state.session.active_text(), Some("print('new')"));
    assert!(!store.state.session.buffers.dirty("main.py"));
}

#[test]
fn new_confirm_request_replaces_pending_one() {
    let (mut store, backend) = opened("main.py");
    dispatch(&mut store, &backend, Action::RequestDeleteFile("main.py".into()));
    dispatch(&mut store, &backend, Action::RequestDeleteFile("lib/util.js".into()));
    assert_eq!(
        store.state.ui.overlay.pending(),
        Some(&PendingAction::DeleteFile {
            project: "demo".into(),
            path: "lib/util.js".into(),
        })
    );

    dispatch(&mut store, &backend, Action::RunCommand(Command::ConfirmPending));
    assert!(backend.file("demo", "lib/util.js").is_none());
    assert!(backend.file("demo", "main.py").is_some());
    assert_eq!(store.state.session.active_path(), Some("main.py"));
    assert_eq!(store.state.ui.overlay, Overlay::None);

    dispatch(&mut store, &backend, Action::RequestDeleteFile("main.py".into()));
    dispatch(&mut store, &backend, Action::RequestDeleteProject("other".into()));
    dispatch(&mut store, &backend, Action::RunCommand(Command::ConfirmPending));
    assert!(backend.file("demo", "main.py").is_some());
    assert_eq!(store.state.projects, vec!["demo"]);
}

#[test]
fn delete_current_project_clears_session() {
    let (mut store, backend) = opened("main.py");
    dispatch(&mut store, &backend, Action::RunCommand(Command::DeleteProject));
    dispatch(&mut store, &backend, Action::RunCommand(Command::ConfirmPending));

    assert!(store.state.session.project.is_none());
    assert!(store.state.session.open_paths.is_empty());
    assert_eq!(store.state.projects, vec!["other"]);
    assert_eq!(status_message(&store), "Project deleted");
}

#[test]
fn create_project_validates_and_refreshes() {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::LoadProjects);

    store.dispatch(Action::OpenPrompt(PromptKind::NewProject));
    store.dispatch(Action::PromptSetText("demo".into()));
    assert!(store.dispatch(Action::PromptSubmit).effects.is_empty());
    assert_eq!(status_message(&store), "Project already exists");

    store.dispatch(Action::PromptSetText("a/b".into()));
    assert!(store.dispatch(Action::PromptSubmit).effects.is_empty());
    assert_eq!(status_message(&store), "Invalid project name");

    store.dispatch(Action::PromptSetText("fresh".into()));
    dispatch(&mut store, &backend, Action::PromptSubmit);
    assert!(store.state.ui.prompt.is_none());
    assert!(store.state.projects.contains(&"fresh".to_string()));
}

#[test]
fn stale_completion_is_dropped() {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    let read = store.dispatch(Action::OpenFile("main.py".into()));
    dispatch(&mut store, &backend, Action::SelectProject("other".into()));
    settle(&mut store, &backend, read);

    assert!(store.state.session.open_paths.is_empty());
    assert!(!store.state.session.buffers.contains("main.py"));
}

#[test]
fn run_reports_output_and_clears_running() {
    let (mut store, backend) = opened("main.py");
    store.dispatch(Action::SetStdin("42".into()));
    let result = store.dispatch(Action::RunCommand(Command::Run));
    assert!(store.state.ui.running);
    assert_eq!(
        store.state.ui.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Running)
    );
    assert_eq!(
        result.effects,
        vec![Effect::Execute {
            project: "demo".into(),
            path: "main.py".into(),
            stdin: "42".into(),
        }]
    );

    settle(&mut store, &backend, result);
    assert!(!store.state.ui.running);
    assert_eq!(store.state.ui.output.as_deref(), Some("42"));
    assert_eq!(status_message(&store), "Execution finished");
}

#[test]
fn failed_run_shows_error_as_output() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::RunCommand(Command::Run));
    store.dispatch(Action::ExecutionFinished {
        project: "demo".into(),
        path: "main.py".into(),
        result: Err(SessionError::Io("boom".into())),
    });
    assert!(!store.state.ui.running);
    assert_eq!(store.state.ui.output.as_deref(), Some("boom"));
    assert_eq!(
        store.state.ui.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Error)
    );

    store.dispatch(Action::ExecutionFinished {
        project: "demo".into(),
        path: "main.py".into(),
        result: Ok(ExecutionOutput {
            stdout: "ok".into(),
        }),
    });
    assert_eq!(store.state.ui.output.as_deref(), Some("ok"));
}

#[test]
fn palette_and_search_overlays_are_exclusive() {
    let mut store = new_store();
    store.dispatch(Action::RunCommand(Command::ToggleSearchPanel));
    assert_eq!(store.state.ui.overlay, Overlay::Search);

    store.dispatch(Action::RunCommand(Command::OpenCommandPalette));
    assert!(store.state.ui.overlay.is_palette());
    assert!(store.state.ui.overlay.search_visible());

    store.dispatch(Action::RunCommand(Command::Escape));
    assert_eq!(store.state.ui.overlay, Overlay::Search);

    store.dispatch(Action::RunCommand(Command::Escape));
    assert_eq!(store.state.ui.overlay, Overlay::None);
}

#[test]
fn escape_does_not_dismiss_confirmation() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::RunCommand(Command::DeleteFile));
    let result = store.dispatch(Action::RunCommand(Command::Escape));
    assert!(!result.state_changed);
    assert!(store.state.ui.overlay.pending().is_some());

    store.dispatch(Action::RunCommand(Command::OpenCommandPalette));
    assert!(store.state.ui.overlay.pending().is_some());
}

#[test]
fn palette_confirm_runs_selected_entry() {
    let backend = demo_backend();
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    store.dispatch(Action::RunCommand(Command::OpenCommandPalette));
    store.dispatch(Action::PaletteSetQuery("create file".into()));
    store.dispatch(Action::RunCommand(Command::PaletteConfirm));

    assert_eq!(store.state.ui.overlay, Overlay::None);
    assert_eq!(
        store.state.ui.prompt.as_ref().map(|p| p.kind),
        Some(PromptKind::NewFile)
    );
}

#[test]
fn palette_skips_disabled_entries() {
    let mut store = new_store();
    store.dispatch(Action::RunCommand(Command::OpenCommandPalette));
    store.dispatch(Action::PaletteSetQuery("save".into()));
    let result = store.dispatch(Action::RunCommand(Command::PaletteConfirm));

    assert!(!result.state_changed);
    assert!(store.state.ui.overlay.is_palette());
}

#[test]
fn palette_selection_is_clamped() {
    let mut store = new_store();
    store.dispatch(Action::RunCommand(Command::OpenCommandPalette));
    store.dispatch(Action::RunCommand(Command::PaletteMoveUp));
    for _ in 0..20 {
        store.dispatch(Action::RunCommand(Command::PaletteMoveDown));
    }
    let Overlay::Palette { selected, .. } = store.state.ui.overlay else {
        panic!("palette closed");
    };
    assert_eq!(selected, 6);

    store.dispatch(Action::PaletteSetQuery("project".into()));
    let Overlay::Palette { selected, .. } = store.state.ui.overlay else {
        panic!("palette closed");
    };
    assert_eq!(selected, 0);
}

#[test]
fn toggle_search_seeds_query_from_selection() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::SetSelection(Some(Span::new(0, 5))));
    store.dispatch(Action::RunCommand(Command::ToggleSearchPanel));
    assert_eq!(store.state.search.query, "print");
}

#[test]
fn find_next_walks_matches_and_wraps() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::SearchSetQuery("print".into()));

    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(store.state.ui.selection, Some(Span::new(0, 5)));
    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(store.state.ui.selection, Some(Span::new(12, 17)));
    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(store.state.ui.selection, Some(Span::new(0, 5)));
}

#[test]
fn find_next_restarts_after_switching_back() {
    let backend = MemoryWorkspace::new().with_project(
        "demo",
        &[("a.txt", "x hello hello"), ("b.txt", "other")],
    );
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    dispatch(&mut store, &backend, Action::OpenFile("a.txt".into()));
    store.dispatch(Action::SearchSetQuery("hello".into()));
    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(store.state.ui.selection, Some(Span::new(2, 7)));

    dispatch(&mut store, &backend, Action::OpenFile("b.txt".into()));
    dispatch(&mut store, &backend, Action::OpenFile("a.txt".into()));
    assert_eq!(store.state.search.last_match_index(Some("a.txt")), None);

    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(store.state.ui.selection, Some(Span::new(2, 7)));
}

#[test]
fn closing_active_tab_resets_search_mark() {
    let backend = MemoryWorkspace::new().with_project(
        "demo",
        &[("a.txt", "x hello hello"), ("b.txt", "hello")],
    );
    let mut store = new_store();
    dispatch(&mut store, &backend, Action::SelectProject("demo".into()));
    dispatch(&mut store, &backend, Action::OpenFile("a.txt".into()));
    dispatch(&mut store, &backend, Action::OpenFile("b.txt".into()));
    store.dispatch(Action::SearchSetQuery("hello".into()));
    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(store.state.search.last_match_index(Some("b.txt")), Some(0));

    store.dispatch(Action::RunCommand(Command::CloseTab));
    assert_eq!(store.state.session.active_path(), Some("a.txt"));
    assert_eq!(store.state.search.last_match_index(Some("b.txt")), None);
}

#[test]
fn find_next_reports_missing_query() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::SearchSetQuery("absent".into()));
    store.dispatch(Action::RunCommand(Command::FindNext));
    assert_eq!(status_message(&store), "No matches found");
    assert!(store.state.ui.selection.is_none());
}

#[test]
fn replace_next_selects_then_replaces() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::SearchSetQuery("print".into()));
    store.dispatch(Action::SearchSetReplacement("echo".into()));

    store.dispatch(Action::RunCommand(Command::ReplaceNext));
    assert_eq!(store.state.ui.selection, Some(Span::new(0, 5)));
    assert_eq!(
        store.state.session.active_text(),
        Some("print('hi')\nprint('hi')\n")
    );

    store.dispatch(Action::RunCommand(Command::ReplaceNext));
    assert_eq!(
        store.state.session.active_text(),
        Some("echo('hi')\nprint('hi')\n")
    );
    assert_eq!(store.state.ui.selection, Some(Span::new(4, 4)));
}

#[test]
fn replace_next_with_cursor_replaces_immediately() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::SearchSetQuery("print".into()));
    store.dispatch(Action::SearchSetReplacement("echo".into()));
    store.dispatch(Action::SetSelection(Some(Span::new(3, 3))));

    store.dispatch(Action::RunCommand(Command::ReplaceNext));
    assert_eq!(
        store.state.session.active_text(),
        Some("print('hi')\necho('hi')\n")
    );
}

#[test]
fn replace_all_counts_and_marks_dirty() {
    let (mut store, _backend) = opened("main.py");
    store.dispatch(Action::SearchSetQuery("hi".into()));
    store.dispatch(Action::SearchSetReplacement("bye".into()));
    store.dispatch(Action::RunCommand(Command::ReplaceAll));

    assert_eq!(
        store.state.session.active_text(),
        Some("print('bye')\nprint('bye')\n")
    );
    assert_eq!(status_message(&store), "Replaced 2 matches");
    assert!(store.state.session.buffers.dirty("main.py"));
    assert!(store.state.ui.selection.is_none());
}

#[test]
fn switching_tabs_clears_selection() {
    let (mut store, backend) = opened("main.py");
    store.dispatch(Action::SetSelection(Some(Span::new(0, 5))));
    dispatch(&mut store, &backend, Action::OpenFile("lib/util.js".into()));
    assert!(store.state.ui.selection.is_none());
}

#[test]
fn projects_load_failure_only_sets_status() {
    let backend = demo_backend();
    let mut store = new_store();
    backend.fail_next(WorkspaceOp::ListProjects, "offline");
    dispatch(&mut store, &backend, Action::LoadProjects);
    assert!(store.state.projects.is_empty());
    assert_eq!(status_message(&store), "offline");
}

#[test]
fn completions_are_told_apart_from_user_actions() {
    assert!(Action::ProjectsLoaded(Ok(Vec::new())).is_completion());
    assert!(Action::FileDeleted {
        project: "demo".into(),
        path: "a.py".into(),
        result: Ok(()),
    }
    .is_completion());
    assert!(!Action::LoadProjects.is_completion());
    assert!(!Action::RunCommand(Command::Save).is_completion());
}
