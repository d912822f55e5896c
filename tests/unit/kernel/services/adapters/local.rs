use super::*;
use std::time::Duration;
use tempfile::tempdir;

fn workspace(root: &Path) -> LocalWorkspace {
    LocalWorkspace::new(root, Duration::from_secs(5))
}

#[test]
fn test_missing_root_has_no_projects() {
    let dir = tempdir().unwrap();
    let ws = workspace(&dir.path().join("absent"));
    assert!(ws.list_projects().unwrap().is_empty());
}

#[test]
fn test_project_lifecycle() {
    let dir = tempdir().unwrap();
    let ws = workspace(dir.path());

    ws.create_project("beta").unwrap();
    ws.create_project("alpha").unwrap();
    assert_eq!(ws.list_projects().unwrap(), vec!["alpha", "beta"]);

    assert!(matches!(
        ws.create_project("alpha"),
        Err(WorkspaceError::AlreadyExists(_))
    ));

    ws.delete_project("alpha").unwrap();
    assert_eq!(ws.list_projects().unwrap(), vec!["beta"]);
    assert!(matches!(
        ws.delete_project("alpha"),
        Err(WorkspaceError::NotFound(_))
    ));
}

#[test]
fn test_nested_files_use_forward_slashes() {
    let dir = tempdir().unwrap();
    let ws = workspace(dir.path());
    ws.create_project("demo").unwrap();

    ws.write_file("demo", "src/util/mod.py", "x = 1").unwrap();
    ws.write_file("demo", "main.py", "").unwrap();

    assert_eq!(
        ws.list_files("demo").unwrap(),
        vec!["main.py", "src/util/mod.py"]
    );
    assert_eq!(ws.read_file("demo", "src/util/mod.py").unwrap(), "x = 1");
}

#[test]
fn test_read_and_delete_missing_file() {
    let dir = tempdir().unwrap();
    let ws = workspace(dir.path());
    ws.create_project("demo").unwrap();

    assert!(matches!(
        ws.read_file("demo", "nope.py"),
        Err(WorkspaceError::NotFound(message)) if message == "File not found"
    ));
    assert!(matches!(
        ws.delete_file("demo", "nope.py"),
        Err(WorkspaceError::NotFound(_))
    ));
    assert!(matches!(
        ws.read_file("ghost", "a.py"),
        Err(WorkspaceError::NotFound(message)) if message == "Project not found"
    ));
}

#[test]
fn test_paths_cannot_escape_project() {
    let dir = tempdir().unwrap();
    let ws = workspace(dir.path());
    ws.create_project("demo").unwrap();

    assert!(ws.write_file("demo", "../outside.py", "").is_err());
    assert!(ws.write_file("demo", "/etc/passwd", "").is_err());
    assert!(ws.create_project("a/b").is_err());
    assert!(!dir.path().join("outside.py").exists());
}

#[test]
fn test_execute_rejects_unsupported_type() {
    let dir = tempdir().unwrap();
    let ws = workspace(dir.path());
    ws.create_project("demo").unwrap();
    ws.write_file("demo", "notes.txt", "hello").unwrap();

    let err = ws.execute("demo", "notes.txt", "").unwrap_err();
    assert_eq!(err.to_string(), "Unsupported file type");

    assert!(matches!(
        ws.execute("demo", "missing.py", ""),
        Err(WorkspaceError::NotFound(_))
    ));
}

#[test]
fn test_interpreter_by_extension() {
    assert_eq!(interpreter_for("a.py"), Some("python3"));
    assert_eq!(interpreter_for("dir/b.JS"), Some("node"));
    assert_eq!(interpreter_for("Makefile"), None);
}

fn has_python() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

#[test]
fn test_execute_large_output_before_reading_stdin() {
    if !has_python() {
        return;
    }
    let dir = tempdir().unwrap();
    let ws = workspace(dir.path());
    ws.create_project("demo").unwrap();
    ws.write_file(
        "demo",
        "echo.py",
        "import sys\n\
         sys.stdout.write('x' * 200000)\n\
         sys.stdout.flush()\n\
         data = sys.stdin.read()\n\
         sys.stdout.write('\\n%d' % len(data))\n",
    )
    .unwrap();

    let input = "y".repeat(200_000);
    let started = Instant::now();
    let output = ws.execute("demo", "echo.py", &input).unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(output.stdout.ends_with("\n200000"));
    assert_eq!(output.stdout.len(), 200_000 + "\n200000".len());
}

#[test]
fn test_execute_times_out() {
    if !has_python() {
        return;
    }
    let dir = tempdir().unwrap();
    let ws = LocalWorkspace::new(dir.path(), Duration::from_millis(300));
    ws.create_project("demo").unwrap();
    ws.write_file("demo", "slow.py", "import time\ntime.sleep(30)\n")
        .unwrap();

    let err = ws.execute("demo", "slow.py", "").unwrap_err();
    assert_eq!(err.to_string(), "Execution timed out");
}
