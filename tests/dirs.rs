use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn treesim(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_treesim"))
        .args(args)
        .current_dir(cwd)
        .env_remove("TREESIM_LOG")
        .output()
        .unwrap()
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "old/a.py", "def f():\n    return 1\n");
    write(dir.path(), "new/a.py", "def f():\n    return 1  # comment\n");
    write(dir.path(), "new/b.py", "x = 1\n");
    dir
}

#[test]
fn dirs_prints_notices_then_table() {
    let dir = fixture();
    let output = treesim(dir.path(), &["dirs", "old", "new"]);
    assert!(
        output.status.success(),
        "treesim dirs failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let notice_at = stdout.find("b.py is a new file in the updated version.").unwrap();
    let header_at = stdout.find("Name of the file").unwrap();
    assert!(notice_at < header_at);
    assert!(stdout.contains("Similarity (Ratio)"));
    assert!(stdout.lines().any(|l| l.starts_with("a.py") && l.contains("100.00")));
    assert!(stdout.lines().any(|l| l.starts_with("Total")));
}

#[test]
fn dirs_json_output_parses() {
    let dir = fixture();
    let output = treesim(
        dir.path(),
        &["dirs", "old", "new", "--format", "json", "--method", "distance"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["method"], "distance");
    assert_eq!(value["rows"][0]["key"], "a.py");
    assert_eq!(value["rows"][1]["status"], "added");
    assert_eq!(value["total"]["lines"], 3);
}

#[test]
fn dirs_with_nothing_to_compare_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("old")).unwrap();
    fs::create_dir_all(dir.path().join("new")).unwrap();

    let output = treesim(dir.path(), &["dirs", "old", "new"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No matching files found."));
}

#[test]
fn dirs_reads_filters_from_config_file() {
    let dir = fixture();
    fs::write(
        dir.path().join(".treesim.toml"),
        "[filter]\nexclude = [\"b.py\"]\n",
    )
    .unwrap();

    let output = treesim(dir.path(), &["dirs", "old", "new"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("b.py"));
}

#[test]
fn conflicting_patterns_fail() {
    let dir = fixture();
    let output = treesim(
        dir.path(),
        &["dirs", "old", "new", "--exclude", "*.py", "--include", "a.py"],
    );
    assert!(!output.status.success());
}
