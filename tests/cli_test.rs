// tests/cli_test.rs
use std::process::Command;

fn chrn() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chrn"))
}

#[test]
fn test_help_lists_subcommands() {
    let output = chrn().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("changelog"));
    assert!(stdout.contains("note"));
    assert!(stdout.contains("rotate"));
}

#[test]
fn test_rotate_help_documents_flags() {
    let output = chrn().args(["rotate", "--help"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--bump"));
    assert!(stdout.contains("--version"));
}

#[test]
fn test_missing_repo_exits_with_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("chrn.toml");
    std::fs::write(&config, "").unwrap();

    let output = chrn()
        .current_dir(dir.path())
        .args(["note", "--file", "CHANGELOG.md", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--repo"));
}

#[test]
fn test_rotate_without_ssh_key_exits_with_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("chrn.toml");
    std::fs::write(
        &config,
        format!(
            "ssh_key = \"{}\"\n",
            dir.path().join("missing_key").display()
        ),
    )
    .unwrap();

    let output = chrn()
        .current_dir(dir.path())
        .args(["rotate", "--repo", "widgets", "--file", "CHANGELOG.md", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SSH key not found"));
}
