mod common;

use tempfile::TempDir;

#[test]
fn help_shows_core_commands_only() {
    let dir = TempDir::new().unwrap();
    let output = common::dbpatch(dir.path())
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);

    for name in ["check", "config", "init", "--jdbc-url", "--username", "--password"] {
        assert!(stdout.contains(name), "missing from help: {}", name);
    }
    assert!(
        !stdout.contains("completions"),
        "advanced command leaked into default help"
    );
}

#[test]
fn help_all_shows_advanced_commands() {
    let dir = TempDir::new().unwrap();
    let output = common::dbpatch(dir.path())
        .args(["help", "--all"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("completions"));
}

#[test]
fn help_for_unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    common::dbpatch(dir.path())
        .args(["help", "patch-everything"])
        .assert()
        .failure();
}
