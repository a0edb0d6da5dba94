mod common;

use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn config_command_emits_json() {
    let dir = TempDir::new().unwrap();
    let config = common::write_descriptor(
        dir.path(),
        "database.xml",
        common::SCENARIO_DESCRIPTOR,
        &["schema"],
    );

    let mut cmd = common::dbpatch(dir.path());
    cmd.args(["config", "--json"])
        .env("DBPATCH_CONFIG", &config)
        .env("DBPATCH_JDBC_URL", "jdbc:env")
        .env("DBPATCH_PASSWORD", "env-pass");
    let value = common::stdout_json(&mut cmd);

    assert_eq!(value["jdbcUrl"], "jdbc:env");
    assert_eq!(value["username"], "alice");
    assert_eq!(value["password"], "(value hidden)");
    assert!(value["paths"]["schema"].as_str().unwrap().ends_with("schema"));
    assert!(value["paths"]["functions"].is_null());
}

#[test]
fn flags_beat_environment() {
    let dir = TempDir::new().unwrap();
    common::write_descriptor(
        dir.path(),
        "database.xml",
        common::SCENARIO_DESCRIPTOR,
        &["schema"],
    );

    let mut cmd = common::dbpatch(dir.path());
    cmd.args(["config", "--json", "--username", "flag-user"])
        .env("DBPATCH_USERNAME", "env-user");
    let value = common::stdout_json(&mut cmd);
    assert_eq!(value["username"], "flag-user");
}

#[test]
fn config_command_renders_markdown_table() {
    let dir = TempDir::new().unwrap();
    common::write_descriptor(
        dir.path(),
        "database.xml",
        common::SCENARIO_DESCRIPTOR,
        &["schema"],
    );

    common::dbpatch(dir.path())
        .args(["config", "--markdown"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("jdbcUrl")
                .and(predicate::str::contains("schemaPath"))
                .and(predicate::str::contains("(not set)")),
        );
}

#[test]
fn env_file_supplies_password() {
    let dir = TempDir::new().unwrap();
    common::write_descriptor(
        dir.path(),
        "database.xml",
        common::SCENARIO_DESCRIPTOR,
        &["schema"],
    );
    std::fs::write(dir.path().join("patch.env"), "DBPATCH_PASSWORD=from-env-file\n").unwrap();

    let mut cmd = common::dbpatch(dir.path());
    cmd.args(["config", "--json", "--env-file", "patch.env"]);
    let value = common::stdout_json(&mut cmd);
    assert_eq!(value["password"], "(value hidden)");
}

#[test]
fn missing_named_env_file_fails() {
    let dir = TempDir::new().unwrap();
    common::write_descriptor(
        dir.path(),
        "database.xml",
        common::SCENARIO_DESCRIPTOR,
        &["schema"],
    );

    let output = common::dbpatch(dir.path())
        .args(["config", "--json", "--env-file", "absent.env"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(value["error"]["kind"], "Usage");
    assert!(
        value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("absent.env")
    );
}
