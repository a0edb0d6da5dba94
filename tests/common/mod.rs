#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const SCENARIO_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<database>
    <jdbcUrl>jdbc:test</jdbcUrl>
    <username>alice</username>
    <paths>
        <schema>schema</schema>
    </paths>
</database>
"#;

/// A `dbpatch` invocation isolated from the caller's environment.
pub fn dbpatch(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("dbpatch");
    cmd.current_dir(cwd).env("NO_COLOR", "1").env_remove("RUST_LOG");
    for var in [
        "DBPATCH_CONFIG",
        "DBPATCH_JDBC_URL",
        "DBPATCH_USERNAME",
        "DBPATCH_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

pub fn write_descriptor(dir: &Path, name: &str, body: &str, dirs: &[&str]) -> PathBuf {
    for sub in dirs {
        fs::create_dir_all(dir.join(sub)).expect("create dir");
    }
    let path = dir.join(name);
    fs::write(&path, body).expect("write descriptor");
    path
}

pub fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json")
}
