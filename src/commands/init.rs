use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{CliArgs, InitArgs};
use crate::commands::common;
use crate::config::{DEFAULT_CONFIG_FILE, PASSWORD_VAR, PathRole};
use crate::error::{AppError, ErrorKind};
use crate::output::{OutputFormat, json as json_out};

pub fn run(args: &CliArgs, cmd: &InitArgs) -> Result<()> {
    let format = common::output_format(args);
    let target = resolve_target_path(cmd.path.as_deref());

    if target.exists() && !cmd.force {
        return Err(AppError::new(
            ErrorKind::Usage,
            format!("Configuration already exists: {}", target.display()),
        )
        .into());
    }

    let base = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&base)
        .with_context(|| format!("Failed to create directory: {}", base.display()))?;

    let mut created = Vec::new();
    for role in PathRole::ALL {
        let dir = base.join(role.as_str());
        if !dir.is_dir() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            created.push(dir.display().to_string());
        }
    }

    fs::write(&target, render_descriptor_template())
        .with_context(|| format!("Failed to write configuration: {}", target.display()))?;
    tracing::info!(path = %target.display(), "wrote configuration descriptor");

    if args.quiet {
        return Ok(());
    }

    if matches!(format, OutputFormat::Json) {
        let payload = json!({
            "path": target.display().to_string(),
            "created": true,
            "overwritten": cmd.force,
            "directories": created,
        });
        println!("{}", json_out::emit_json_value(&payload, true)?);
    } else {
        println!("Wrote configuration to {}", target.display());
        for dir in &created {
            println!("Created directory {}", dir);
        }
    }

    Ok(())
}

fn resolve_target_path(path: Option<&Path>) -> PathBuf {
    match path {
        Some(path)
            if path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml")) =>
        {
            path.to_path_buf()
        }
        Some(path) => path.join(DEFAULT_CONFIG_FILE),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

fn render_descriptor_template() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- dbpatch configuration. Paths are relative to this file's directory. -->
<!-- The password may be left out and supplied on the command line or through {password_var}. -->
<database>
    <jdbcUrl>jdbc:postgresql://localhost:5432/postgres</jdbcUrl>
    <username>postgres</username>
    <paths>
        <schema>schema</schema>
        <functions>functions</functions>
        <triggers>triggers</triggers>
        <scripts>scripts</scripts>
    </paths>
</database>
"#,
        password_var = PASSWORD_VAR
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigResolver, Overrides};
    use crate::diagnostics::TranscriptSink;
    use tempfile::TempDir;

    #[test]
    fn directory_target_gets_default_file_name() {
        let target = resolve_target_path(Some(Path::new("deploy")));
        assert_eq!(target, Path::new("deploy").join(DEFAULT_CONFIG_FILE));
        let target = resolve_target_path(Some(Path::new("deploy/prod.xml")));
        assert_eq!(target, PathBuf::from("deploy/prod.xml"));
    }

    #[test]
    fn template_resolves_once_directories_exist() {
        let dir = TempDir::new().expect("tempdir");
        for role in PathRole::ALL {
            fs::create_dir(dir.path().join(role.as_str())).expect("create dir");
        }
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, render_descriptor_template()).expect("write template");

        let sink = TranscriptSink::new();
        let resolved = ConfigResolver::new(&sink)
            .resolve(&path, &Overrides::default())
            .expect("template resolves");
        assert_eq!(resolved.username(), "postgres");
        assert!(PathRole::ALL.iter().all(|role| resolved.path(*role).is_some()));
    }
}
