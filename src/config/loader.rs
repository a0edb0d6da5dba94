use std::path::PathBuf;

use super::env::{CONFIG_VAR, Env, JDBC_URL_VAR, PASSWORD_VAR, USERNAME_VAR};
use super::resolver::{ConfigResolver, Overrides, ResolvedConfiguration};
use crate::diagnostics::DiagnosticsSink;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "database.xml";

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub jdbc_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn resolve_config_path(cli: &CliOverrides, env: &Env) -> PathBuf {
    if let Some(path) = &cli.config_path {
        return path.clone();
    }
    if let Some(path) = env.get(CONFIG_VAR) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Flags take precedence over environment variables.
pub fn resolve_overrides(cli: &CliOverrides, env: &Env) -> Overrides {
    Overrides {
        jdbc_url: cli.jdbc_url.clone().or_else(|| env.get(JDBC_URL_VAR)),
        username: cli.username.clone().or_else(|| env.get(USERNAME_VAR)),
        password: cli.password.clone().or_else(|| env.get(PASSWORD_VAR)),
    }
}

pub fn load_config(
    cli: &CliOverrides,
    env: &Env,
    sink: &dyn DiagnosticsSink,
) -> Result<ResolvedConfiguration, ConfigError> {
    let config_path = resolve_config_path(cli, env);
    let overrides = resolve_overrides(cli, env);
    tracing::debug!(path = %config_path.display(), "resolving configuration");
    ConfigResolver::new(sink).resolve(&config_path, &overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::TranscriptSink;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("database.xml");
        fs::write(
            &path,
            "<database><jdbcUrl>jdbc:file</jdbcUrl><username>file-user</username></database>",
        )
        .expect("write config");
        path
    }

    #[test]
    fn config_path_defaults_to_database_xml() {
        let env = Env::from_pairs(&[]);
        let path = resolve_config_path(&CliOverrides::default(), &env);
        assert_eq!(path, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn config_path_from_env() {
        let env = Env::from_pairs(&[(CONFIG_VAR, "/etc/dbpatch/database.xml")]);
        let path = resolve_config_path(&CliOverrides::default(), &env);
        assert_eq!(path, PathBuf::from("/etc/dbpatch/database.xml"));

        let cli = CliOverrides {
            config_path: Some(PathBuf::from("local.xml")),
            ..CliOverrides::default()
        };
        assert_eq!(resolve_config_path(&cli, &env), PathBuf::from("local.xml"));
    }

    #[test]
    fn cli_overrides_env_overrides_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir);

        let cli = CliOverrides {
            config_path: Some(path),
            username: Some("cli-user".to_string()),
            ..CliOverrides::default()
        };
        let env = Env::from_pairs(&[
            (USERNAME_VAR, "env-user"),
            (JDBC_URL_VAR, "jdbc:env"),
        ]);
        let sink = TranscriptSink::new();
        let resolved = load_config(&cli, &env, &sink).expect("load config");

        assert_eq!(resolved.username(), "cli-user");
        assert_eq!(resolved.jdbc_url(), "jdbc:env");
        assert_eq!(resolved.password(), "");
    }

    #[test]
    fn env_password_is_marked_overridden() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_config(&dir);

        let cli = CliOverrides {
            config_path: Some(path),
            ..CliOverrides::default()
        };
        let env = Env::from_pairs(&[(PASSWORD_VAR, "env-secret")]);
        let sink = TranscriptSink::new();
        let resolved = load_config(&cli, &env, &sink).expect("load config");

        assert_eq!(resolved.password(), "env-secret");
        assert!(sink.labels().contains(&"Password (overridden)".to_string()));
    }
}
