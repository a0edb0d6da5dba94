use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::schema::{DATABASE_SCHEMA, DeclaredPaths, RawConfiguration};
use super::validate::{DescriptorFormat, SchemaValidator};
use crate::diagnostics::{DiagnosticsSink, NOT_SET};
use crate::error::ConfigError;

const OVERRIDDEN_SUFFIX: &str = " (overridden)";

/// Logical role of a declared sub-path, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRole {
    Schema,
    Functions,
    Triggers,
    Scripts,
}

impl PathRole {
    pub const ALL: [PathRole; 4] = [
        PathRole::Schema,
        PathRole::Functions,
        PathRole::Triggers,
        PathRole::Scripts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PathRole::Schema => "schema",
            PathRole::Functions => "functions",
            PathRole::Triggers => "triggers",
            PathRole::Scripts => "scripts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PathRole::Schema => "Schema path",
            PathRole::Functions => "Functions path",
            PathRole::Triggers => "Triggers path",
            PathRole::Scripts => "Scripts path",
        }
    }

    fn declared(self, paths: &DeclaredPaths) -> Option<&str> {
        let value = match self {
            PathRole::Schema => &paths.schema,
            PathRole::Functions => &paths.functions,
            PathRole::Triggers => &paths.triggers,
            PathRole::Scripts => &paths.scripts,
        };
        value.as_deref()
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied values that win over the descriptor's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub jdbc_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated, path-checked configuration. Sub-paths, when present, are
/// canonical and referred to existing directories at resolution time.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    config_path: PathBuf,
    jdbc_url: String,
    username: String,
    password: String,
    base_path: PathBuf,
    schema_path: Option<PathBuf>,
    functions_path: Option<PathBuf>,
    triggers_path: Option<PathBuf>,
    scripts_path: Option<PathBuf>,
}

impl ResolvedConfiguration {
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn jdbc_url(&self) -> &str {
        &self.jdbc_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn schema_path(&self) -> Option<&Path> {
        self.schema_path.as_deref()
    }

    pub fn functions_path(&self) -> Option<&Path> {
        self.functions_path.as_deref()
    }

    pub fn triggers_path(&self) -> Option<&Path> {
        self.triggers_path.as_deref()
    }

    pub fn scripts_path(&self) -> Option<&Path> {
        self.scripts_path.as_deref()
    }

    pub fn path(&self, role: PathRole) -> Option<&Path> {
        match role {
            PathRole::Schema => self.schema_path(),
            PathRole::Functions => self.functions_path(),
            PathRole::Triggers => self.triggers_path(),
            PathRole::Scripts => self.scripts_path(),
        }
    }
}

impl fmt::Debug for ResolvedConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfiguration")
            .field("config_path", &self.config_path)
            .field("jdbc_url", &self.jdbc_url)
            .field("username", &self.username)
            .field("password", &crate::diagnostics::REDACTED)
            .field("base_path", &self.base_path)
            .field("schema_path", &self.schema_path)
            .field("functions_path", &self.functions_path)
            .field("triggers_path", &self.triggers_path)
            .field("scripts_path", &self.scripts_path)
            .finish()
    }
}

pub struct ConfigResolver<'a> {
    sink: &'a dyn DiagnosticsSink,
    validator: Option<&'a dyn SchemaValidator>,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(sink: &'a dyn DiagnosticsSink) -> Self {
        Self {
            sink,
            validator: None,
        }
    }

    /// Use `validator` for every descriptor instead of choosing one by file extension.
    pub fn with_validator(mut self, validator: &'a dyn SchemaValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Resolve the descriptor at `config_path`. Either every step succeeds or
    /// the first failure is returned; nothing on disk is modified.
    pub fn resolve(
        &self,
        config_path: &Path,
        overrides: &Overrides,
    ) -> Result<ResolvedConfiguration, ConfigError> {
        let config_file = locate_config_file(config_path)?;
        let raw = self.load_raw(config_path, &config_file)?;

        let Some(base_path) = config_file.parent().map(Path::to_path_buf) else {
            return Err(ConfigError::PathResolutionFailure {
                path: config_file,
                source: io::Error::other("configuration file has no parent directory"),
            });
        };

        self.sink
            .report("Configuration file", &config_file.display().to_string(), false);

        let jdbc_url = self.merge_value(
            "JDBC URL",
            raw.jdbc_url.as_deref(),
            overrides.jdbc_url.as_deref(),
            false,
        );
        let username = self.merge_value(
            "Username",
            raw.username.as_deref(),
            overrides.username.as_deref(),
            false,
        );
        let password = self.merge_value(
            "Password",
            raw.password.as_deref(),
            overrides.password.as_deref(),
            true,
        );

        if jdbc_url.trim().is_empty() {
            return Err(ConfigError::MissingRequiredValue { field: "JDBC URL" });
        }
        if username.trim().is_empty() {
            return Err(ConfigError::MissingRequiredValue { field: "username" });
        }

        self.sink
            .report("Base path", &base_path.display().to_string(), false);

        let mut resolved = [None, None, None, None];
        for (slot, role) in resolved.iter_mut().zip(PathRole::ALL) {
            *slot = self.resolve_sub_path(&base_path, role, role.declared(&raw.paths))?;
        }
        let [schema_path, functions_path, triggers_path, scripts_path] = resolved;

        Ok(ResolvedConfiguration {
            config_path: config_file,
            jdbc_url,
            username,
            password,
            base_path,
            schema_path,
            functions_path,
            triggers_path,
            scripts_path,
        })
    }

    fn load_raw(
        &self,
        config_path: &Path,
        config_file: &Path,
    ) -> Result<RawConfiguration, ConfigError> {
        let invalid = |cause: String| ConfigError::InvalidConfiguration {
            path: config_path.to_path_buf(),
            cause,
        };

        let text = fs::read_to_string(config_file).map_err(|err| invalid(err.to_string()))?;
        let validator = match self.validator {
            Some(validator) => validator,
            None => {
                let format = DescriptorFormat::from_path(config_file);
                tracing::debug!(format = format.as_str(), "selected descriptor format");
                format.validator()
            }
        };

        tracing::debug!(path = %config_file.display(), "validating configuration descriptor");
        validator
            .validate_and_parse(&text, &DATABASE_SCHEMA)
            .map_err(|err| invalid(err.to_string()))
    }

    fn merge_value(
        &self,
        label: &str,
        value: Option<&str>,
        override_value: Option<&str>,
        redact: bool,
    ) -> String {
        let (label, value) = match override_value {
            Some(value) => (format!("{}{}", label, OVERRIDDEN_SUFFIX), value),
            None => (label.to_string(), value.unwrap_or_default()),
        };
        let shown = if value.is_empty() { NOT_SET } else { value };
        self.sink.report(&label, shown, redact);
        value.to_string()
    }

    fn resolve_sub_path(
        &self,
        base_path: &Path,
        role: PathRole,
        declared: Option<&str>,
    ) -> Result<Option<PathBuf>, ConfigError> {
        let Some(declared) = declared else {
            return Ok(None);
        };

        let candidate = base_path.join(declared);
        tracing::debug!(role = role.as_str(), path = %candidate.display(), "checking declared path");

        let canonical = match fs::canonicalize(&candidate) {
            Ok(path) => path,
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                return Err(ConfigError::PathNotFound {
                    role,
                    path: candidate,
                });
            }
            Err(source) => {
                return Err(ConfigError::PathResolutionFailure {
                    path: candidate,
                    source,
                });
            }
        };

        if !canonical.is_dir() {
            return Err(ConfigError::PathNotFound {
                role,
                path: canonical,
            });
        }

        self.sink
            .report(role.label(), &canonical.display().to_string(), false);
        Ok(Some(canonical))
    }
}

fn locate_config_file(config_path: &Path) -> Result<PathBuf, ConfigError> {
    let not_found = || ConfigError::NotFound {
        path: config_path.to_path_buf(),
    };

    match fs::metadata(config_path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Err(not_found()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => {
            return Err(ConfigError::PathResolutionFailure {
                path: config_path.to_path_buf(),
                source,
            });
        }
    }

    fs::canonicalize(config_path).map_err(|source| ConfigError::PathResolutionFailure {
        path: config_path.to_path_buf(),
        source,
    })
}
