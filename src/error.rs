use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::config::PathRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidConfiguration,
    MissingRequiredValue,
    PathNotFound,
    PathResolution,
    Usage,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InvalidConfiguration => "InvalidConfiguration",
            ErrorKind::MissingRequiredValue => "MissingRequiredValue",
            ErrorKind::PathNotFound => "PathNotFound",
            ErrorKind::PathResolution => "PathResolutionFailure",
            ErrorKind::Usage => "Usage",
            ErrorKind::Internal => "Internal",
        }
    }
}

/// Failure to establish the tool's configuration. Every filesystem or parser
/// error raised while resolving is translated into one of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not find configuration file '{}'", .path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading '{}' - {cause}", .path.display())]
    InvalidConfiguration { path: PathBuf, cause: String },

    #[error("Empty {field}")]
    MissingRequiredValue { field: &'static str },

    #[error("Could not find {role} path '{}'", .path.display())]
    PathNotFound { role: PathRole, path: PathBuf },

    #[error("Error attempting to resolve path '{}': {source}", .path.display())]
    PathResolutionFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            ConfigError::MissingRequiredValue { .. } => ErrorKind::MissingRequiredValue,
            ConfigError::PathNotFound { .. } => ErrorKind::PathNotFound,
            ConfigError::PathResolutionFailure { .. } => ErrorKind::PathResolution,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

pub fn classify_error(err: &anyhow::Error) -> ErrorKind {
    if let Some(config) = err.downcast_ref::<ConfigError>() {
        return config.kind();
    }
    if let Some(app) = err.downcast_ref::<AppError>() {
        return app.kind;
    }
    ErrorKind::Internal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_config_errors() {
        let err = anyhow::Error::new(ConfigError::MissingRequiredValue { field: "username" });
        assert_eq!(classify_error(&err), ErrorKind::MissingRequiredValue);
        assert_eq!(err.to_string(), "Empty username");
    }

    #[test]
    fn path_not_found_names_role_and_path() {
        let err = ConfigError::PathNotFound {
            role: PathRole::Triggers,
            path: PathBuf::from("/srv/db/triggers"),
        };
        assert_eq!(
            err.to_string(),
            "Could not find triggers path '/srv/db/triggers'"
        );
        assert_eq!(err.kind().as_str(), "PathNotFound");
    }

    #[test]
    fn unknown_errors_are_internal() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(classify_error(&err), ErrorKind::Internal);
    }
}
