use serde_json::json;

use crate::config::{PathRole, ResolvedConfiguration};
use crate::diagnostics::{NOT_SET, REDACTED};

pub fn emit_json_value(value: &serde_json::Value, pretty: bool) -> anyhow::Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

pub fn error_json(message: &str, kind: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "kind": kind,
        }
    })
}

pub fn password_display(resolved: &ResolvedConfiguration) -> &'static str {
    if resolved.password().is_empty() {
        NOT_SET
    } else {
        REDACTED
    }
}

pub fn config_to_json(resolved: &ResolvedConfiguration) -> serde_json::Value {
    let mut paths = serde_json::Map::new();
    for role in PathRole::ALL {
        let value = resolved
            .path(role)
            .map(|path| serde_json::Value::String(path.display().to_string()))
            .unwrap_or(serde_json::Value::Null);
        paths.insert(role.as_str().to_string(), value);
    }

    json!({
        "configPath": resolved.config_path().display().to_string(),
        "jdbcUrl": resolved.jdbc_url(),
        "username": resolved.username(),
        "password": password_display(resolved),
        "basePath": resolved.base_path().display().to_string(),
        "paths": paths,
    })
}
