use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_VAR: &str = "DBPATCH_CONFIG";
pub const JDBC_URL_VAR: &str = "DBPATCH_JDBC_URL";
pub const USERNAME_VAR: &str = "DBPATCH_USERNAME";
pub const PASSWORD_VAR: &str = "DBPATCH_PASSWORD";

#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Snapshot of the process environment. Already-set variables win over the
    /// file. A missing default `.env` is ignored; a named file must load.
    pub fn from_system(env_file: Option<&Path>) -> Result<Self, dotenvy::Error> {
        match env_file {
            Some(path) => dotenvy::from_path(path)?,
            None => {
                let _ = dotenvy::dotenv();
            }
        }
        let vars = std::env::vars().collect();
        Ok(Self { vars })
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut vars = HashMap::new();
        for (k, v) in pairs {
            vars.insert((*k).to_string(), (*v).to_string());
        }
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn named_env_file_must_exist() {
        let dir = TempDir::new().expect("tempdir");
        let result = Env::from_system(Some(&dir.path().join("missing.env")));
        assert!(result.is_err());
    }

    #[test]
    fn from_pairs_looks_up_keys() {
        let env = Env::from_pairs(&[(USERNAME_VAR, "alice")]);
        assert_eq!(env.get(USERNAME_VAR).as_deref(), Some("alice"));
        assert!(env.get(PASSWORD_VAR).is_none());
    }
}
