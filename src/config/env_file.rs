use crate::utils::error::{DevToolsError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ENV_FILE_NAME: &str = ".env";

/// Variables from the project-root `.env`. Process environment wins over the
/// file, the same precedence the dev server uses.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: Option<PathBuf>,
    vars: HashMap<String, String>,
    use_process_env: bool,
}

impl EnvFile {
    /// Loads `<project_root>/.env`; a missing file yields an empty set.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(ENV_FILE_NAME);
        if !path.is_file() {
            tracing::debug!("No {} at {}", ENV_FILE_NAME, project_root.display());
            return Ok(Self::empty());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let iter = dotenv::from_path_iter(path).map_err(|e| DevToolsError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| DevToolsError::ConfigError {
                message: format!("invalid line in {}: {}", path.display(), e),
            })?;
            vars.insert(key, value);
        }
        tracing::debug!("Loaded {} variable(s) from {}", vars.len(), path.display());

        Ok(Self {
            path: Some(path.to_path_buf()),
            vars,
            use_process_env: true,
        })
    }

    pub fn empty() -> Self {
        Self {
            path: None,
            vars: HashMap::new(),
            use_process_env: true,
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: None,
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            use_process_env: true,
        }
    }

    /// Only consult the file. Used by tests so the caller's shell can't leak in.
    pub fn without_process_env(mut self) -> Self {
        self.use_process_env = false;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file_value(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if self.use_process_env {
            if let Ok(value) = std::env::var(key) {
                return Some(value);
            }
        }
        self.vars.get(key).cloned()
    }
}
