#[cfg(feature = "cli")]
pub mod cli;
pub mod dev_config;
pub mod env_file;

use crate::adapters::{HttpBackend, SqliteStore};
use crate::core::seed::SeedOptions;
use crate::core::worktree_port::{detect_project_root, parse_port_override, PortOverrides, PortResolver};
use crate::domain::model::{PortPair, WorktreeIdentity};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use dev_config::{DevConfig, CONFIG_FILE_NAME};
use env_file::EnvFile;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const BACKEND_PORT_VAR: &str = "BACKEND_PORT";
pub const FRONTEND_PORT_VAR: &str = "FRONTEND_PORT";

/// Everything the tools know about one checkout: its root, worktree name,
/// `.env` and optional `deck-devtools.toml`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    worktree: WorktreeIdentity,
    env: EnvFile,
    config: DevConfig,
}

impl Workspace {
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let env = EnvFile::load(&root)?;

        let config = match config_path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                DevConfig::from_file(path)?
            }
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if default_path.is_file() {
                    tracing::debug!("Loading configuration from {}", default_path.display());
                    DevConfig::from_file(&default_path)?
                } else {
                    DevConfig::default()
                }
            }
        };
        config.validate()?;

        Ok(Self::from_parts(root, env, config))
    }

    /// Starts from the current directory, stepping out of `frontend/`.
    pub fn discover(config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load(&detect_project_root(&cwd), config_path)
    }

    pub fn from_parts(root: PathBuf, env: EnvFile, config: DevConfig) -> Self {
        let worktree = WorktreeIdentity::from_project_root(&root);
        Self {
            root,
            worktree,
            env,
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn worktree(&self) -> &WorktreeIdentity {
        &self.worktree
    }

    pub fn config(&self) -> &DevConfig {
        &self.config
    }

    pub fn env(&self) -> &EnvFile {
        &self.env
    }

    pub fn port_overrides(&self) -> PortOverrides {
        PortOverrides {
            backend: parse_port_override(
                BACKEND_PORT_VAR,
                self.env.get(BACKEND_PORT_VAR).as_deref(),
            ),
            frontend: parse_port_override(
                FRONTEND_PORT_VAR,
                self.env.get(FRONTEND_PORT_VAR).as_deref(),
            ),
        }
    }

    pub fn port_resolver(&self) -> PortResolver {
        PortResolver::new(self.worktree.clone()).with_bases(
            self.config.backend_base_port(),
            self.config.frontend_base_port(),
        )
    }

    pub fn ports(&self) -> Result<PortPair> {
        self.port_resolver().resolve(self.port_overrides())
    }

    pub fn backend_url(&self) -> Result<String> {
        match self.config.backend_url() {
            Some(url) => Ok(url.trim_end_matches('/').to_string()),
            None => Ok(self.ports()?.backend_url()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds())
    }

    pub fn http_backend(&self) -> Result<HttpBackend> {
        HttpBackend::new(&self.backend_url()?, self.timeout())
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve_path(self.config.database_path())
    }

    pub fn fixture_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(self.database_path())
    }

    pub fn seed_options(&self) -> SeedOptions {
        SeedOptions {
            uploads_dir: self.resolve_path(self.config.uploads_dir()),
            fixtures_dir: self.resolve_path(self.config.fixtures_dir()),
            idea_prompt: self.config.idea_prompt().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PortSource;

    fn workspace(name: &str, env: EnvFile) -> Workspace {
        Workspace::from_parts(
            PathBuf::from(format!("/nonexistent/{}", name)),
            env.without_process_env(),
            DevConfig::default(),
        )
    }

    #[test]
    fn test_ports_derived_without_overrides() {
        let ws = workspace("myproject", EnvFile::empty());
        let ports = ws.ports().unwrap();

        assert_eq!(ports.backend.port, 5394);
        assert_eq!(ports.frontend.port, 3394);
        assert_eq!(ports.backend.source, PortSource::Derived);
        assert_eq!(ws.backend_url().unwrap(), "http://localhost:5394");
    }

    #[test]
    fn test_env_overrides_win() {
        let ws = workspace(
            "myproject",
            EnvFile::from_vars([("BACKEND_PORT", "5000"), ("FRONTEND_PORT", "3001")]),
        );
        let ports = ws.ports().unwrap();

        assert_eq!(ports.backend.port, 5000);
        assert_eq!(ports.backend.source, PortSource::Override);
        assert_eq!(ports.frontend.port, 3001);
    }

    #[test]
    fn test_invalid_frontend_override_falls_back() {
        let ws = workspace(
            "myproject",
            EnvFile::from_vars([("FRONTEND_PORT", "not-a-port")]),
        );
        let ports = ws.ports().unwrap();
        assert_eq!(ports.frontend.port, 3394);
        assert_eq!(ports.frontend.source, PortSource::Derived);
    }

    #[test]
    fn test_relative_seed_paths_resolve_against_root() {
        let ws = workspace("myproject", EnvFile::empty());
        let options = ws.seed_options();
        assert_eq!(options.uploads_dir, PathBuf::from("/nonexistent/myproject/uploads"));
        assert_eq!(
            ws.database_path(),
            PathBuf::from("/nonexistent/myproject/backend/instance/database.db")
        );
    }
}
