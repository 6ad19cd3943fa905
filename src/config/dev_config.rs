use crate::core::worktree_port::{
    DEFAULT_BACKEND_BASE_PORT, DEFAULT_FRONTEND_BASE_PORT, MAX_BASE_PORT,
};
use crate::utils::error::{DevToolsError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "deck-devtools.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_DATABASE_PATH: &str = "backend/instance/database.db";
pub const DEFAULT_FIXTURES_DIR: &str = "frontend/e2e/fixtures";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default)]
    pub ports: PortsConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortsConfig {
    pub backend_base: Option<u16>,
    pub frontend_base: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// 指定後端位址時不再用 worktree port 推算
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    pub uploads_dir: Option<String>,
    pub database_path: Option<String>,
    pub fixtures_dir: Option<String>,
    pub idea_prompt: Option<String>,
}

impl DevConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DevToolsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DevToolsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BACKEND_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DevToolsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn backend_base_port(&self) -> u16 {
        self.ports.backend_base.unwrap_or(DEFAULT_BACKEND_BASE_PORT)
    }

    pub fn frontend_base_port(&self) -> u16 {
        self.ports.frontend_base.unwrap_or(DEFAULT_FRONTEND_BASE_PORT)
    }

    pub fn backend_url(&self) -> Option<&str> {
        self.backend.url.as_deref()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.backend.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn uploads_dir(&self) -> &str {
        self.seed.uploads_dir.as_deref().unwrap_or(DEFAULT_UPLOADS_DIR)
    }

    pub fn database_path(&self) -> &str {
        self.seed
            .database_path
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_PATH)
    }

    pub fn fixtures_dir(&self) -> &str {
        self.seed.fixtures_dir.as_deref().unwrap_or(DEFAULT_FIXTURES_DIR)
    }

    pub fn idea_prompt(&self) -> &str {
        self.seed
            .idea_prompt
            .as_deref()
            .unwrap_or(crate::core::seed::DEFAULT_IDEA_PROMPT)
    }
}

impl Validate for DevConfig {
    fn validate(&self) -> Result<()> {
        validate_range("ports.backend_base", self.backend_base_port(), 1, MAX_BASE_PORT)?;
        validate_range(
            "ports.frontend_base",
            self.frontend_base_port(),
            1,
            MAX_BASE_PORT,
        )?;

        if let Some(url) = self.backend_url() {
            validate_url("backend.url", url)?;
        }
        validate_positive_number("backend.timeout_seconds", self.timeout_seconds(), 1)?;

        validate_path("seed.uploads_dir", self.uploads_dir())?;
        validate_path("seed.database_path", self.database_path())?;
        validate_path("seed.fixtures_dir", self.fixtures_dir())?;
        validate_non_empty_string("seed.idea_prompt", self.idea_prompt())?;

        Ok(())
    }
}
