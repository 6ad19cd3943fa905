use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevToolsError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Project {project_id} has no exportable image (HTTP {status}): {message}")]
    NoExportableImages {
        project_id: String,
        status: u16,
        message: String,
    },

    #[error("HTTP {status} from {endpoint}: {message}")]
    HttpStatusError {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    ResponseError { endpoint: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Port out of range: base {base_port} + offset {offset} exceeds 65535")]
    PortOutOfRange { base_port: u16, offset: u16 },

    #[error("Seeding error: {message}")]
    SeedError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Client,
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DevToolsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DevToolsError::ApiError(_) | DevToolsError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            DevToolsError::NoExportableImages { .. } => ErrorCategory::Client,
            DevToolsError::ConfigError { .. }
            | DevToolsError::InvalidConfigValueError { .. }
            | DevToolsError::ConfigValidationError { .. }
            | DevToolsError::PortOutOfRange { .. }
            | DevToolsError::UrlError(_) => ErrorCategory::Configuration,
            DevToolsError::SerializationError(_)
            | DevToolsError::ResponseError { .. }
            | DevToolsError::ZipError(_) => ErrorCategory::Data,
            DevToolsError::IoError(_)
            | DevToolsError::DatabaseError(_)
            | DevToolsError::SeedError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 客戶端錯誤：專案狀態需要先修正，不自動重試
            DevToolsError::NoExportableImages { .. } => ErrorSeverity::Medium,
            DevToolsError::ApiError(_) | DevToolsError::HttpStatusError { .. } => {
                ErrorSeverity::Medium
            }
            DevToolsError::ResponseError { .. }
            | DevToolsError::SerializationError(_)
            | DevToolsError::ZipError(_)
            | DevToolsError::SeedError { .. } => ErrorSeverity::High,
            DevToolsError::IoError(_) | DevToolsError::DatabaseError(_) => ErrorSeverity::High,
            DevToolsError::ConfigError { .. }
            | DevToolsError::InvalidConfigValueError { .. }
            | DevToolsError::ConfigValidationError { .. }
            | DevToolsError::PortOutOfRange { .. }
            | DevToolsError::UrlError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether the failure came from the backend rejecting the request itself.
    pub fn is_client_error(&self) -> bool {
        match self {
            DevToolsError::NoExportableImages { .. } => true,
            DevToolsError::HttpStatusError { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DevToolsError::NoExportableImages { .. } => {
                "Generate slide images first (or run `deck-devtools seed`), then re-query the project before exporting again"
            }
            DevToolsError::ApiError(_) | DevToolsError::HttpStatusError { .. } => {
                "Check that the backend is running on the resolved port (`deck-devtools ports`)"
            }
            DevToolsError::ResponseError { .. } | DevToolsError::SerializationError(_) => {
                "The backend answered with an unexpected payload; check backend logs and API version"
            }
            DevToolsError::ConfigError { .. }
            | DevToolsError::InvalidConfigValueError { .. }
            | DevToolsError::ConfigValidationError { .. }
            | DevToolsError::UrlError(_) => {
                "Review .env and deck-devtools.toml in the project root"
            }
            DevToolsError::PortOutOfRange { .. } => {
                "Lower the base port so that base + 499 stays below 65536"
            }
            DevToolsError::DatabaseError(_) => {
                "Make sure the backend database exists and has been migrated"
            }
            DevToolsError::IoError(_) | DevToolsError::SeedError { .. } => {
                "Verify uploads and fixture directories exist and are writable"
            }
            DevToolsError::ZipError(_) => "The downloaded archive is corrupt; export again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DevToolsError::NoExportableImages { project_id, .. } => {
                format!("Project {} has no generated images to export", project_id)
            }
            DevToolsError::ApiError(e) if e.is_connect() => {
                "Cannot reach the backend".to_string()
            }
            DevToolsError::ApiError(e) if e.is_timeout() => {
                "The backend did not answer in time".to_string()
            }
            DevToolsError::PortOutOfRange { base_port, .. } => {
                format!("Base port {} is too high for worktree ports", base_port)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DevToolsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_exportable_images_is_client_error() {
        let err = DevToolsError::NoExportableImages {
            project_id: "p1".to_string(),
            status: 400,
            message: "No images".to_string(),
        };

        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Client);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("p1"));
    }

    #[test]
    fn test_server_error_is_not_client_error() {
        let err = DevToolsError::HttpStatusError {
            endpoint: "/api/projects".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        };

        assert!(!err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = DevToolsError::PortOutOfRange {
            base_port: 65500,
            offset: 42,
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
