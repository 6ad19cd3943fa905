use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Base name of the working-copy directory. Only ever used as hash input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorktreeIdentity(String);

impl WorktreeIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 取專案根目錄的最後一段作為 worktree 名稱
    pub fn from_project_root(root: &Path) -> Self {
        let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let name = resolved
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorktreeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSource {
    /// Explicitly configured (process env or project `.env`).
    Override,
    /// base port + worktree hash offset.
    Derived,
}

impl fmt::Display for PortSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSource::Override => f.write_str("override"),
            PortSource::Derived => f.write_str("derived"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortAssignment {
    pub port: u16,
    pub source: PortSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPair {
    pub backend: PortAssignment,
    pub frontend: PortAssignment,
}

impl PortPair {
    pub fn backend_url(&self) -> String {
        format!("http://localhost:{}", self.backend.port)
    }

    pub fn preview_url(&self, project_id: &str) -> String {
        format!(
            "http://localhost:{}/project/{}/preview",
            self.frontend.port, project_id
        )
    }
}

/// Common `{ success, data, ... }` wrapper used by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl<T> ApiEnvelope<T> {
    pub fn error_message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        match &self.error {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Object(obj)) => obj
                .get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportImagesData {
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url_absolute: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    Jpeg,
    Zip,
    Other(String),
}

impl ExportKind {
    pub fn from_url(url: &str) -> Self {
        // 去掉 query / fragment 再看副檔名
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = path
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" => ExportKind::Jpeg,
            "zip" => ExportKind::Zip,
            _ => ExportKind::Other(ext),
        }
    }

    pub fn expected_content_type(&self) -> Option<&'static str> {
        match self {
            ExportKind::Jpeg => Some("image/jpeg"),
            ExportKind::Zip => Some("application/zip"),
            ExportKind::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub project_id: String,
    pub download_url: String,
    pub download_url_absolute: Option<String>,
    pub kind: ExportKind,
}

impl ExportResult {
    pub fn new(project_id: &str, data: ExportImagesData) -> Self {
        let kind = ExportKind::from_url(&data.download_url);
        Self {
            project_id: project_id.to_string(),
            download_url: data.download_url,
            download_url_absolute: data.download_url_absolute,
            kind,
        }
    }

    /// `/files/{project_id}/exports/` is where the backend writes export artifacts.
    pub fn points_under_exports(&self) -> bool {
        let prefix = format!("/files/{}/exports/", self.project_id);
        self.download_url.contains(&prefix)
    }

    pub fn file_name(&self) -> &str {
        let path = self
            .download_url
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.download_url);
        path.rsplit('/').next().unwrap_or(path)
    }
}

#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    pub fn has_content_type(&self, expected: &str) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains(expected))
            .unwrap_or(false)
    }

    pub fn is_jpeg(&self) -> bool {
        self.has_content_type("image/jpeg")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub creation_type: String,
    pub idea_prompt: String,
    pub template_style: String,
}

impl CreateProjectRequest {
    pub fn idea(prompt: &str) -> Self {
        Self {
            creation_type: "idea".to_string(),
            idea_prompt: prompt.to_string(),
            template_style: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineContent {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePageRequest {
    pub order_index: usize,
    pub outline_content: OutlineContent,
}

impl CreatePageRequest {
    pub fn slide(order_index: usize) -> Self {
        Self {
            order_index,
            outline_content: OutlineContent {
                title: format!("Slide {}", order_index + 1),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProject {
    pub project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub page_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeededProject {
    pub project_id: String,
    pub page_ids: Vec<String>,
}

pub const PAGE_STATUS_COMPLETED: &str = "COMPLETED";
pub const PROJECT_STATUS_IMAGES_GENERATED: &str = "IMAGES_GENERATED";
