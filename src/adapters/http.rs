use crate::domain::model::{
    ApiEnvelope, CreatePageRequest, CreateProjectRequest, CreatedPage, CreatedProject,
    DownloadedFile, ExportImagesData,
};
use crate::domain::ports::BackendApi;
use crate::utils::error::{DevToolsError, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// reqwest-backed client for the slide-deck backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        crate::utils::validation::validate_url("backend.url", base_url)?;
        let base_url = Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 相對路徑 (例如 `/files/...`) 以後端位址補全
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(self.base_url.join(url)?),
            Err(e) => Err(e.into()),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.resolve_url(path)?;
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(status_error(path, response).await);
        }
        unwrap_envelope(path, response).await
    }
}

async fn read_envelope_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
        .ok()
        .and_then(|env| env.error_message())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string())
}

async fn status_error(endpoint: &str, response: Response) -> DevToolsError {
    let status = response.status().as_u16();
    let message = read_envelope_message(response).await;
    DevToolsError::HttpStatusError {
        endpoint: endpoint.to_string(),
        status,
        message,
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let envelope: ApiEnvelope<T> = response.json().await?;
    if !envelope.success {
        return Err(DevToolsError::ResponseError {
            endpoint: endpoint.to_string(),
            message: envelope
                .error_message()
                .unwrap_or_else(|| "success=false".to_string()),
        });
    }
    envelope.data.ok_or_else(|| DevToolsError::ResponseError {
        endpoint: endpoint.to_string(),
        message: "missing data field".to_string(),
    })
}

#[async_trait::async_trait]
impl BackendApi for HttpBackend {
    async fn create_project(&self, request: &CreateProjectRequest) -> Result<String> {
        let created: CreatedProject = self.post_json("/api/projects", request).await?;
        Ok(created.project_id)
    }

    async fn create_page(&self, project_id: &str, request: &CreatePageRequest) -> Result<String> {
        let path = format!("/api/projects/{}/pages", project_id);
        let created: CreatedPage = self.post_json(&path, request).await?;
        Ok(created.page_id)
    }

    async fn export_images(&self, project_id: &str) -> Result<ExportImagesData> {
        let path = format!("/api/projects/{}/export/images", project_id);
        let url = self.resolve_url(&path)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Export response status: {}", status);

        if status.is_client_error() {
            // 4xx: 專案沒有可匯出的圖片，交給呼叫端處理，不重試
            let message = read_envelope_message(response).await;
            return Err(DevToolsError::NoExportableImages {
                project_id: project_id.to_string(),
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(status_error(&path, response).await);
        }

        unwrap_envelope(&path, response).await
    }

    async fn fetch_file(&self, url: &str) -> Result<DownloadedFile> {
        let resolved = self.resolve_url(url)?;
        tracing::debug!("Downloading {}", resolved);

        let response = self.client.get(resolved.clone()).send().await?;
        if !response.status().is_success() {
            return Err(status_error(url, response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!(
            "Downloaded {} bytes ({})",
            bytes.len(),
            content_type.as_deref().unwrap_or("unknown content-type")
        );

        Ok(DownloadedFile {
            url: resolved.to_string(),
            content_type,
            bytes,
        })
    }
}
