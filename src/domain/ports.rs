use crate::domain::model::{
    CreatePageRequest, CreateProjectRequest, DownloadedFile, ExportImagesData,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The slide-deck backend as seen by the tooling.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn create_project(&self, request: &CreateProjectRequest) -> Result<String>;
    async fn create_page(&self, project_id: &str, request: &CreatePageRequest) -> Result<String>;
    /// `GET /api/projects/{project_id}/export/images`
    async fn export_images(&self, project_id: &str) -> Result<ExportImagesData>;
    /// Follows a `download_url`; relative URLs resolve against the backend.
    async fn fetch_file(&self, url: &str) -> Result<DownloadedFile>;
}

/// Direct writes into the backend's relational store, bypassing image generation.
pub trait FixtureStore: Send + Sync {
    fn mark_page_generated(&self, page_id: &str, image_path: &str) -> Result<()>;
    fn mark_project_images_generated(&self, project_id: &str) -> Result<()>;
}
