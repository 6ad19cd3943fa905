use crate::core::{BackendApi, Storage};
use crate::domain::model::{DownloadedFile, ExportKind, ExportResult};
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use std::io::Cursor;

/// Client side of the "export slides as images" contract.
///
/// The backend decides between a single JPEG and a ZIP archive; this type
/// never branches on that choice, it just follows `download_url`.
pub struct ImageExporter<B: BackendApi> {
    backend: B,
}

impl<B: BackendApi> ImageExporter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// One request, no retry. A 4xx comes back as `NoExportableImages`.
    pub async fn export(&self, project_id: &str) -> Result<ExportResult> {
        validate_non_empty_string("project_id", project_id)?;

        tracing::info!("🖼️ Requesting image export for project {}", project_id);
        let data = self.backend.export_images(project_id).await?;
        let result = ExportResult::new(project_id, data);

        if !result.points_under_exports() {
            tracing::warn!(
                "⚠️ download_url {} is not under /files/{}/exports/",
                result.download_url,
                project_id
            );
        }
        tracing::info!(
            "✅ Export ready: {} ({:?})",
            result.download_url,
            result.kind
        );
        Ok(result)
    }

    pub async fn download(&self, result: &ExportResult) -> Result<DownloadedFile> {
        let file = self.backend.fetch_file(&result.download_url).await?;

        if let Some(expected) = result.kind.expected_content_type() {
            if !file.has_content_type(expected) {
                tracing::warn!(
                    "⚠️ Expected {} for {}, got {}",
                    expected,
                    result.file_name(),
                    file.content_type.as_deref().unwrap_or("no content-type")
                );
            }
        }
        Ok(file)
    }

    /// Downloads the artifact and stores it under its own file name.
    pub async fn download_to<S: Storage>(
        &self,
        result: &ExportResult,
        storage: &S,
    ) -> Result<String> {
        let file = self.download(result).await?;
        let name = result.file_name().to_string();
        storage.write_file(&name, &file.bytes).await?;
        tracing::info!("📁 Saved {} ({} bytes)", name, file.bytes.len());
        Ok(name)
    }
}

/// Entry names of a downloaded ZIP export.
pub fn archive_entries(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

/// Short human description of an export, used by the CLI.
pub fn describe(result: &ExportResult) -> String {
    match &result.kind {
        ExportKind::Jpeg => format!("single image {}", result.file_name()),
        ExportKind::Zip => format!("archive {}", result.file_name()),
        ExportKind::Other(ext) => format!("{} file {}", ext, result.file_name()),
    }
}
