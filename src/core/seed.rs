use crate::core::BackendApi;
use crate::domain::model::{CreatePageRequest, CreateProjectRequest, SeededProject};
use crate::domain::ports::FixtureStore;
use crate::utils::error::{DevToolsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of distinct fixture slides (`slide_1.jpg` .. `slide_3.jpg`).
pub const FIXTURE_IMAGE_COUNT: usize = 3;
pub const DEFAULT_PAGE_COUNT: usize = 3;
pub const DEFAULT_IDEA_PROMPT: &str = "e2e test";

/// Fixture image for page `index`, cycling through the available slides.
pub fn fixture_image_name(index: usize) -> String {
    format!("slide_{}.jpg", (index % FIXTURE_IMAGE_COUNT) + 1)
}

/// Upload-relative path the backend expects for a page's first image version.
pub fn page_image_path(project_id: &str, page_id: &str) -> String {
    format!("{}/pages/{}_v1.jpg", project_id, page_id)
}

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub uploads_dir: PathBuf,
    pub fixtures_dir: PathBuf,
    pub idea_prompt: String,
}

/// Creates projects with real images on disk, bypassing AI generation:
/// project and pages go through the API, images are copied from fixtures
/// and the store is updated directly.
pub struct Seeder<B: BackendApi, F: FixtureStore> {
    backend: B,
    store: F,
    options: SeedOptions,
}

impl<B: BackendApi, F: FixtureStore> Seeder<B, F> {
    pub fn new(backend: B, store: F, options: SeedOptions) -> Self {
        Self {
            backend,
            store,
            options,
        }
    }

    fn check_fixtures(&self, page_count: usize) -> Result<()> {
        for i in 0..page_count.min(FIXTURE_IMAGE_COUNT) {
            let fixture = self.options.fixtures_dir.join(fixture_image_name(i));
            if !fixture.is_file() {
                return Err(DevToolsError::SeedError {
                    message: format!("fixture image missing: {}", fixture.display()),
                });
            }
        }
        Ok(())
    }

    pub async fn seed(&self, page_count: usize) -> Result<SeededProject> {
        // 先確認 fixture 都在，避免建立一半的專案
        self.check_fixtures(page_count)?;

        let project_id = self
            .backend
            .create_project(&CreateProjectRequest::idea(&self.options.idea_prompt))
            .await?;
        tracing::info!("📝 Created project {}", project_id);

        let pages_dir = self.options.uploads_dir.join(&project_id).join("pages");
        fs::create_dir_all(&pages_dir)?;

        let mut page_ids = Vec::with_capacity(page_count);
        for i in 0..page_count {
            let page_id = self
                .backend
                .create_page(&project_id, &CreatePageRequest::slide(i))
                .await?;

            let rel = page_image_path(&project_id, &page_id);
            copy_fixture(
                &self.options.fixtures_dir.join(fixture_image_name(i)),
                &self.options.uploads_dir.join(&rel),
            )?;
            self.store.mark_page_generated(&page_id, &rel)?;

            tracing::debug!("Seeded page {} ({}) with {}", i + 1, page_id, rel);
            page_ids.push(page_id);
        }

        self.store.mark_project_images_generated(&project_id)?;
        tracing::info!(
            "✅ Seeded project {} with {} page(s)",
            project_id,
            page_ids.len()
        );

        Ok(SeededProject {
            project_id,
            page_ids,
        })
    }
}

fn copy_fixture(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DownloadedFile, ExportImagesData};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockBackend {
        pages_created: Mutex<Vec<CreatePageRequest>>,
    }

    #[async_trait::async_trait]
    impl BackendApi for MockBackend {
        async fn create_project(&self, request: &CreateProjectRequest) -> Result<String> {
            assert_eq!(request.creation_type, "idea");
            Ok("proj-1".to_string())
        }

        async fn create_page(&self, project_id: &str, request: &CreatePageRequest) -> Result<String> {
            assert_eq!(project_id, "proj-1");
            let mut pages = self.pages_created.lock().unwrap();
            pages.push(request.clone());
            Ok(format!("page-{}", request.order_index))
        }

        async fn export_images(&self, _project_id: &str) -> Result<ExportImagesData> {
            unreachable!()
        }

        async fn fetch_file(&self, _url: &str) -> Result<DownloadedFile> {
            unreachable!()
        }
    }

    #[derive(Default)]
    struct MockStore {
        pages: Mutex<Vec<(String, String)>>,
        projects: Mutex<Vec<String>>,
    }

    impl FixtureStore for MockStore {
        fn mark_page_generated(&self, page_id: &str, image_path: &str) -> Result<()> {
            self.pages
                .lock()
                .unwrap()
                .push((page_id.to_string(), image_path.to_string()));
            Ok(())
        }

        fn mark_project_images_generated(&self, project_id: &str) -> Result<()> {
            self.projects.lock().unwrap().push(project_id.to_string());
            Ok(())
        }
    }

    fn setup_fixtures(dir: &TempDir) -> SeedOptions {
        let fixtures_dir = dir.path().join("fixtures");
        fs::create_dir_all(&fixtures_dir).unwrap();
        for n in 1..=3 {
            fs::write(
                fixtures_dir.join(format!("slide_{}.jpg", n)),
                format!("jpeg-{}", n),
            )
            .unwrap();
        }
        SeedOptions {
            uploads_dir: dir.path().join("uploads"),
            fixtures_dir,
            idea_prompt: DEFAULT_IDEA_PROMPT.to_string(),
        }
    }

    #[test]
    fn test_fixture_image_cycles() {
        assert_eq!(fixture_image_name(0), "slide_1.jpg");
        assert_eq!(fixture_image_name(2), "slide_3.jpg");
        assert_eq!(fixture_image_name(3), "slide_1.jpg");
        assert_eq!(fixture_image_name(7), "slide_2.jpg");
    }

    #[tokio::test]
    async fn test_seed_copies_images_and_updates_store() {
        let dir = TempDir::new().unwrap();
        let options = setup_fixtures(&dir);
        let uploads = options.uploads_dir.clone();
        let seeder = Seeder::new(MockBackend::default(), MockStore::default(), options);

        let seeded = seeder.seed(4).await.unwrap();

        assert_eq!(seeded.project_id, "proj-1");
        assert_eq!(seeded.page_ids, vec!["page-0", "page-1", "page-2", "page-3"]);

        // 第四頁回到 slide_1
        let fourth = fs::read_to_string(uploads.join("proj-1/pages/page-3_v1.jpg")).unwrap();
        assert_eq!(fourth, "jpeg-1");

        let pages = seeder.store.pages.lock().unwrap();
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0], ("page-0".to_string(), "proj-1/pages/page-0_v1.jpg".to_string()));
        assert_eq!(*seeder.store.projects.lock().unwrap(), vec!["proj-1"]);

        let titles: Vec<String> = seeder
            .backend
            .pages_created
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.outline_content.title.clone())
            .collect();
        assert_eq!(titles, vec!["Slide 1", "Slide 2", "Slide 3", "Slide 4"]);
    }

    #[tokio::test]
    async fn test_seed_zero_pages_still_marks_project() {
        let dir = TempDir::new().unwrap();
        let options = setup_fixtures(&dir);
        let seeder = Seeder::new(MockBackend::default(), MockStore::default(), options);

        let seeded = seeder.seed(0).await.unwrap();
        assert!(seeded.page_ids.is_empty());
        assert_eq!(seeder.store.projects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fixture_fails_before_api_calls() {
        let dir = TempDir::new().unwrap();
        let mut options = setup_fixtures(&dir);
        options.fixtures_dir = dir.path().join("nowhere");
        let seeder = Seeder::new(MockBackend::default(), MockStore::default(), options);

        let err = seeder.seed(1).await.unwrap_err();
        assert!(matches!(err, DevToolsError::SeedError { .. }));
        assert!(seeder.backend.pages_created.lock().unwrap().is_empty());
    }
}
