use crate::domain::model::{PAGE_STATUS_COMPLETED, PROJECT_STATUS_IMAGES_GENERATED};
use crate::domain::ports::FixtureStore;
use crate::utils::error::{DevToolsError, Result};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Backend SQLite database, opened directly so fixture pages can be marked
/// as generated without going through the image pipeline.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        if !db_path.exists() {
            return Err(DevToolsError::SeedError {
                message: format!("database not found: {}", db_path.display()),
            });
        }

        let conn = Connection::open(&db_path)?;
        // 後端可能同時在寫，等鎖最多 5 秒
        conn.busy_timeout(Duration::from_secs(5))?;
        tracing::debug!("Opened fixture database {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn execute_one(&self, what: &str, sql: &str, params: impl rusqlite::Params) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| DevToolsError::SeedError {
            message: "database connection lock poisoned".to_string(),
        })?;
        let updated = conn.execute(sql, params)?;
        if updated == 0 {
            return Err(DevToolsError::SeedError {
                message: format!("{} not found in {}", what, self.db_path.display()),
            });
        }
        Ok(())
    }
}

impl FixtureStore for SqliteStore {
    fn mark_page_generated(&self, page_id: &str, image_path: &str) -> Result<()> {
        self.execute_one(
            &format!("page {}", page_id),
            "UPDATE pages SET generated_image_path = ?1, status = ?2 WHERE id = ?3",
            params![image_path, PAGE_STATUS_COMPLETED, page_id],
        )
    }

    fn mark_project_images_generated(&self, project_id: &str) -> Result<()> {
        self.execute_one(
            &format!("project {}", project_id),
            "UPDATE projects SET status = ?1 WHERE id = ?2",
            params![PROJECT_STATUS_IMAGES_GENERATED, project_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_db(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("database.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE projects(id TEXT PRIMARY KEY, status TEXT NOT NULL);
             CREATE TABLE pages(id TEXT PRIMARY KEY, project_id TEXT NOT NULL,
                                generated_image_path TEXT, status TEXT NOT NULL);
             INSERT INTO projects(id, status) VALUES ('p1', 'DRAFT');
             INSERT INTO pages(id, project_id, status) VALUES ('pg1', 'p1', 'DRAFT');",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_mark_page_and_project() {
        let dir = TempDir::new().unwrap();
        let path = create_db(&dir);
        let store = SqliteStore::open(&path).unwrap();

        store
            .mark_page_generated("pg1", "p1/pages/pg1_v1.jpg")
            .unwrap();
        store.mark_project_images_generated("p1").unwrap();

        let conn = Connection::open(&path).unwrap();
        let (image, status): (String, String) = conn
            .query_row(
                "SELECT generated_image_path, status FROM pages WHERE id = 'pg1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(image, "p1/pages/pg1_v1.jpg");
        assert_eq!(status, "COMPLETED");

        let project_status: String = conn
            .query_row("SELECT status FROM projects WHERE id = 'p1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(project_status, "IMAGES_GENERATED");
    }

    #[test]
    fn test_unknown_page_is_error() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(create_db(&dir)).unwrap();
        let err = store.mark_page_generated("missing", "x.jpg").unwrap_err();
        assert!(matches!(err, DevToolsError::SeedError { .. }));
    }

    #[test]
    fn test_missing_database() {
        let dir = TempDir::new().unwrap();
        assert!(SqliteStore::open(dir.path().join("nope.db")).is_err());
    }
}
