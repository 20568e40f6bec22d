//! Image Cleanup Service
//!
//! 负责删除本地存储中的图片文件。两条删除路径互不混用：
//! - [`ImageCleanupService::discard_images`]: 记录更新/删除后的静默清理
//! - [`ImageCleanupService::purge_files`]: 对账任务的计数清理

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::images::extract_filename;

/// Outcome of a counted deletion batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub attempted: usize,
    pub deleted: usize,
    pub failures: Vec<DeletionFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub name: String,
    pub reason: String,
}

impl DeletionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.deleted == self.attempted
    }
}

/// 图片清理服务
#[derive(Debug, Clone)]
pub struct ImageCleanupService {
    /// 本地图片目录 (UPLOADS_DIR)
    uploads_dir: PathBuf,
}

impl ImageCleanupService {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Storage path for a filename or full reference
    ///
    /// Returns `None` when the reference yields no filename or the filename
    /// would leave the uploads directory.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let name = extract_filename(reference)?;
        self.stored_path(&name)
    }

    /// Storage path for a name taken verbatim from the directory listing
    fn stored_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        Some(self.uploads_dir.join(name))
    }

    /// Delete images released by a record mutation
    ///
    /// Missing files and unresolvable references are skipped silently;
    /// other failures are logged and never abort the batch. Returns how
    /// many files were removed.
    pub async fn discard_images(&self, references: &[String]) -> usize {
        let mut deleted_count = 0;

        for reference in references {
            let Some(file_path) = self.resolve(reference) else {
                tracing::debug!(reference = %reference, "Ignoring unresolvable image reference");
                continue;
            };

            match fs::remove_file(&file_path).await {
                Ok(()) => {
                    tracing::info!(path = %file_path.display(), "Deleted released image");
                    deleted_count += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %file_path.display(), error = %e, "Failed to delete released image");
                }
            }
        }

        deleted_count
    }

    /// Delete orphan files found by the reconciliation scan
    ///
    /// Names are bare listing entries and are never reparsed as references.
    /// Every name is attempted; a missing file counts as a failure.
    pub async fn purge_files(&self, names: &[String]) -> DeletionReport {
        let mut report = DeletionReport {
            attempted: names.len(),
            ..Default::default()
        };

        for name in names {
            let Some(file_path) = self.stored_path(name) else {
                tracing::warn!(name = %name, "Refusing to delete unsafe filename");
                report.failures.push(DeletionFailure {
                    name: name.clone(),
                    reason: "invalid filename".to_string(),
                });
                continue;
            };

            match fs::remove_file(&file_path).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "Failed to delete orphan image");
                    report.failures.push(DeletionFailure {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.deleted > 0 {
            tracing::info!(count = report.deleted, "Orphan images cleaned up");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn service_with(files: &[&str]) -> (TempDir, ImageCleanupService) {
        let tmp = TempDir::new().unwrap();
        for f in files {
            fs::write(tmp.path().join(f), b"jpeg").await.unwrap();
        }
        let service = ImageCleanupService::new(tmp.path().to_path_buf());
        (tmp, service)
    }

    #[tokio::test]
    async fn test_discard_resolves_full_references() {
        let (tmp, service) = service_with(&["a.jpg", "b.jpg"]).await;

        let deleted = service
            .discard_images(&["http://localhost:5000/uploads/a.jpg".to_string()])
            .await;

        assert_eq!(deleted, 1);
        assert!(!tmp.path().join("a.jpg").exists());
        assert!(tmp.path().join("b.jpg").exists());
    }

    #[tokio::test]
    async fn test_discard_missing_file_is_noop() {
        let (tmp, service) = service_with(&["keep.jpg"]).await;

        let deleted = service
            .discard_images(&["/uploads/absent.jpg".to_string(), String::new()])
            .await;

        assert_eq!(deleted, 0);
        assert!(tmp.path().join("keep.jpg").exists());
    }

    #[tokio::test]
    async fn test_purge_counts_missing_as_failure() {
        let (tmp, service) = service_with(&["b.jpg", "c.jpg"]).await;

        let report = service
            .purge_files(&["b.jpg".to_string(), "gone.jpg".to_string(), "c.jpg".to_string()])
            .await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.deleted, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "gone.jpg");
        assert!(!report.is_complete());
        assert!(!tmp.path().join("b.jpg").exists());
        assert!(!tmp.path().join("c.jpg").exists());
    }

    #[tokio::test]
    async fn test_purge_uses_listing_names_verbatim() {
        let (tmp, service) = service_with(&["a.jpg", "a.jpg#old", " a.jpg", "b.jpg?v=1"]).await;

        let report = service
            .purge_files(&[
                " a.jpg".to_string(),
                "a.jpg#old".to_string(),
                "b.jpg?v=1".to_string(),
            ])
            .await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.deleted, 3);
        assert!(report.is_complete());
        assert!(tmp.path().join("a.jpg").exists());
        assert!(!tmp.path().join("a.jpg#old").exists());
        assert!(!tmp.path().join(" a.jpg").exists());
        assert!(!tmp.path().join("b.jpg?v=1").exists());
    }

    #[tokio::test]
    async fn test_refuses_names_outside_uploads() {
        let (tmp, service) = service_with(&[]).await;
        let outside = tmp.path().parent().unwrap().join("outside.jpg");

        assert!(service.resolve("/uploads/../outside.jpg").is_none());
        assert!(service.resolve("/uploads/dir/inner.jpg").is_none());
        assert_eq!(service.discard_images(&["../outside.jpg".to_string()]).await, 0);

        let report = service.purge_files(&["..\\outside.jpg".to_string()]).await;
        assert_eq!(report.deleted, 0);
        assert_eq!(report.failures[0].reason, "invalid filename");
        assert!(!outside.exists());
    }
}
