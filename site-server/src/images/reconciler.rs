//! Storage listing and orphan computation

use std::path::{Path, PathBuf};

use tokio::fs;

use super::ReconcileError;
use super::collector::ReferenceSet;

/// A regular file found in the storage directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
}

/// Files physically present in local storage at scan time
#[derive(Debug, Clone)]
pub struct StorageListing {
    pub dir: PathBuf,
    /// `false` when the directory does not exist (listing is then empty)
    pub exists: bool,
    pub files: Vec<StoredFile>,
}

impl StorageListing {
    /// List regular files in `dir`, sorted by name
    ///
    /// A missing directory yields an empty listing rather than an error.
    /// Subdirectories are skipped.
    pub async fn scan(dir: &Path) -> Result<Self, ReconcileError> {
        let listing_err = |source: std::io::Error| ReconcileError::Listing {
            dir: dir.to_path_buf(),
            source,
        };

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    dir: dir.to_path_buf(),
                    exists: false,
                    files: Vec::new(),
                });
            }
            Err(e) => return Err(listing_err(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(listing_err)? {
            let metadata = match fs::metadata(entry.path()).await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 filename");
                continue;
            };
            files.push(StoredFile {
                name,
                size: metadata.len(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            dir: dir.to_path_buf(),
            exists: true,
            files,
        })
    }
}

/// Files present on disk that no record references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanReport {
    pub orphans: Vec<StoredFile>,
    /// Exact sum of orphan sizes
    pub total_bytes: u64,
    /// Number of files in the listing
    pub scanned: usize,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.orphans.iter().map(|f| f.name.clone()).collect()
    }
}

/// `listing - references`, by exact filename
pub fn find_orphans(listing: &StorageListing, references: &ReferenceSet) -> OrphanReport {
    let orphans: Vec<StoredFile> = listing
        .files
        .iter()
        .filter(|f| !references.contains(&f.name))
        .cloned()
        .collect();
    let total_bytes = orphans.iter().map(|f| f.size).sum();

    OrphanReport {
        orphans,
        total_bytes,
        scanned: listing.files.len(),
    }
}
