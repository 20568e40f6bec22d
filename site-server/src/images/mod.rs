//! Image reference reconciliation
//!
//! - [`reference`]: filename extraction and local/external classification
//! - [`descriptor`]: where each record type keeps its image references
//! - [`collector`]: reference set across all stored records
//! - [`reconciler`]: storage listing and orphan computation
//! - [`lifecycle`]: images released by record updates and deletes
//!
//! [`reconcile_orphans`] ties the pieces into the maintenance job run by the
//! `site-admin cleanup-images` command.

pub mod collector;
pub mod descriptor;
pub mod lifecycle;
pub mod reconciler;
pub mod reference;

use std::path::PathBuf;

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::services::image_cleanup::{DeletionReport, ImageCleanupService};

pub use collector::{RecordSource, ReferenceSet, collect_references};
pub use descriptor::{FieldKind, ImageField, RecordImages};
pub use lifecycle::{released_images, released_on_delete};
pub use reconciler::{OrphanReport, StorageListing, StoredFile, find_orphans};
pub use reference::{ImageRefClassifier, UPLOADS_SEGMENT, extract_filename};

/// Reconciliation failures that abort the job
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to read {table} records: {source}")]
    Read {
        table: &'static str,
        #[source]
        source: RepoError,
    },

    #[error("failed to list {}: {source}", dir.display())]
    Listing {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of one reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub listing: StorageListing,
    pub references: ReferenceSet,
    pub orphans: OrphanReport,
    pub deletion: DeletionReport,
}

impl ReconcileOutcome {
    fn missing_directory(listing: StorageListing) -> Self {
        Self {
            listing,
            references: ReferenceSet::new(),
            orphans: OrphanReport::default(),
            deletion: DeletionReport::default(),
        }
    }
}

/// Scan storage and records, then delete every unreferenced file
///
/// Assumes no concurrent writers: references are read once and files are
/// deleted without re-checking them.
pub async fn reconcile_orphans<S>(
    source: &S,
    classifier: &ImageRefClassifier,
    cleanup: &ImageCleanupService,
) -> Result<ReconcileOutcome, ReconcileError>
where
    S: RecordSource,
{
    let listing = StorageListing::scan(cleanup.uploads_dir()).await?;
    if !listing.exists {
        tracing::warn!(dir = %listing.dir.display(), "Uploads directory does not exist");
        return Ok(ReconcileOutcome::missing_directory(listing));
    }

    let references = collect_references(source, descriptor::ALL, classifier).await?;
    let orphans = find_orphans(&listing, &references);

    tracing::info!(
        files = listing.files.len(),
        referenced = references.len(),
        orphans = orphans.orphans.len(),
        reclaimable_bytes = orphans.total_bytes,
        "Image reconciliation scan finished"
    );

    let deletion = if orphans.is_empty() {
        DeletionReport::default()
    } else {
        cleanup.purge_files(&orphans.names()).await
    };

    Ok(ReconcileOutcome {
        listing,
        references,
        orphans,
        deletion,
    })
}
