//! Reference collection across all image-bearing records

use std::collections::BTreeSet;

use serde_json::Value;

use super::ReconcileError;
use super::descriptor::RecordImages;
use super::reference::ImageRefClassifier;
use crate::db::repository::RepoResult;

/// De-duplicated set of storage filenames referenced by live records
pub type ReferenceSet = BTreeSet<String>;

/// Read access to every stored record of a type
///
/// Records come back as JSON documents holding at least the top-level
/// fields named by the descriptor.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn load_all(&self, kind: &RecordImages) -> RepoResult<Vec<Value>>;
}

/// Scan every record of every listed type and gather the filenames they
/// reference. A read failure on any type aborts the scan.
pub async fn collect_references<S>(
    source: &S,
    kinds: &[RecordImages],
    classifier: &ImageRefClassifier,
) -> Result<ReferenceSet, ReconcileError>
where
    S: RecordSource,
{
    let mut names = ReferenceSet::new();

    for kind in kinds {
        let records = source
            .load_all(kind)
            .await
            .map_err(|source| ReconcileError::Read {
                table: kind.table,
                source,
            })?;

        let before = names.len();
        for record in &records {
            names.extend(
                kind.references(record)
                    .into_iter()
                    .filter_map(|r| classifier.referenced_filename(r)),
            );
        }

        tracing::debug!(
            table = kind.table,
            records = records.len(),
            new_references = names.len() - before,
            "Collected image references"
        );
    }

    Ok(names)
}
