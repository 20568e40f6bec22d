//! Raw document reads for the image reconciliation scan
//!
//! Reads only the fields a descriptor needs, as plain JSON, so malformed
//! image fields never fail deserialization.

use super::{BaseRepository, RepoResult};
use crate::images::{RecordImages, RecordSource};
use serde_json::Value;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct DocumentReader {
    base: BaseRepository,
}

impl DocumentReader {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

impl RecordSource for DocumentReader {
    async fn load_all(&self, kind: &RecordImages) -> RepoResult<Vec<Value>> {
        // Field names come from static descriptors, never from user input
        let fields = kind.root_fields().join(", ");
        let sql = format!("SELECT <string>id AS recordId, {} FROM type::table($table)", fields);

        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("table", kind.table))
            .await?;
        let records: Vec<Value> = result.take(0)?;
        Ok(records)
    }
}
