//! Business Info Repository (Singleton)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{BusinessInfo, BusinessInfoUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const TABLE: &str = "business_info";
pub const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct BusinessInfoRepository {
    base: BaseRepository,
}

impl BusinessInfoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn singleton_id() -> RecordId {
        RecordId::from_table_key(TABLE, SINGLETON_ID)
    }

    /// Get the singleton business info
    pub async fn get(&self) -> RepoResult<Option<BusinessInfo>> {
        let info: Option<BusinessInfo> = self.base.db().select(Self::singleton_id()).await?;
        Ok(info)
    }

    /// Create the singleton with the given content
    pub async fn create(&self, info: BusinessInfo) -> RepoResult<BusinessInfo> {
        let info = BusinessInfo { id: None, ..info };
        let created: Option<BusinessInfo> = self
            .base
            .db()
            .create(Self::singleton_id())
            .content(info)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create business info".to_string()))
    }

    /// Upsert: merge provided sections into the singleton, creating it first
    /// when absent. Returns the stored state before and after.
    pub async fn upsert(
        &self,
        data: BusinessInfoUpdate,
    ) -> RepoResult<(Option<BusinessInfo>, BusinessInfo)> {
        let previous = self.get().await?;
        if previous.is_none() {
            self.create(BusinessInfo::default()).await?;
        }

        let updated: Option<BusinessInfo> = self
            .base
            .db()
            .update(Self::singleton_id())
            .merge(data)
            .await?;
        let updated = updated
            .ok_or_else(|| RepoError::Database("Failed to update business info".to_string()))?;
        Ok((previous, updated))
    }

    /// Number of business info records (diagnostics)
    pub async fn count(&self) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM business_info GROUP ALL")
            .await?;
        let total: Option<usize> = result.take("total")?;
        Ok(total.unwrap_or(0))
    }
}
