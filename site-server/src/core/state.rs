use std::sync::Arc;

use serde_json::Value;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::models::ROLE_ADMIN;
use crate::db::repository::UserRepository;
use crate::images::{ImageRefClassifier, RecordImages, released_images, released_on_delete};
use crate::services::{ImageCleanupService, ImageStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 句柄克隆实现浅拷贝，可直接作为 axum State。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | classifier | Arc<ImageRefClassifier> | 图片引用分类 |
/// | image_cleanup | ImageCleanupService | 本地图片删除 |
/// | image_store | ImageStore | 上传存储 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub classifier: Arc<ImageRefClassifier>,
    pub image_cleanup: ImageCleanupService,
    pub image_store: ImageStore,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (DATABASE_PATH)
    /// 2. 创建上传目录
    /// 3. 构建各服务
    /// 4. 设置 ADMIN_PASSWORD 时创建默认管理员
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::open(&config.database_path).await?.db;

        tokio::fs::create_dir_all(&config.uploads_dir).await?;

        let image_store =
            ImageStore::from_settings(&config.image_store, config.uploads_dir.clone()).await;
        tracing::info!(backend = image_store.backend_name(), "Image store ready");

        let state = Self {
            config: config.clone(),
            db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            classifier: Arc::new(config.classifier()),
            image_cleanup: ImageCleanupService::new(config.uploads_dir.clone()),
            image_store,
        };

        state.seed_default_admin().await?;
        Ok(state)
    }

    async fn seed_default_admin(&self) -> Result<()> {
        let Some(password) = self.config.admin_password.as_deref() else {
            return Ok(());
        };

        let repo = UserRepository::new(self.db.clone());
        let username = &self.config.admin_username;
        if repo
            .find_by_username(username)
            .await
            .map_err(crate::utils::AppError::from)?
            .is_none()
        {
            repo.create(username, password, ROLE_ADMIN)
                .await
                .map_err(crate::utils::AppError::from)?;
            tracing::info!(username = %username, "Default admin user created");
        }
        Ok(())
    }

    pub fn user_repo(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    /// Delete local images `old` referenced and `new` no longer does
    ///
    /// Advisory: failures are logged inside the cleanup service and never
    /// reach the caller.
    pub async fn release_images(&self, kind: &RecordImages, old: &Value, new: &Value) -> usize {
        let released = released_images(kind, old, new, &self.classifier);
        self.discard(kind, released).await
    }

    /// Delete every local image a removed record referenced
    pub async fn release_all_images(&self, kind: &RecordImages, old: &Value) -> usize {
        let released = released_on_delete(kind, old, &self.classifier);
        self.discard(kind, released).await
    }

    async fn discard(&self, kind: &RecordImages, released: Vec<String>) -> usize {
        if released.is_empty() {
            return 0;
        }
        tracing::debug!(table = kind.table, files = ?released, "Releasing images");
        self.image_cleanup.discard_images(&released).await
    }
}
