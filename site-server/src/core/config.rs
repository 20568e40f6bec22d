use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};
use crate::images::ImageRefClassifier;

const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:5000"];

/// Where uploaded images are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStoreSettings {
    /// Files under `UPLOADS_DIR`, served at `/uploads/{name}`
    Local,
    /// Objects in an S3 bucket, referenced by absolute URL
    S3 {
        bucket: String,
        prefix: String,
        public_base_url: String,
    },
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | {WORK_DIR}/database/site.db | 数据库目录 |
/// | UPLOADS_DIR | {WORK_DIR}/uploads | 本地图片目录 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CORS_ALLOWED_ORIGINS | localhost 开发地址 | 逗号分隔 |
/// | IMAGE_STORE | local | local 或 s3 |
/// | S3_BUCKET / S3_PREFIX / S3_PUBLIC_BASE_URL | - | S3 存储 |
/// | LOCAL_IMAGE_PREFIXES | http://localhost | 本地图片前缀 |
/// | EXCLUDED_IMAGE_MARKERS | unsplash | 外部图片标记 |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传大小上限 |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | admin / - | 默认管理员 |
/// | LOG_LEVEL / LOG_JSON / LOG_DIR | info / false / - | 日志 |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub database_path: PathBuf,
    pub uploads_dir: PathBuf,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub cors_allowed_origins: Vec<String>,
    pub image_store: ImageStoreSettings,
    pub local_image_prefixes: Vec<String>,
    pub excluded_image_markers: Vec<String>,
    pub max_upload_bytes: usize,
    pub admin_username: String,
    /// Seeds the default admin at startup when set
    pub admin_password: Option<String>,
    pub jwt: JwtConfig,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Defaults rooted at `work_dir`
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<PathBuf>, jwt: JwtConfig) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: work_dir.join("database").join("site.db"),
            uploads_dir: work_dir.join("uploads"),
            work_dir,
            http_port: 5000,
            environment: "development".into(),
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            image_store: ImageStoreSettings::Local,
            local_image_prefixes: vec!["http://localhost".into()],
            excluded_image_markers: vec!["unsplash".into()],
            max_upload_bytes: 5 * 1024 * 1024,
            admin_username: "admin".into(),
            admin_password: None,
            jwt,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
        }
    }

    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Result<Self> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let mut config = Self::with_work_dir(work_dir, JwtConfig::from_env()?);

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = path.into();
        }
        if let Ok(dir) = std::env::var("UPLOADS_DIR") {
            config.uploads_dir = dir.into();
        }
        if let Some(port) = std::env::var("HTTP_PORT").ok().and_then(|p| p.parse().ok()) {
            config.http_port = port;
        }
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Some(origins) = env_list("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = origins;
        }
        config.image_store = image_store_from_env()?;
        if let Some(prefixes) = env_list("LOCAL_IMAGE_PREFIXES") {
            config.local_image_prefixes = prefixes;
        }
        if let Some(markers) = env_list("EXCLUDED_IMAGE_MARKERS") {
            config.excluded_image_markers = markers;
        }
        if let Some(limit) = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.max_upload_bytes = limit;
        }
        if let Ok(username) = std::env::var("ADMIN_USERNAME") {
            config.admin_username = username;
        }
        config.admin_password = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty());
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_json = std::env::var("LOG_JSON")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        config.log_dir = std::env::var("LOG_DIR").ok();

        Ok(config)
    }

    /// Image reference classifier built from the configured prefixes and markers
    pub fn classifier(&self) -> ImageRefClassifier {
        ImageRefClassifier::new(
            self.local_image_prefixes.clone(),
            self.excluded_image_markers.clone(),
        )
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Comma-separated list; `None` when unset or blank
fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items = parse_list(&raw);
    (!items.is_empty()).then_some(items)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn image_store_from_env() -> Result<ImageStoreSettings> {
    let kind = std::env::var("IMAGE_STORE").unwrap_or_else(|_| "local".into());
    match kind.to_ascii_lowercase().as_str() {
        "local" => Ok(ImageStoreSettings::Local),
        "s3" => {
            let bucket = std::env::var("S3_BUCKET")
                .map_err(|_| ServerError::Config("S3_BUCKET is required for IMAGE_STORE=s3".into()))?;
            let public_base_url = std::env::var("S3_PUBLIC_BASE_URL").map_err(|_| {
                ServerError::Config("S3_PUBLIC_BASE_URL is required for IMAGE_STORE=s3".into())
            })?;
            Ok(ImageStoreSettings::S3 {
                bucket,
                prefix: std::env::var("S3_PREFIX")
                    .map(|p| p.trim_matches('/').to_string())
                    .unwrap_or_default(),
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
            })
        }
        other => Err(ServerError::Config(format!(
            "IMAGE_STORE must be 'local' or 's3', got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-that-is-long-enough-123".into(),
            expiration_minutes: 60,
            issuer: "site-server".into(),
            audience: "site-admin".into(),
        }
    }

    #[test]
    fn test_paths_follow_work_dir() {
        let config = Config::with_work_dir("/srv/site", jwt());
        assert_eq!(config.database_path, PathBuf::from("/srv/site/database/site.db"));
        assert_eq!(config.uploads_dir, PathBuf::from("/srv/site/uploads"));
        assert_eq!(config.image_store, ImageStoreSettings::Local);
        assert_eq!(config.max_upload_bytes, 5_242_880);
        assert!(!config.is_production());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" https://a.example , ,http://localhost:5173"),
            vec!["https://a.example", "http://localhost:5173"]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_classifier_uses_configured_markers() {
        let mut config = Config::with_work_dir("/srv/site", jwt());
        config.excluded_image_markers = vec!["Pexels".into()];
        let classifier = config.classifier();
        assert!(classifier.is_excluded("https://images.pexels.com/p.jpg"));
        assert!(!classifier.is_excluded("https://images.unsplash.com/p.jpg"));
    }
}
