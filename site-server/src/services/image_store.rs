//! Image Store
//!
//! Writes processed upload bytes to their final home and returns the
//! reference the frontend saves into a record.
//!
//! - Local: `{UPLOADS_DIR}/image-{uuid}.jpg`, referenced as `/uploads/image-{uuid}.jpg`
//! - S3: `s3://{bucket}/{prefix}/{uuid}.jpg`, referenced by absolute URL

use std::path::PathBuf;

use aws_sdk_s3::Client as S3Client;
use shared::models::UploadResponse;
use uuid::Uuid;

use crate::core::config::ImageStoreSettings;
use crate::images::UPLOADS_SEGMENT;
use crate::utils::AppError;

/// Upload destination
#[derive(Debug, Clone)]
pub enum ImageStore {
    Local {
        dir: PathBuf,
    },
    S3 {
        client: S3Client,
        bucket: String,
        prefix: String,
        public_base_url: String,
    },
}

impl ImageStore {
    /// Build the store for the configured backend
    ///
    /// The S3 client picks up credentials and region from the standard AWS
    /// environment.
    pub async fn from_settings(settings: &ImageStoreSettings, uploads_dir: PathBuf) -> Self {
        match settings {
            ImageStoreSettings::Local => ImageStore::Local { dir: uploads_dir },
            ImageStoreSettings::S3 {
                bucket,
                prefix,
                public_base_url,
            } => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                ImageStore::S3 {
                    client: S3Client::new(&aws_config),
                    bucket: bucket.clone(),
                    prefix: prefix.clone(),
                    public_base_url: public_base_url.clone(),
                }
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            ImageStore::Local { .. } => "local",
            ImageStore::S3 { .. } => "s3",
        }
    }

    /// Store JPEG bytes under a freshly generated name
    pub async fn store(&self, jpeg: Vec<u8>) -> Result<UploadResponse, AppError> {
        let id = Uuid::new_v4();
        match self {
            ImageStore::Local { dir } => {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    AppError::storage(format!("Failed to create uploads directory: {e}"))
                })?;

                let public_id = format!("image-{id}");
                let filename = format!("{public_id}.jpg");
                let path = dir.join(&filename);
                tokio::fs::write(&path, &jpeg).await.map_err(|e| {
                    tracing::error!(path = %path.display(), error = %e, "Failed to write image");
                    AppError::storage("Failed to save image")
                })?;

                tracing::info!(filename = %filename, size = jpeg.len(), "Image stored locally");
                Ok(UploadResponse {
                    file_path: format!("{UPLOADS_SEGMENT}{filename}"),
                    public_id,
                })
            }
            ImageStore::S3 {
                client,
                bucket,
                prefix,
                public_base_url,
            } => {
                let key = s3_key(prefix, &id);
                let size = jpeg.len();
                client
                    .put_object()
                    .bucket(bucket)
                    .key(&key)
                    .body(jpeg.into())
                    .content_type("image/jpeg")
                    .send()
                    .await
                    .map_err(|e| {
                        tracing::error!(key = %key, error = %e, "S3 upload failed");
                        AppError::storage("Image upload failed")
                    })?;

                tracing::info!(key = %key, size, "Image uploaded to S3");
                Ok(UploadResponse {
                    file_path: format!("{public_base_url}/{key}"),
                    public_id: key,
                })
            }
        }
    }
}

fn s3_key(prefix: &str, id: &Uuid) -> String {
    if prefix.is_empty() {
        format!("{id}.jpg")
    } else {
        format!("{prefix}/{id}.jpg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::extract_filename;
    use tempfile::TempDir;

    #[test]
    fn test_s3_key() {
        let id = Uuid::nil();
        assert_eq!(s3_key("", &id), format!("{id}.jpg"));
        assert_eq!(s3_key("site/images", &id), format!("site/images/{id}.jpg"));
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("uploads");
        let store = ImageStore::Local { dir: dir.clone() };

        let resp = store.store(b"jpeg-bytes".to_vec()).await.unwrap();
        assert!(resp.file_path.starts_with("/uploads/image-"));
        assert!(resp.file_path.ends_with(".jpg"));

        let name = extract_filename(&resp.file_path).unwrap();
        assert_eq!(name, format!("{}.jpg", resp.public_id));
        let written = tokio::fs::read(dir.join(name)).await.unwrap();
        assert_eq!(written, b"jpeg-bytes");
    }
}
