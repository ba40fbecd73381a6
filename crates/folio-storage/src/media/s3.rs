use std::path::Path;

use async_trait::async_trait;
use folio_core::keys;
use folio_core::models::media::Media;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use super::{MediaStore, checked_name, content_type_for, ensure_directory};
use crate::error::StorageError;
use crate::objects::Bucket;

/// S3-backed media store. Records are JSON objects next to the media bytes.
#[derive(Clone)]
pub struct S3MediaStore {
    bucket: Bucket,
}

impl S3MediaStore {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn persist_temp_file(
        &self,
        filename: &str,
        temp_path: &Path,
        owner: Option<Uuid>,
        directory: Option<Uuid>,
    ) -> Result<Media, StorageError> {
        let filename = checked_name(filename)?;
        if let Some(dir) = directory {
            ensure_directory(self, dir).await?;
        }

        let size = fs::metadata(temp_path).await?.len();
        let media = Media::file(filename, &content_type_for(filename), size, owner, directory);

        self.bucket
            .put_file(&media.storage_key, temp_path, &media.content_type)
            .await?;

        if let Err(e) = self
            .bucket
            .save_json(&keys::media_record(media.id), &media)
            .await
        {
            if let Err(cleanup) = self.bucket.delete(&media.storage_key).await {
                warn!(key = %media.storage_key, error = %cleanup, "failed to remove orphaned object");
            }
            return Err(e);
        }

        if let Err(e) = fs::remove_file(temp_path).await {
            warn!(path = %temp_path.display(), error = %e, "failed to remove uploaded temp file");
        }

        info!(
            media_id = %media.id,
            "persisted media to s3://{}/{}",
            self.bucket.name(),
            media.storage_key
        );
        Ok(media)
    }

    async fn create_directory(
        &self,
        name: &str,
        owner: Option<Uuid>,
        parent: Option<Uuid>,
    ) -> Result<Media, StorageError> {
        let name = checked_name(name)?;
        if let Some(parent) = parent {
            ensure_directory(self, parent).await?;
        }

        let media = Media::directory(name, owner, parent);
        self.bucket
            .save_json(&keys::media_record(media.id), &media)
            .await?;
        info!(media_id = %media.id, name, "media directory created");
        Ok(media)
    }

    async fn get(&self, id: Uuid) -> Result<Media, StorageError> {
        self.bucket.load_json(&keys::media_record(id)).await
    }

    async fn read(&self, id: Uuid) -> Result<Vec<u8>, StorageError> {
        let media = self.get(id).await?;
        if media.is_directory {
            return Err(StorageError::IsADirectory(id));
        }
        self.bucket.get(&media.storage_key).await
    }
}
