use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::keys;
use folio_core::models::media::Media;
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use super::{MediaStore, checked_name, content_type_for, ensure_directory};
use crate::error::StorageError;

/// Filesystem-backed media store.
///
/// Uses the same key layout as the S3 backend, resolved under `root`.
#[derive(Debug)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    /// Open a store rooted at `root`, creating it if necessary.
    pub fn new(root: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(root.join(keys::MEDIA_PREFIX))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    async fn write_record(&self, media: &Media) -> Result<(), StorageError> {
        let path = self.resolve(&keys::media_record(media.id));
        let json = serde_json::to_vec_pretty(media)?;

        // Write to a temp file then rename so readers never see a partial record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &json).await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
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

        let dest = self.resolve(&media.storage_key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        move_file(temp_path, &dest).await?;

        if let Err(e) = self.write_record(&media).await {
            // Hand the file back so the caller still owns it.
            if let Err(restore) = move_file(&dest, temp_path).await {
                warn!(path = %dest.display(), error = %restore, "failed to restore temp file");
            }
            return Err(e);
        }

        info!(media_id = %media.id, path = %dest.display(), size, "media persisted");
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
        self.write_record(&media).await?;
        info!(media_id = %media.id, name, "media directory created");
        Ok(media)
    }

    async fn get(&self, id: Uuid) -> Result<Media, StorageError> {
        let key = keys::media_record(id);
        let bytes = fs::read(self.resolve(&key)).await.map_err(|e| not_found(e, &key))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn read(&self, id: Uuid) -> Result<Vec<u8>, StorageError> {
        let media = self.get(id).await?;
        if media.is_directory {
            return Err(StorageError::IsADirectory(id));
        }
        fs::read(self.resolve(&media.storage_key))
            .await
            .map_err(|e| not_found(e, &media.storage_key))
    }
}

/// Rename, falling back to copy + remove when the rename crosses filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<(), StorageError> {
    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    fs::copy(from, to).await?;
    if let Err(e) = fs::remove_file(from).await {
        warn!(path = %from.display(), error = %e, "failed to remove source after copy");
    }
    Ok(())
}

fn not_found(e: std::io::Error, key: &str) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound {
            key: key.to_string(),
        }
    } else {
        StorageError::Io(e)
    }
}
