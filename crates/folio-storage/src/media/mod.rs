//! Media registration.
//!
//! A `MediaStore` takes ownership of a file sitting on local disk and turns
//! it into a [`Media`] record, optionally owned by a user and placed in a
//! virtual directory.

use std::path::Path;

use async_trait::async_trait;
use folio_core::keys;
use folio_core::models::media::Media;
use uuid::Uuid;

use crate::error::StorageError;

pub mod local;
pub mod s3;

pub use local::LocalMediaStore;
pub use s3::S3MediaStore;

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Register the file at `temp_path` as media named `filename`.
    ///
    /// The file is consumed: on success it no longer exists at `temp_path`.
    async fn persist_temp_file(
        &self,
        filename: &str,
        temp_path: &Path,
        owner: Option<Uuid>,
        directory: Option<Uuid>,
    ) -> Result<Media, StorageError>;

    /// Create a virtual directory, optionally nested in `parent`.
    async fn create_directory(
        &self,
        name: &str,
        owner: Option<Uuid>,
        parent: Option<Uuid>,
    ) -> Result<Media, StorageError>;

    async fn get(&self, id: Uuid) -> Result<Media, StorageError>;

    /// Read the stored bytes of a media file.
    async fn read(&self, id: Uuid) -> Result<Vec<u8>, StorageError>;
}

/// Fail unless `id` names an existing virtual directory.
pub async fn ensure_directory<S>(store: &S, id: Uuid) -> Result<(), StorageError>
where
    S: MediaStore + ?Sized,
{
    let media = store.get(id).await.map_err(|e| match e {
        StorageError::NotFound { .. } => StorageError::DirectoryNotFound(id),
        other => other,
    })?;
    if !media.is_directory {
        return Err(StorageError::NotADirectory(id));
    }
    Ok(())
}

/// Guess a MIME type from the file extension.
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub(crate) fn checked_name(name: &str) -> Result<&str, StorageError> {
    keys::validate_file_name(name).map_err(|_| StorageError::InvalidFilename(name.to_string()))
}
