use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("directory not found: {0}")]
    DirectoryNotFound(Uuid),

    #[error("media is not a directory: {0}")]
    NotADirectory(Uuid),

    #[error("media is a directory: {0}")]
    IsADirectory(Uuid),

    #[error("invalid file name: {0:?}")]
    InvalidFilename(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),
}
