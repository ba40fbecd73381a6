//! Temporary file helpers.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::error::{ExportError, fs_error};

/// Write `text` to `path`, replacing any existing file.
pub async fn create_file(path: &Path, text: &str) -> Result<(), ExportError> {
    fs::write(path, text)
        .await
        .map_err(|e| fs_error("write", path, e))
}

/// Remove the file at `path`. A missing file is an error.
pub async fn delete_file(path: &Path) -> Result<(), ExportError> {
    fs::remove_file(path)
        .await
        .map_err(|e| fs_error("remove", path, e))
}

/// Ensure `path` exists as a directory.
///
/// Creation is attempted directly; losing a race to another creator is
/// success as long as the result is a directory.
pub async fn safe_make_dir(path: &Path) -> Result<(), ExportError> {
    match fs::create_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let is_dir = fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false);
            if is_dir {
                Ok(())
            } else {
                Err(fs_error("create directory", path, e))
            }
        }
        Err(e) => Err(fs_error("create directory", path, e)),
    }
}
