//! Storage key conventions.
//!
//! Pure string functions — no storage SDK dependency. These define the
//! canonical layout of media objects, shared by every `MediaStore` backend.

use uuid::Uuid;

use crate::error::CoreError;

pub const MEDIA_PREFIX: &str = "media/";

/// Key of the JSON record describing a media entry.
pub fn media_record(id: Uuid) -> String {
    format!("media/{id}.json")
}

/// Key of the stored bytes of a media file.
pub fn media_object(id: Uuid, file_name: &str) -> String {
    format!("media/{id}/{file_name}")
}

/// Check that a file name is usable as the last segment of a key.
///
/// Rejects empty names, path separators and dot segments so a name can never
/// escape its media folder.
pub fn validate_file_name(name: &str) -> Result<&str, CoreError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(CoreError::InvalidKey(name.to_string()));
    }
    Ok(name)
}
