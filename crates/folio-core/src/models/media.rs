use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys;

/// A persisted file, or a virtual directory grouping other media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: Uuid,
    /// Name the file was registered under.
    pub original_name: String,
    /// Name of the stored object, the last segment of `storage_key`.
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub is_directory: bool,
    /// Owning user, if any.
    pub owner: Option<Uuid>,
    /// Containing virtual directory, if any.
    pub parent: Option<Uuid>,
    /// Empty for directories.
    pub storage_key: String,
    pub created_at: jiff::Timestamp,
}

impl Media {
    /// Build the record for a file about to be stored under `file_name`.
    pub fn file(
        file_name: &str,
        content_type: &str,
        size: u64,
        owner: Option<Uuid>,
        parent: Option<Uuid>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            original_name: file_name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size,
            is_directory: false,
            owner,
            parent,
            storage_key: keys::media_object(id, file_name),
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn directory(name: &str, owner: Option<Uuid>, parent: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name: name.to_string(),
            file_name: name.to_string(),
            content_type: DIRECTORY_CONTENT_TYPE.to_string(),
            size: 0,
            is_directory: true,
            owner,
            parent,
            storage_key: String::new(),
            created_at: jiff::Timestamp::now(),
        }
    }
}

pub const DIRECTORY_CONTENT_TYPE: &str = "inode/directory";
