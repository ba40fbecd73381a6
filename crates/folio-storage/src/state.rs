//! JSON records stored as S3 objects.

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::Bucket;

impl Bucket {
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<T, StorageError> {
        let body = self.get(key).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(value)?;
        self.put(key, body, "application/json").await
    }
}
