use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
