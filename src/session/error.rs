use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode token: {0}")]
    Encode(String),
    #[error("token store lock poisoned")]
    Poisoned,
}
