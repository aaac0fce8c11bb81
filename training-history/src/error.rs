use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage document error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session {0} is already finalized")]
    AlreadyFinalized(Uuid),

    #[error("Failed to encode session record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type SessionResult<T> = Result<T, SessionError>;
