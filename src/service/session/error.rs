use crate::storage::StorageError;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}
