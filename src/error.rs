use crate::{
    config::ConfigError,
    service::{AuthError, ServiceError},
    storage::StorageError,
};

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    /// A message already shown to the user by a component.
    #[error("{0}")]
    Surfaced(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
