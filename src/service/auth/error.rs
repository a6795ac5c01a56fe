use crate::service::{session::SessionError, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Login refused until the address is confirmed; resend is available.
    #[error("{0}")]
    EmailNotVerified(String),
    #[error("Failed to store credential: {0}")]
    Session(#[from] SessionError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl AuthError {
    pub fn can_resend_verification(&self) -> bool {
        matches!(self, AuthError::EmailNotVerified(_))
    }
}
