use super::{http::HttpError, session::SessionError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No session credential. Components treat this as a silent no-op.
    #[error("Authentication required")]
    AuthRequired,
    /// Non-2xx response (`status` set) or transport failure (`status` empty).
    #[error("{message}")]
    Request { status: Option<u16>, message: String },
    /// Local input rejected before dispatch.
    #[error("{0}")]
    Validation(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ServiceError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ServiceError::AuthRequired)
    }

    /// Text for the user. `None` for errors that are never shown.
    pub fn user_message(&self, fallback: &str) -> Option<String> {
        if self.is_auth_required() {
            return None;
        }
        let message = self.to_string();
        if message.trim().is_empty() {
            Some(fallback.to_string())
        } else {
            Some(message)
        }
    }
}

impl From<HttpError> for ServiceError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Unauthenticated => ServiceError::AuthRequired,
            HttpError::Status { status, message } => ServiceError::Request {
                status: Some(status),
                message,
            },
            HttpError::Transport(e) => ServiceError::Request {
                status: None,
                message: e.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Decode(e.to_string())
    }
}
