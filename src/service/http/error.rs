#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The call needs a bearer credential and none is held. Nothing was sent.
    #[error("Authentication required")]
    Unauthenticated,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}
