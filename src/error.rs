use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request is malformed or internally inconsistent. Raised before
    /// any page is laid out.
    #[error("invalid report request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }
}
