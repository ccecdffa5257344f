//! Error types for the request core

use thiserror::Error;

/// Errors produced while issuing requests against the media server.
///
/// `Transport`, `Decode` and `Server` only ever occur on a request's worker
/// thread and are folded into the error flag of the delivered result; they
/// never cross the thread boundary as `Err`. `Precondition` is the one
/// variant raised synchronously to the caller of [`Core`](crate::core::Core).
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("precondition failed: {0}")]
    Precondition(&'static str),
}

impl Error {
    /// The human-readable message to surface in an error result, without the
    /// taxonomy prefix. For server errors this is the string the server put
    /// in the envelope's `error` field.
    pub fn message(&self) -> &str {
        match self {
            Error::Transport(s) | Error::Decode(s) | Error::Server(s) => s,
            Error::Precondition(s) => s,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
