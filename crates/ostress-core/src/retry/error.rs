//! Error from one transfer attempt, before it is folded into an outcome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttemptError {
    /// libcurl reported a failure (timeout, connection, protocol).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Writing the response body to disk failed.
    #[error("local write failed: {0}")]
    Io(#[from] std::io::Error),
}
