use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while accepting a single upload.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("missing Content-Length header")]
    MissingContentLength,

    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    #[error("filename header is not valid UTF-8")]
    InvalidFilename,

    #[error("request body ended after {received} of {expected} bytes")]
    IncompleteBody { expected: u64, received: u64 },

    #[error("failed to write upload to {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    /// Whether the fault lies with the caller rather than with this process.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SinkError::Storage { .. })
    }
}
