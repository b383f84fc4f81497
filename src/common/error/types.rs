//! Error type definitions.
use thiserror::Error;

/// Main error type for odfgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The upstream parser does not recognise the input
    #[error("Unsupported input format")]
    UnsupportedFormat,

    /// The input is encrypted and cannot be opened with the given credentials
    #[error("Encrypted document: {0}")]
    Encrypted(String),

    /// The upstream parser gave up while decoding the input
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// A single-use object was invoked a second time
    #[error("Conversion already performed; create a new filter for each document")]
    AlreadyUsed,

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),
}

/// Result type for odfgen operations.
pub type Result<T> = std::result::Result<T, Error>;
