//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from dependency
//! error types to the unified Error type.

#[cfg(feature = "package")]
use super::types::Error;

#[cfg(feature = "package")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::ZipError(other.to_string()),
        }
    }
}
