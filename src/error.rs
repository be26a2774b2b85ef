//! Custom error types and result handling for Hondana operations.
//!
//! Only failures that make a whole scan meaningless end up here. Problems with a
//! single comic or chapter are absorbed at that item and reported as
//! [`ScanWarning`](crate::types::ScanWarning)s instead.
//!
use std::path::PathBuf;

/// Type alias for Results with Hondana errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all Hondana operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O errors from the standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    LibraryConfigBuilder(#[from] crate::library::LibraryConfigBuilderError),
    /// The library root exists but cannot be used as one
    #[error("The given path '{0:?}' is invalid: {1}")]
    InvalidPath(PathBuf, String),
    /// A comic, chapter or library root that was explicitly asked for is missing
    #[error("Not found: {0}")]
    NotFound(String),
    /// A favorites call was made without a comic name
    #[error("Comic name must not be empty")]
    EmptyComicName,
    /// Other errors that don't fit into specific categories
    #[error("Other error: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
