//! Error types for xlrich-core

use thiserror::Error;
use xlrich_dom::XmlError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing rich text
#[derive(Debug, Error)]
pub enum Error {
    /// Run index outside `[0, len)`
    #[error("Index {index} out of range (count: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Failure in the backing XML tree
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// A property value that cannot be stored
    #[error("Invalid value for {property}: {value}")]
    InvalidValue {
        property: &'static str,
        value: String,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create an out-of-range error for `index` in a sequence of `len` items
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }
}
