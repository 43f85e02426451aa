use crate::core::value::ContainerKind;
use thiserror::Error;

/// Core error types for valtree
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A caller-supplied argument failed validation
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument { argument: String, message: String },

    /// The value kind cannot be deep-cloned
    ///
    /// Raised for callable values: reconstructing a closure from its source
    /// text is unsound in a compiled language, so cloning them is refused
    /// outright instead of producing a broken copy.
    #[error("cannot clone {0} values")]
    UnsupportedClone(ContainerKind),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`] with owned strings.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
