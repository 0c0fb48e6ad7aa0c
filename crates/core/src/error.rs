//! Error types for the art-forge core.

use thiserror::Error;

/// Errors produced by generator construction, rendering, and image I/O.
#[derive(Debug, Error)]
pub enum GenError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter was present but outside its allowed range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// No generator is registered under the requested name.
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    /// A source image could not be opened or decoded.
    #[error("cannot decode image: {0}")]
    Decode(String),

    /// An output file or directory could not be written.
    #[error("i/o error: {0}")]
    Io(String),

    /// The render was interrupted through its cancel token.
    #[error("render cancelled")]
    Cancelled,
}

impl GenError {
    /// Shorthand for [`GenError::InvalidParameter`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        GenError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
