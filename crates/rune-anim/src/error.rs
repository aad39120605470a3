//! Error types for parsing tagged animation values.

use thiserror::Error;

/// Result type for value parsing.
pub type Result<T> = std::result::Result<T, ValueError>;

/// Errors raised when a tagged string cannot be turned into a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Color string in none of the supported encodings.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Malformed SVG path data.
    #[error("invalid path data: {0}")]
    InvalidPath(String),

    /// Unknown value kind name.
    #[error("unknown value kind: {0:?}")]
    UnknownKind(String),

    /// Unknown easing curve name.
    #[error("unknown easing: {0:?}")]
    UnknownEasing(String),
}
