//! Error types shared across StitchKit crates.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Color string parse error
///
/// Raised when a hex color string (as produced by color-picker widgets)
/// cannot be parsed back into a [`crate::Color`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Missing leading '#'
    #[error("color string must start with '#': {input:?}")]
    MissingHash {
        /// The rejected input.
        input: String,
    },

    /// Wrong number of digits
    #[error("color string must have exactly six hex digits: {input:?}")]
    BadLength {
        /// The rejected input.
        input: String,
    },

    /// Non-hex digit encountered
    #[error("invalid hex digit in color string: {input:?}")]
    InvalidDigit {
        /// The rejected input.
        input: String,
    },
}
