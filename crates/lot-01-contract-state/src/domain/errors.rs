//! # Domain Errors
//!
//! Error types for contract-state decoding.
//!
//! A key that does not carry the requested prefix is not an error: it is a
//! routing signal and the entry is simply skipped.

use thiserror::Error;

/// Failure to decode a single field or record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateDecodeError {
    /// Buffer ended before the field did.
    #[error("Truncated at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        /// Offset where the field starts
        offset: usize,
        /// Bytes the field requires
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Text field is not valid UTF-8.
    #[error("Invalid UTF-8 text at offset {offset}")]
    InvalidText {
        /// Offset of the text bytes (after the length prefix)
        offset: usize,
    },

    /// Bytes left over after a fixed record, under the reject policy.
    #[error("Trailing bytes after record: consumed {consumed}, {remaining} left")]
    TrailingBytes {
        /// Bytes consumed by the record fields
        consumed: usize,
        /// Bytes not consumed
        remaining: usize,
    },
}

/// Failure to obtain or parse a storage dump.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateSourceError {
    /// The remote source could not be reached or returned an error.
    #[error("State source unavailable: {0}")]
    Unavailable(String),

    /// The dump envelope (JSON, base64) could not be parsed.
    #[error("Malformed state dump: {0}")]
    Malformed(String),
}
