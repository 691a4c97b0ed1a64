//! # Error Types
//!
//! Errors raised while constructing shared value types.

use thiserror::Error;

/// Errors produced when parsing a `TokenAmount` from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenAmountError {
    /// The input was empty.
    #[error("Token amount is empty")]
    Empty,

    /// The input contained something other than ASCII digits.
    #[error("Token amount contains non-digit character {found:?} at position {position}")]
    NonDigit { found: char, position: usize },
}
