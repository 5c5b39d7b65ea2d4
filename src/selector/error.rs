//! Error types for selector compilation.

use thiserror::Error;

/// A selector expression that does not match the selector grammar.
///
/// Positions are byte offsets into the expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The expression is empty.
    #[error("Malformed selector: expression is empty")]
    Empty,
    /// Unexpected character at a specific position.
    #[error("Malformed selector '{expression}': unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        expression: String,
        position: usize,
        found: char,
        expected: String,
    },
    /// The expression ended in the middle of a segment.
    #[error("Malformed selector '{expression}': unexpected end of input, expected {expected}")]
    UnexpectedEnd { expression: String, expected: String },
    /// An index that does not fit in `usize`.
    #[error("Malformed selector '{expression}': invalid index '{index}' at position {position}")]
    InvalidIndex {
        expression: String,
        position: usize,
        index: String,
    },
}
