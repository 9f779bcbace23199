//! Error types for impress-columns
//!
//! Selection is all-or-nothing: every failure surfaces as a
//! [`SelectError`] and no partial result is returned.

use thiserror::Error;

/// Errors raised while composing or resolving a column selector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// A string matcher was applied to a value that is not a string
    #[error("Type mismatch: {matcher} requires a string label, got {value}")]
    TypeMismatch { matcher: String, value: String },

    /// The referenced level does not exist in the column index
    #[error("Level not found: {level}")]
    LevelNotFound { level: String },

    /// Structurally illegal combination of selector nodes
    #[error("Invalid composition: {0}")]
    InvalidComposition(String),

    /// An operand that is neither a selector, the rest marker, nor a scalar
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// A regular expression failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A column index violates its shape invariants
    #[error("Invalid column index: {0}")]
    InvalidIndex(String),
}

/// Result type for selector operations
pub type SelectResult<T> = Result<T, SelectError>;

impl SelectError {
    /// Create a type mismatch error for a matcher and the offending value
    pub fn type_mismatch(matcher: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self::TypeMismatch {
            matcher: matcher.into(),
            value: value.to_string(),
        }
    }

    /// Create a level-not-found error
    pub fn level_not_found(level: impl std::fmt::Display) -> Self {
        Self::LevelNotFound {
            level: level.to_string(),
        }
    }
}
