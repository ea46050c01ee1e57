//! Error types for type registration and parsing.

use thiserror::Error;

/// Result type for type registry operations.
pub type TypeResult<T> = Result<T, TypeError>;

/// A parser rejected its input.
#[derive(Debug, Clone, Error)]
#[error("cannot parse {value:?} as {type_name}: {message}")]
pub struct ParseError {
    /// Name of the type that was requested.
    pub type_name: String,
    /// Textual form of the rejected input.
    pub value: String,
    /// What the parser objected to.
    pub message: String,
}

impl ParseError {
    /// Create a parse error for the given type and input.
    pub fn new(
        type_name: impl Into<String>,
        value: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in the type registry.
#[derive(Debug, Clone, Error)]
pub enum TypeError {
    /// No parser is registered under the name.
    #[error("unknown type: {name}")]
    UnknownType { name: String },

    /// A parser is already registered under the name.
    #[error("duplicate type: {name}")]
    DuplicateType { name: String },

    /// The parser rejected the raw value.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
