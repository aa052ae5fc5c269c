//! Error types for condition compiling.

use crate::expr::SyntaxError;

/// Why a query could not be compiled into conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not an expression at all.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    /// The tree has a shape other than `field == 'value'` joined by `and`.
    #[error("unsupported expression: {found}")]
    UnsupportedExpression { found: &'static str },

    /// A well-formed equality on a field that is not a known keyword.
    #[error("unsupported condition on field `{field}`")]
    UnsupportedCondition { field: String },

    /// The same field appears twice in one chain under strict compiling.
    #[error("conflicting conditions on field `{field}`")]
    ConflictingCondition { field: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
