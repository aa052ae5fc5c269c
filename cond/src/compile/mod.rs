//! Condition compiler.
//!
//! Walks the generic expression tree and keeps only the narrow condition
//! language:
//!
//! ```text
//! condition ('and' condition)*
//! condition := <field> == '<value>'
//! field     := job | deployment | metric | origin
//! ```
//!
//! Anything else is rejected: other operators and connectives with
//! [`ParseError::UnsupportedExpression`], unknown fields with
//! [`ParseError::UnsupportedCondition`].

mod compiler;

pub use compiler::{compile, parse_query, parse_query_with, CompileOptions, DuplicatePolicy};
