//! Condition compiler for a restricted boolean query language.
//!
//! Queries such as `job == 'build' and deployment == 'prod'` are parsed into
//! a generic expression tree and then narrowed to a list of typed
//! [`Condition`]s for a downstream query engine.

pub mod compile;
pub mod condition;
pub mod config;
pub mod error;
pub mod expr;

pub use compile::{compile, parse_query, parse_query_with, CompileOptions, DuplicatePolicy};
pub use condition::{Condition, ConditionKind};
pub use config::Config;
pub use error::{Error, ParseError, Result};
pub use expr::{parse_expression, Node, SyntaxError};
