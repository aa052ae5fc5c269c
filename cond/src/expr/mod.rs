//! Expression tree provider.
//!
//! Parses SpEL-style boolean text into a generic tree of [`Node`]s. The tree
//! is deliberately wider than the condition language: it carries `or`,
//! `not`, every relational operator and every literal kind, so the compiler
//! can tell a syntax error apart from a shape it does not support.
//!
//! # Syntax Overview
//!
//! - **Logical**: `or` / `||`, `and` / `&&`, prefix `not` / `!`
//! - **Relational**: `==`, `!=`, `<`, `<=`, `>`, `>=` (or `eq`, `ne`, `lt`, `le`, `gt`, `ge`)
//! - **Literals**: `'single'`, `"double"`, `42`, `-1.5`, `true`, `false`, `null`
//! - **References**: `job`, `build.status`
//! - **Grouping**: `( ... )`

mod ast;
mod parser;

pub use ast::{CompareOp, Literal, Node};
pub use parser::{parse_expression, SyntaxError, MAX_DEPTH};
pub(crate) use parser::KEYWORDS;
