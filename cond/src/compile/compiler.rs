//! Tree walk from expression nodes to typed conditions.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::ParseError;
use crate::expr::{parse_expression, CompareOp, Literal, Node};

/// What to do when one AND chain names the same field twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the first condition for the field and drop the rest.
    #[default]
    Collapse,
    /// Fail with [`ParseError::ConflictingCondition`] when the values differ.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub duplicates: DuplicatePolicy,
}

impl CompileOptions {
    /// Options that refuse repeated fields.
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

/// Parse a query string into its list of conditions.
///
/// Conditions come back in the order they were first seen, at most one per
/// field.
pub fn parse_query(query: &str) -> Result<Vec<Condition>, ParseError> {
    parse_query_with(query, &CompileOptions::default())
}

/// [`parse_query`] with explicit options.
pub fn parse_query_with(query: &str, options: &CompileOptions) -> Result<Vec<Condition>, ParseError> {
    let result = parse_expression(query)
        .map_err(ParseError::from)
        .and_then(|tree| compile(&tree, options));

    match &result {
        Ok(conditions) => tracing::debug!(query, count = conditions.len(), "compiled query"),
        Err(err) => tracing::debug!(query, error = %err, "rejected query"),
    }
    result
}

/// Compile an already parsed tree.
///
/// The AND spine is walked with an explicit stack, so chain length is
/// bounded by memory rather than call depth. Shape errors are reported
/// left to right before any merge conflict.
pub fn compile(node: &Node, options: &CompileOptions) -> Result<Vec<Condition>, ParseError> {
    let mut found = Vec::new();
    let mut pending = vec![node];

    while let Some(node) = pending.pop() {
        match node {
            Node::Compare {
                op: CompareOp::Eq,
                left,
                right,
            } => found.push(condition_from_operands(left, right)?),

            Node::And(left, right) => {
                // Left on top so it is compiled, and fails, first.
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }

            other => {
                return Err(ParseError::UnsupportedExpression {
                    found: other.describe(),
                })
            }
        }
    }

    merge(found, options.duplicates)
}

/// `field == 'value'`: a bare field on the left, a string on the right.
fn condition_from_operands(left: &Node, right: &Node) -> Result<Condition, ParseError> {
    let Node::Field(field) = left else {
        return Err(ParseError::UnsupportedExpression {
            found: left.describe(),
        });
    };
    let Node::Literal(Literal::Str(value)) = right else {
        return Err(ParseError::UnsupportedExpression {
            found: right.describe(),
        });
    };

    Condition::from_field(field, value.as_str()).ok_or_else(|| ParseError::UnsupportedCondition {
        field: field.clone(),
    })
}

/// Set union keyed by field, first-seen order.
fn merge(found: Vec<Condition>, policy: DuplicatePolicy) -> Result<Vec<Condition>, ParseError> {
    let mut merged: Vec<Condition> = Vec::new();
    for condition in found {
        let differs = merged
            .iter()
            .find(|seen| **seen == condition)
            .map(|seen| seen.value() != condition.value());

        match differs {
            None => merged.push(condition),
            Some(true) if policy == DuplicatePolicy::Reject => {
                return Err(ParseError::ConflictingCondition {
                    field: condition.field(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(merged)
}
