//! Generic expression tree.

use std::fmt;
use std::mem;

/// A node of the generic expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(Literal),
    /// Bare property or field reference (`job`)
    Field(String),
    /// Dotted navigation (`build.status`)
    Compound(Vec<Node>),
    Compare {
        op: CompareOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Str(String),
    /// Kept as written; nothing downstream does arithmetic.
    Number(String),
    Bool(bool),
    Null,
}

/// Relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==` or `eq`
    Eq,
    /// `!=` or `ne`
    Ne,
    /// `<` or `lt`
    Lt,
    /// `<=` or `le`
    Le,
    /// `>` or `gt`
    Gt,
    /// `>=` or `ge`
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl Node {
    pub(crate) fn compare(op: CompareOp, left: Node, right: Node) -> Self {
        Node::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Short name of this node's shape, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Node::Literal(Literal::Str(_)) => "string literal",
            Node::Literal(Literal::Number(_)) => "number literal",
            Node::Literal(Literal::Bool(_)) => "boolean literal",
            Node::Literal(Literal::Null) => "null literal",
            Node::Field(_) => "field reference",
            Node::Compound(_) => "compound reference",
            Node::Compare { op, .. } => op.as_str(),
            Node::And(..) => "and",
            Node::Or(..) => "or",
            Node::Not(_) => "not",
        }
    }
}

/// Iterative teardown: chains are left-nested and arbitrarily long.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

/// Move a node's children onto `pending`, leaving leaves in their place.
fn detach_children(node: &mut Node, pending: &mut Vec<Node>) {
    match node {
        Node::Compare { left, right, .. } | Node::And(left, right) | Node::Or(left, right) => {
            pending.push(mem::replace(left.as_mut(), Node::Literal(Literal::Null)));
            pending.push(mem::replace(right.as_mut(), Node::Literal(Literal::Null)));
        }
        Node::Not(inner) => pending.push(mem::replace(inner.as_mut(), Node::Literal(Literal::Null))),
        Node::Compound(parts) => pending.append(parts),
        Node::Literal(_) | Node::Field(_) => {}
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Number(n) => f.write_str(n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}

/// Fully parenthesized canonical form; parses back to the same tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(lit) => write!(f, "{}", lit),
            Node::Field(name) => f.write_str(name),
            Node::Compound(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
            Node::Compare { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Node::And(left, right) => write!(f, "({} and {})", left, right),
            Node::Or(left, right) => write!(f, "({} or {})", left, right),
            Node::Not(inner) => write!(f, "(not {})", inner),
        }
    }
}
