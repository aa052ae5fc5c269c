//! Typed filter conditions produced by the compiler.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single recognized `field == 'value'` condition.
///
/// Equality and hashing look at the variant only: `Job("a") == Job("b")`.
/// A chain naming the same field twice therefore collapses to one
/// condition, and which value survives is up to the merge (the compiler
/// keeps the first one seen).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum Condition {
    Job(String),
    Deployment(String),
    Metric(String),
    Origin(String),
}

/// The field a [`Condition`] filters on, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Job,
    Deployment,
    Metric,
    Origin,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 4] = [
        ConditionKind::Job,
        ConditionKind::Deployment,
        ConditionKind::Metric,
        ConditionKind::Origin,
    ];

    /// The keyword naming this field in a query.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Job => "job",
            ConditionKind::Deployment => "deployment",
            ConditionKind::Metric => "metric",
            ConditionKind::Origin => "origin",
        }
    }

    /// Exact, case-sensitive keyword match.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == keyword)
    }
}

impl Condition {
    /// Build the condition for `field`, or `None` if it is not a known keyword.
    pub fn from_field(field: &str, value: impl Into<String>) -> Option<Self> {
        ConditionKind::from_keyword(field).map(|kind| Self::new(kind, value))
    }

    pub fn new(kind: ConditionKind, value: impl Into<String>) -> Self {
        let value = value.into();
        match kind {
            ConditionKind::Job => Condition::Job(value),
            ConditionKind::Deployment => Condition::Deployment(value),
            ConditionKind::Metric => Condition::Metric(value),
            ConditionKind::Origin => Condition::Origin(value),
        }
    }

    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::Job(_) => ConditionKind::Job,
            Condition::Deployment(_) => ConditionKind::Deployment,
            Condition::Metric(_) => ConditionKind::Metric,
            Condition::Origin(_) => ConditionKind::Origin,
        }
    }

    /// The matched field keyword.
    pub fn field(&self) -> &'static str {
        self.kind().as_str()
    }

    /// The string the field is compared against.
    pub fn value(&self) -> &str {
        match self {
            Condition::Job(v) | Condition::Deployment(v) | Condition::Metric(v) | Condition::Origin(v) => v,
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query syntax for this condition, e.g. `job == 'it''s'`.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == '{}'", self.field(), self.value().replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_value() {
        assert_eq!(Condition::Job("a".to_string()), Condition::Job("b".to_string()));
        assert_ne!(Condition::Job("a".to_string()), Condition::Origin("a".to_string()));
    }

    #[test]
    fn test_hash_set_keeps_one_per_kind() {
        let set: HashSet<Condition> = [
            Condition::Metric("cpu".to_string()),
            Condition::Metric("mem".to_string()),
            Condition::Deployment("prod".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_field() {
        let c = Condition::from_field("deployment", "prod").unwrap();
        assert_eq!(c.kind(), ConditionKind::Deployment);
        assert_eq!(c.value(), "prod");
        assert_eq!(c.field(), "deployment");
    }

    #[test]
    fn test_from_field_is_case_sensitive() {
        assert!(Condition::from_field("Job", "a").is_none());
        assert!(Condition::from_field("region", "a").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Condition::Job("foo".to_string()).to_string(), "job == 'foo'");
        assert_eq!(Condition::Origin("it's".to_string()).to_string(), "origin == 'it''s'");
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_string(&Condition::Metric("cpu".to_string())).unwrap();
        assert_eq!(json, r#"{"field":"metric","value":"cpu"}"#);

        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), "cpu");
        assert_eq!(back.kind(), ConditionKind::Metric);
    }
}
