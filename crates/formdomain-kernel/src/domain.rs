//! The domain tree.
//!
//! A domain is one of:
//! - a **leaf** `(field, operator, value[, altField])`,
//! - a conjunction or disjunction of domains (a [`Junction`]),
//! - a resolved boolean, produced only by evaluation or inversion.
//!
//! Each junction caches the set of *base* fields reachable through its
//! leaves when it is built. Inversion consults that set at every level and
//! never recomputes it.

use crate::operator::Operator;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

/// Separator between a relation field and the field it reaches into.
pub const PATH_SEPARATOR: char = '.';

/// The top-level field a (possibly dotted) field path constrains.
///
/// `base_field("language.code") == "language"`.
pub fn base_field(path: &str) -> &str {
    path.split_once(PATH_SEPARATOR).map_or(path, |(base, _)| base)
}

/// An atomic constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
    /// For `child_of` / `not child_of`: the parent field walked by the
    /// hierarchy. For other operators on relation fields: the target model.
    pub alt_field: Option<String>,
}

impl Leaf {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            alt_field: None,
        }
    }

    pub fn with_alt_field(mut self, alt_field: impl Into<String>) -> Self {
        self.alt_field = Some(alt_field.into());
        self
    }

    pub fn base(&self) -> &str {
        base_field(&self.field)
    }

    /// Whether the leaf reaches into a related record (`a.b`).
    pub fn is_relational(&self) -> bool {
        self.field.contains(PATH_SEPARATOR)
    }

    /// The reference target model carried by a non-hierarchical leaf.
    pub fn target_model(&self) -> Option<&str> {
        if self.operator.is_hierarchical() {
            None
        } else {
            self.alt_field.as_deref()
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut parts = vec![
            serde_json::Value::String(self.field.clone()),
            serde_json::Value::String(self.operator.to_string()),
            self.value.to_json(),
        ];
        if let Some(alt) = &self.alt_field {
            parts.push(serde_json::Value::String(alt.clone()));
        }
        serde_json::Value::Array(parts)
    }
}

/// The children of an `And` / `Or` node together with their variables.
///
/// Fields are private so the cached variable set can never drift from the
/// children it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    children: Vec<Domain>,
    variables: BTreeSet<String>,
}

impl Junction {
    pub fn new(children: Vec<Domain>) -> Self {
        let mut variables = BTreeSet::new();
        for child in &children {
            match child {
                Domain::Leaf(leaf) => {
                    variables.insert(leaf.base().to_string());
                }
                Domain::And(j) | Domain::Or(j) => {
                    variables.extend(j.variables.iter().cloned());
                }
                Domain::Bool(_) => {}
            }
        }
        Self {
            children,
            variables,
        }
    }

    pub fn children(&self) -> &[Domain] {
        &self.children
    }

    /// Base fields reachable through any leaf of this subtree.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    pub fn mentions(&self, symbol: &str) -> bool {
        self.variables.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A parsed domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Domain {
    Leaf(Leaf),
    /// Conjunction; empty is `true`.
    And(Junction),
    /// Disjunction; empty is `false`.
    Or(Junction),
    Bool(bool),
}

impl Domain {
    pub fn and(children: Vec<Domain>) -> Self {
        Self::And(Junction::new(children))
    }

    pub fn or(children: Vec<Domain>) -> Self {
        Self::Or(Junction::new(children))
    }

    pub fn leaf(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self::Leaf(Leaf::new(field, operator, value))
    }

    /// The vacuous domain `[]`.
    pub fn empty() -> Self {
        Self::and(Vec::new())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Whether this is `And([])`.
    pub fn is_empty_and(&self) -> bool {
        matches!(self, Self::And(j) if j.is_empty())
    }

    /// Base fields mentioned anywhere in the domain.
    pub fn variables(&self) -> Cow<'_, BTreeSet<String>> {
        match self {
            Self::Leaf(leaf) => Cow::Owned(BTreeSet::from([leaf.base().to_string()])),
            Self::And(j) | Self::Or(j) => Cow::Borrowed(j.variables()),
            Self::Bool(_) => Cow::Owned(BTreeSet::new()),
        }
    }

    pub fn mentions(&self, symbol: &str) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.base() == symbol,
            Self::And(j) | Self::Or(j) => j.mentions(symbol),
            Self::Bool(_) => false,
        }
    }

    /// Encode to the wire form: `And` as a plain list, `Or` headed by
    /// `"OR"`, booleans as JSON booleans.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Leaf(leaf) => leaf.to_json(),
            Self::And(j) => serde_json::Value::Array(j.children.iter().map(Domain::to_json).collect()),
            Self::Or(j) => {
                let mut parts = Vec::with_capacity(j.len() + 1);
                parts.push(serde_json::Value::String("OR".to_string()));
                parts.extend(j.children.iter().map(Domain::to_json));
                serde_json::Value::Array(parts)
            }
            Self::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl From<Leaf> for Domain {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<bool> for Domain {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl TryFrom<serde_json::Value> for Domain {
    type Error = crate::error::DomainError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Bool(b) => Ok(Self::Bool(b)),
            other => crate::parse::parse(&other),
        }
    }
}

impl From<Domain> for serde_json::Value {
    fn from(domain: Domain) -> Self {
        domain.to_json()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_is_the_first_segment() {
        assert_eq!(base_field("language"), "language");
        assert_eq!(base_field("language.code"), "language");
        assert_eq!(base_field("a.b.c"), "a");
    }

    #[test]
    fn junction_caches_variables_from_immediate_children() {
        let inner = Domain::or(vec![
            Domain::leaf("y", Operator::Eq, 1),
            Domain::leaf("z.id", Operator::Gt, 2),
        ]);
        let outer = Junction::new(vec![Domain::leaf("x", Operator::Eq, 3), inner, Domain::Bool(true)]);
        let expected: BTreeSet<String> = ["x", "y", "z"].into_iter().map(String::from).collect();
        assert_eq!(outer.variables(), &expected);
        assert!(outer.mentions("z"));
        assert!(!outer.mentions("z.id"));
    }

    #[test]
    fn leaf_variables_and_mentions() {
        let leaf = Domain::leaf("x.code", Operator::Eq, "fr");
        assert!(leaf.mentions("x"));
        assert_eq!(leaf.variables().len(), 1);
        assert!(Domain::Bool(false).variables().is_empty());
    }

    #[test]
    fn wire_encoding_uses_or_marker_only() {
        let domain = Domain::and(vec![
            Domain::leaf("x", Operator::Eq, 3),
            Domain::or(vec![
                Domain::leaf("y", Operator::In, Value::List(vec![1.into(), 2.into()])),
                Leaf::new("p", Operator::ChildOf, 4).with_alt_field("parent").into(),
            ]),
        ]);
        assert_eq!(
            domain.to_json(),
            json!([["x", "=", 3], ["OR", ["y", "in", [1, 2]], ["p", "child_of", 4, "parent"]]])
        );
        assert_eq!(Domain::Bool(true).to_json(), json!(true));
        assert_eq!(Domain::empty().to_string(), "[]");
    }

    #[test]
    fn target_model_is_not_reported_for_hierarchy_leaves() {
        let reference = Leaf::new("origin.id", Operator::Eq, 4).with_alt_field("sale.sale");
        assert_eq!(reference.target_model(), Some("sale.sale"));
        let hierarchy = Leaf::new("parent", Operator::ChildOf, 4).with_alt_field("parent");
        assert_eq!(hierarchy.target_model(), None);
    }
}
