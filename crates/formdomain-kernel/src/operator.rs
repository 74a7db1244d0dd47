//! The closed set of leaf operators.
//!
//! Six operators cannot be decided from a context snapshot: pattern
//! matching and hierarchy membership both need stored data. They evaluate
//! to `true` locally and the server enforces them for real.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A leaf comparison operator, spelled exactly as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "ilike")]
    ILike,
    #[serde(rename = "not like")]
    NotLike,
    #[serde(rename = "not ilike")]
    NotILike,
    #[serde(rename = "child_of")]
    ChildOf,
    #[serde(rename = "not child_of")]
    NotChildOf,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Self::Eq,
        Self::Gt,
        Self::Lt,
        Self::Le,
        Self::Ge,
        Self::Ne,
        Self::In,
        Self::NotIn,
        Self::Like,
        Self::ILike,
        Self::NotLike,
        Self::NotILike,
        Self::ChildOf,
        Self::NotChildOf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Ne => "!=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::NotLike => "not like",
            Self::NotILike => "not ilike",
            Self::ChildOf => "child_of",
            Self::NotChildOf => "not child_of",
        }
    }

    /// Look up an operator by its wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// Whether a context snapshot is enough to decide a leaf using this
    /// operator. When it is not, local evaluation approximates `true`.
    pub fn is_locally_decidable(self) -> bool {
        !matches!(
            self,
            Self::Like
                | Self::ILike
                | Self::NotLike
                | Self::NotILike
                | Self::ChildOf
                | Self::NotChildOf
        )
    }

    /// `child_of` / `not child_of`: the fourth leaf element names the
    /// parent field to walk rather than a reference target model.
    pub fn is_hierarchical(self) -> bool {
        matches!(self, Self::ChildOf | Self::NotChildOf)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown operator: {s}"))
    }
}
