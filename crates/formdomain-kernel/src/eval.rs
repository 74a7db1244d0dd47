//! Whole-domain evaluation over a complete context.
//!
//! Used when every field value is known, e.g. to validate a finished
//! record. Always returns a definite boolean.

use crate::domain::Domain;
use crate::leaf::eval_leaf;
use crate::value::Context;
use serde::{Deserialize, Serialize};

/// Which connective a leaf is evaluated under.
///
/// Only affects the default truth assigned when information is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    #[default]
    And,
    Or,
}

impl Bias {
    /// `true` for `And`, `false` for `Or`.
    pub fn identity(self) -> bool {
        matches!(self, Self::And)
    }
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

impl std::str::FromStr for Bias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            _ => Err(format!("unknown bias: {s}")),
        }
    }
}

/// Evaluate `domain` under the default `And` bias.
pub fn evaluate(domain: &Domain, context: &Context) -> bool {
    evaluate_with_bias(domain, context, Bias::And)
}

/// Evaluate `domain`; `bias` applies to a top-level leaf only, junction
/// children take the bias of their junction.
pub fn evaluate_with_bias(domain: &Domain, context: &Context, bias: Bias) -> bool {
    match domain {
        Domain::Leaf(leaf) => eval_leaf(leaf, context, bias),
        Domain::Bool(b) => *b,
        Domain::And(j) => j
            .children()
            .iter()
            .all(|child| evaluate_with_bias(child, context, Bias::And)),
        Domain::Or(j) => j
            .children()
            .iter()
            .any(|child| evaluate_with_bias(child, context, Bias::Or)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::value::Value;
    use serde_json::json;

    fn eval(literal: serde_json::Value, context: &Context) -> bool {
        evaluate(&parse(&literal).unwrap(), context)
    }

    #[test]
    fn single_equality() {
        assert!(eval(json!([["x", "=", 3]]), &Context::new().with("x", 3)));
        assert!(!eval(json!([["x", "=", 3]]), &Context::new().with("x", 4)));
    }

    #[test]
    fn empty_junctions_are_identities() {
        assert!(eval(json!([]), &Context::new()));
        assert!(!evaluate(&Domain::or(vec![]), &Context::new()));
        assert!(evaluate(&Domain::and(vec![]), &Context::new()));
    }

    #[test]
    fn conjunction_and_disjunction_fold() {
        let ctx = Context::new().with("x", 3).with("y", 7);
        assert!(eval(json!([["x", "=", 3], ["y", ">", 5]]), &ctx));
        assert!(!eval(json!([["x", "=", 3], ["y", "<", 5]]), &ctx));
        assert!(eval(json!(["OR", ["x", "=", 4], ["y", ">", 5]]), &ctx));
        assert!(!eval(json!(["OR", ["x", "=", 4], ["y", "<", 5]]), &ctx));
    }

    #[test]
    fn or_children_use_or_bias() {
        // Under And bias the unknown equality would be approximated true.
        let ctx = Context::new().with("y", 1);
        assert!(!eval(json!(["OR", ["x", "=", 3], ["y", "=", 2]]), &ctx));
        assert!(eval(json!([["x", "=", 3], ["y", "=", 1]]), &ctx));
    }

    #[test]
    fn nested_structure() {
        let literal = json!([
            ["state", "in", ["draft", "open"]],
            ["OR", ["amount", ">=", 100], [["manual", "=", true], ["user.id", "!=", null]]]
        ]);
        let ctx = Context::new()
            .with("state", "open")
            .with("amount", 10)
            .with("manual", true)
            .with("user", 4);
        assert!(eval(literal.clone(), &ctx));
        let ctx = ctx.with("manual", false);
        assert!(!eval(literal.clone(), &ctx));
        let ctx = ctx.with("state", Value::from("done")).with("amount", 500);
        assert!(!eval(literal, &ctx));
    }

    #[test]
    fn empty_required_field_fails_a_complete_record() {
        let ctx = Context::new().with("x", Value::Null);
        assert!(!eval(json!([["x", "=", 3]]), &ctx));
        assert!(eval(json!([["x", "=", null]]), &ctx));
    }

    #[test]
    fn bias_parses_case_insensitively() {
        assert_eq!("OR".parse::<Bias>().unwrap(), Bias::Or);
        assert_eq!(Bias::default(), Bias::And);
        assert!("xor".parse::<Bias>().is_err());
    }
}
