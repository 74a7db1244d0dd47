//! Truth of a single leaf against a context snapshot.
//!
//! Local evaluation favours availability over strictness. Whenever the
//! answer depends on data the client does not hold, or the operands cannot
//! be compared, the leaf is approximated rather than reported as an error;
//! the server re-validates every leaf anyway.

use crate::domain::Leaf;
use crate::eval::Bias;
use crate::operator::Operator;
use crate::value::{Context, Value};
use chrono::{NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Decide `leaf` against `context`.
///
/// `bias` only matters when information is missing: it picks the default
/// for relational leaves whose base field is unset, and enables the
/// equality heuristic under `And`.
pub fn eval_leaf(leaf: &Leaf, context: &Context, bias: Bias) -> bool {
    if !leaf.operator.is_locally_decidable() {
        return true;
    }

    if leaf.is_relational() {
        // The related record is not loaded; a set base field is the best
        // local evidence that the leaf can hold.
        return match context.get(leaf.base()) {
            Some(value) if value.is_truthy() => true,
            _ => bias.identity(),
        };
    }

    let known = context.get(&leaf.field);

    // Another inversion is expected to fill this field consistently.
    if leaf.operator == Operator::Eq && bias == Bias::And && known.is_none() {
        return true;
    }

    let mut lhs = match known {
        Some(value) => Cow::Borrowed(value),
        None => Cow::Owned(Value::Null),
    };
    let mut rhs = Cow::Borrowed(&leaf.value);
    substitute_min_dates(&mut lhs, &mut rhs);
    coerce_pairs(&mut lhs, &mut rhs);

    apply(leaf.operator, &lhs, &rhs).unwrap_or(true)
}

/// An empty side compared against a date takes the earliest representable
/// date, so ordering always resolves the same way.
fn substitute_min_dates(lhs: &mut Cow<'_, Value>, rhs: &mut Cow<'_, Value>) {
    if let Some(min) = min_of_kind(lhs) {
        if !rhs.is_truthy() {
            *rhs = Cow::Owned(min);
        }
    } else if let Some(min) = min_of_kind(rhs) {
        if !lhs.is_truthy() {
            *lhs = Cow::Owned(min);
        }
    }
}

fn min_of_kind(value: &Value) -> Option<Value> {
    match value {
        Value::Date(_) => Some(Value::Date(NaiveDate::MIN)),
        Value::DateTime(_) => Some(Value::DateTime(NaiveDateTime::MIN)),
        _ => None,
    }
}

/// Bring `"model,id"` strings and `[model, id]` pairs to the string form.
/// A pair that does not render keeps its original shape.
fn coerce_pairs(lhs: &mut Cow<'_, Value>, rhs: &mut Cow<'_, Value>) {
    if matches!(**lhs, Value::String(_)) {
        if let Some(text) = rhs.pair_text() {
            *rhs = Cow::Owned(Value::String(text));
        }
    } else if matches!(**rhs, Value::String(_)) {
        if let Some(text) = lhs.pair_text() {
            *lhs = Cow::Owned(Value::String(text));
        }
    }
}

/// `None` when the operands cannot be compared.
fn apply(operator: Operator, lhs: &Value, rhs: &Value) -> Option<bool> {
    match operator {
        Operator::Eq => Some(lhs.loose_eq(rhs)),
        Operator::Ne => Some(!lhs.loose_eq(rhs)),
        Operator::Gt => lhs.compare(rhs).map(Ordering::is_gt),
        Operator::Lt => lhs.compare(rhs).map(Ordering::is_lt),
        Operator::Ge => lhs.compare(rhs).map(Ordering::is_ge),
        Operator::Le => lhs.compare(rhs).map(Ordering::is_le),
        Operator::In => contains(lhs, rhs),
        Operator::NotIn => contains(lhs, rhs).map(|found| !found),
        Operator::Like
        | Operator::ILike
        | Operator::NotLike
        | Operator::NotILike
        | Operator::ChildOf
        | Operator::NotChildOf => Some(true),
    }
}

/// Membership; a collection on the left matches when any element does.
fn contains(lhs: &Value, rhs: &Value) -> Option<bool> {
    match (lhs, rhs) {
        (Value::List(items), Value::List(candidates)) => Some(
            items
                .iter()
                .any(|item| candidates.iter().any(|c| c.loose_eq(item))),
        ),
        (Value::List(items), needle) => Some(items.iter().any(|item| item.loose_eq(needle))),
        (needle, Value::List(candidates)) => Some(candidates.iter().any(|c| c.loose_eq(needle))),
        (Value::String(needle), Value::String(haystack)) => Some(haystack.contains(needle.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(field: &str, op: Operator, value: impl Into<Value>) -> Leaf {
        Leaf::new(field, op, value)
    }

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn equality_against_known_values() {
        let l = leaf("x", Operator::Eq, 3);
        assert!(eval_leaf(&l, &Context::new().with("x", 3), Bias::And));
        assert!(!eval_leaf(&l, &Context::new().with("x", 4), Bias::And));
        assert!(eval_leaf(&l, &Context::new().with("x", 3.0), Bias::Or));
    }

    #[test]
    fn equality_gets_benefit_of_the_doubt_when_unknown_under_and() {
        let l = leaf("x", Operator::Eq, 3);
        assert!(eval_leaf(&l, &Context::new(), Bias::And));
        assert!(!eval_leaf(&l, &Context::new(), Bias::Or));
        // Known-empty and other falsy values are not "missing".
        assert!(!eval_leaf(&l, &Context::new().with("x", Value::Null), Bias::And));
        assert!(!eval_leaf(&l, &Context::new().with("x", 0), Bias::And));
    }

    #[test]
    fn relational_leaf_follows_base_truthiness() {
        let l = leaf("x.id", Operator::Gt, 5);
        assert!(eval_leaf(&l, &Context::new().with("x", 3), Bias::Or));
        assert!(!eval_leaf(&l, &Context::new().with("x", Value::Null), Bias::Or));
        assert!(!eval_leaf(&l, &Context::new(), Bias::Or));
        assert!(eval_leaf(&l, &Context::new(), Bias::And));
    }

    #[test]
    fn undecidable_operators_are_true() {
        let ctx = Context::new().with("name", "Bob");
        for op in Operator::ALL.into_iter().filter(|op| !op.is_locally_decidable()) {
            assert!(eval_leaf(&leaf("name", op, "zzz%"), &ctx, Bias::Or), "{op}");
        }
    }

    #[test]
    fn empty_side_becomes_minimal_date() {
        let after = leaf("start", Operator::Gt, date(2020, 1, 1));
        assert!(!eval_leaf(&after, &Context::new().with("start", Value::Null), Bias::And));
        let before = leaf("start", Operator::Lt, date(2020, 1, 1));
        assert!(eval_leaf(&before, &Context::new(), Bias::Or));
        let not_before = leaf("start", Operator::Ge, Value::Null);
        assert!(eval_leaf(&not_before, &Context::new().with("start", date(1999, 5, 1)), Bias::And));
    }

    #[test]
    fn pair_and_string_encodings_meet() {
        let l = leaf(
            "origin",
            Operator::Eq,
            Value::List(vec!["sale.sale".into(), 4.into()]),
        );
        assert!(eval_leaf(&l, &Context::new().with("origin", "sale.sale,4"), Bias::Or));
        let l = leaf("origin", Operator::Eq, "sale.sale,4");
        let ctx = Context::new().with("origin", Value::List(vec!["sale.sale".into(), 4.into()]));
        assert!(eval_leaf(&l, &ctx, Bias::Or));
    }

    #[test]
    fn unrenderable_pair_compares_as_is() {
        let l = leaf(
            "origin",
            Operator::Eq,
            Value::List(vec![Value::Null, 4.into()]),
        );
        assert!(!eval_leaf(&l, &Context::new().with("origin", "sale.sale,4"), Bias::Or));
    }

    #[test]
    fn membership_with_collections_on_either_side() {
        let l = leaf("tags", Operator::In, Value::List(vec![1.into(), 2.into()]));
        let hit = Context::new().with("tags", Value::List(vec![5.into(), 2.into()]));
        let miss = Context::new().with("tags", Value::List(vec![5.into(), 6.into()]));
        assert!(eval_leaf(&l, &hit, Bias::Or));
        assert!(!eval_leaf(&l, &miss, Bias::Or));
        let not_in = leaf("tags", Operator::NotIn, Value::List(vec![1.into(), 2.into()]));
        assert!(eval_leaf(&not_in, &miss, Bias::Or));
        assert!(eval_leaf(&leaf("x", Operator::In, Value::List(vec![3.into()])), &Context::new().with("x", 3), Bias::Or));
    }

    #[test]
    fn mismatched_kinds_approximate_true() {
        let l = leaf("x", Operator::Gt, 5);
        assert!(eval_leaf(&l, &Context::new().with("x", "abc"), Bias::Or));
        assert!(eval_leaf(&l, &Context::new(), Bias::Or));
        let l = leaf("x", Operator::In, 5);
        assert!(eval_leaf(&l, &Context::new().with("x", 5), Bias::Or));
    }
}
