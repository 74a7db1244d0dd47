//! Wire form → [`Domain`].
//!
//! The wire form is a JSON list:
//! - `[]` is the vacuous domain,
//! - `["OR", d1, d2, …]` is a disjunction,
//! - `["AND", d1, d2, …]` and `[d1, d2, …]` are conjunctions,
//! - `[field, operator, value]` (optionally with a fourth `altField`) is a leaf.
//!
//! A leaf and a three-element conjunction share a shape, so the leaf test
//! runs before the list is read as a conjunction.

use crate::domain::{Domain, Leaf};
use crate::error::DomainError;
use crate::operator::Operator;
use crate::value::Value;

const OR_MARKER: &str = "OR";
const AND_MARKER: &str = "AND";

/// Parse a domain from its JSON wire form.
pub fn parse(json: &serde_json::Value) -> Result<Domain, DomainError> {
    parse_at(json, "$")
}

/// Parse a domain from JSON text.
pub fn parse_str(text: &str) -> Result<Domain, DomainError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    parse(&json)
}

/// Whether `json` has the shape of a leaf: at least three elements, the
/// second being a known operator spelling.
pub fn is_leaf(json: &serde_json::Value) -> bool {
    json.as_array().is_some_and(|items| leaf_operator(items).is_some())
}

fn leaf_operator(items: &[serde_json::Value]) -> Option<Operator> {
    if items.len() < 3 {
        return None;
    }
    items[1].as_str().and_then(Operator::parse)
}

fn parse_at(json: &serde_json::Value, path: &str) -> Result<Domain, DomainError> {
    let items = json.as_array().ok_or_else(|| DomainError::NotAList {
        path: path.to_string(),
        found: describe(json).to_string(),
    })?;

    if items.is_empty() {
        return Ok(Domain::empty());
    }

    let (is_or, offset) = match items[0].as_str() {
        Some(OR_MARKER) => (true, 1),
        Some(AND_MARKER) => (false, 1),
        _ => {
            if let Some(operator) = leaf_operator(items) {
                return parse_leaf(items, operator, path).map(Domain::Leaf);
            }
            (false, 0)
        }
    };

    let children = items[offset..]
        .iter()
        .enumerate()
        .map(|(i, item)| parse_child(item, &format!("{path}[{}]", i + offset)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(if is_or {
        Domain::or(children)
    } else {
        Domain::and(children)
    })
}

fn parse_child(json: &serde_json::Value, path: &str) -> Result<Domain, DomainError> {
    if let Some(marker @ (OR_MARKER | AND_MARKER)) = json.as_str() {
        return Err(DomainError::MisplacedMarker {
            marker: marker.to_string(),
            path: path.to_string(),
        });
    }
    parse_at(json, path)
}

fn parse_leaf(
    items: &[serde_json::Value],
    operator: Operator,
    path: &str,
) -> Result<Leaf, DomainError> {
    if items.len() > 4 {
        return Err(DomainError::LeafTooLong {
            path: path.to_string(),
            len: items.len(),
        });
    }
    let field = items[0]
        .as_str()
        .ok_or_else(|| DomainError::FieldNotString {
            path: path.to_string(),
        })?;
    let value = Value::from_json(&items[2])?;
    let alt_field = match items.get(3) {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(alt)) => Some(alt.clone()),
        Some(_) => {
            return Err(DomainError::AltFieldNotString {
                path: path.to_string(),
            });
        }
    };
    Ok(Leaf {
        field: field.to_string(),
        operator,
        value,
        alt_field,
    })
}

fn describe(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_list_is_vacuous_conjunction() {
        assert_eq!(parse(&json!([])).unwrap(), Domain::empty());
    }

    #[test]
    fn leaf_detection_holds_for_every_operator() {
        for op in Operator::ALL {
            let literal = json!(["x", op.as_str(), 1]);
            assert!(is_leaf(&literal), "{op}");
            let parsed = parse(&literal).unwrap();
            assert_eq!(parsed, Domain::leaf("x", op, 1));
        }
        assert!(!is_leaf(&json!(["x", "~", 1])));
        assert!(!is_leaf(&json!(["x", "="])));
    }

    #[test]
    fn three_element_conjunction_is_not_a_leaf() {
        let parsed = parse(&json!([["a", "=", 1], ["b", "=", 2], ["c", "=", 3]])).unwrap();
        let Domain::And(j) = parsed else {
            panic!("expected a conjunction");
        };
        assert_eq!(j.len(), 3);
        assert!(j.children().iter().all(|c| c.as_leaf().is_some()));
    }

    #[test]
    fn markers_select_the_junction_kind() {
        let or = parse(&json!(["OR", ["x", "=", 3], ["y", ">", 5]])).unwrap();
        assert_eq!(
            or,
            Domain::or(vec![
                Domain::leaf("x", Operator::Eq, 3),
                Domain::leaf("y", Operator::Gt, 5),
            ])
        );
        let and = parse(&json!(["AND", ["x", "=", 3]])).unwrap();
        assert_eq!(and, Domain::and(vec![Domain::leaf("x", Operator::Eq, 3)]));
        assert_eq!(and, parse(&json!([["x", "=", 3]])).unwrap());
    }

    #[test]
    fn nested_junctions_cache_variables() {
        let parsed = parse(&json!([
            ["x", "=", 1],
            ["OR", ["y.code", "=", "fr"], [["z", "!=", null]]]
        ]))
        .unwrap();
        let vars: Vec<_> = parsed.variables().iter().cloned().collect();
        assert_eq!(vars, vec!["x", "y", "z"]);
    }

    #[test]
    fn alt_field_is_kept() {
        let parsed = parse(&json!(["parent", "child_of", [1], "parent"])).unwrap();
        let leaf = parsed.as_leaf().unwrap();
        assert_eq!(leaf.alt_field.as_deref(), Some("parent"));
        assert_eq!(parsed.to_json(), json!(["parent", "child_of", [1], "parent"]));
    }

    #[test]
    fn malformed_input_reports_a_path() {
        assert_eq!(
            parse(&json!([["x", "=", 1], 5])).unwrap_err(),
            DomainError::NotAList {
                path: "$[1]".to_string(),
                found: "a number".to_string(),
            }
        );
        assert!(matches!(
            parse(&json!(["OR", ["x", "=", 1], "AND"])),
            Err(DomainError::MisplacedMarker { .. })
        ));
        assert!(matches!(
            parse(&json!([3, "=", 1])),
            Err(DomainError::FieldNotString { .. })
        ));
        assert!(matches!(
            parse(&json!(["x", "=", 1, "m", "extra"])),
            Err(DomainError::LeafTooLong { len: 5, .. })
        ));
        assert!(matches!(parse_str("[["), Err(DomainError::Json(_))));
    }

    #[test]
    fn wire_form_round_trips() {
        let literal = json!([["x", "=", 3], ["OR", ["y", "in", [1, 2]], ["z.id", ">", 5, "m"]]]);
        assert_eq!(parse(&literal).unwrap().to_json(), literal);
    }
}
