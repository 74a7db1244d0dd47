//! Tree rewrites over domains.
//!
//! - [`simplify`] strips singleton wrappers.
//! - [`merge`] flattens same-kind nesting; [`concat`] composes domains.
//! - [`localize`] / [`unlocalize`] move field paths into and out of a
//!   related record's own view (`language.code` ↔ `code`).
//! - The reference helpers rewrite leaves on `"model,id"` fields so the
//!   target model travels with the leaf.
//!
//! All rewrites return a new tree and preserve meaning.

use crate::domain::{Domain, Junction, Leaf, PATH_SEPARATOR};
use crate::eval::Bias;
use crate::operator::Operator;
use crate::value::Value;
use std::collections::BTreeSet;

/// Pseudo-field naming the related record itself inside its own view.
pub const ID_FIELD: &str = "id";

/// Remove redundant wrapping.
///
/// A junction with a single child collapses onto that child; a lone leaf
/// keeps exactly one wrapper (`[[f, op, v]]` → `[f, op, v]` inside a list),
/// so `simplify([[[x, "=", 3]]]) == [[x, "=", 3]]`. Leaves and booleans are
/// returned untouched. Idempotent.
pub fn simplify(domain: &Domain) -> Domain {
    match domain {
        Domain::Leaf(_) | Domain::Bool(_) => domain.clone(),
        Domain::And(j) | Domain::Or(j) if j.len() == 1 => {
            let inner = unwrap_singletons(&j.children()[0]);
            match inner {
                Domain::Leaf(_) | Domain::Bool(_) => Domain::and(vec![inner.clone()]),
                Domain::And(_) | Domain::Or(_) => simplify(inner),
            }
        }
        Domain::And(j) => Domain::and(simplify_children(j)),
        Domain::Or(j) => Domain::or(simplify_children(j)),
    }
}

fn simplify_children(junction: &Junction) -> Vec<Domain> {
    junction
        .children()
        .iter()
        .map(|child| {
            let inner = unwrap_singletons(child);
            match inner {
                Domain::Leaf(_) | Domain::Bool(_) => inner.clone(),
                Domain::And(_) | Domain::Or(_) => simplify(inner),
            }
        })
        .collect()
}

fn unwrap_singletons(mut domain: &Domain) -> &Domain {
    while let Domain::And(j) | Domain::Or(j) = domain {
        if j.len() != 1 {
            break;
        }
        domain = &j.children()[0];
    }
    domain
}

/// Flatten nested same-kind junctions into their parent.
///
/// `[a, [b, c], ["OR", d, ["OR", e]]]` becomes `[a, b, c, ["OR", d, e]]`.
/// A bare leaf comes back wrapped as a one-leaf conjunction. Resolved
/// booleans are absorbed: an identity operand is dropped and an absorbing
/// one (`false` under AND, `true` under OR) decides the whole junction.
pub fn merge(domain: &Domain) -> Domain {
    match domain {
        Domain::Leaf(_) => Domain::and(vec![domain.clone()]),
        Domain::Bool(_) => domain.clone(),
        Domain::And(j) => merged_children(j, false).map_or(Domain::Bool(false), Domain::and),
        Domain::Or(j) => merged_children(j, true).map_or(Domain::Bool(true), Domain::or),
    }
}

/// `None` when a child resolves to the junction's absorbing value, which
/// equals `is_or`.
fn merged_children(junction: &Junction, is_or: bool) -> Option<Vec<Domain>> {
    let mut out = Vec::with_capacity(junction.len());
    for child in junction.children() {
        match child {
            Domain::Bool(b) if *b == is_or => return None,
            Domain::Bool(_) => {}
            Domain::And(j) if !is_or => out.extend(merged_children(j, false)?),
            Domain::Or(j) if is_or => out.extend(merged_children(j, true)?),
            Domain::And(_) | Domain::Or(_) => match merge(child) {
                Domain::Bool(b) if b == is_or => return None,
                Domain::Bool(_) => {}
                merged => out.push(merged),
            },
            Domain::Leaf(_) => out.push(child.clone()),
        }
    }
    Some(out)
}

/// Conjunction of `domains`, merged and simplified.
pub fn concat(domains: &[Domain]) -> Domain {
    concat_with(domains, Bias::And)
}

/// Combine `domains` under `connective`, merged and simplified.
///
/// Operands may be inversion results: `[]` and `true` vanish under AND,
/// `false` vanishes under OR, and the absorbing boolean decides the result.
pub fn concat_with(domains: &[Domain], connective: Bias) -> Domain {
    let combined = match connective {
        Bias::And => Domain::and(domains.to_vec()),
        Bias::Or => Domain::or(domains.to_vec()),
    };
    simplify(&merge(&combined))
}

/// Rewrite leaves rooted at `field_name` into the related record's view.
///
/// `field_name.sub` becomes `sub`; the bare relation field becomes
/// [`ID_FIELD`], except on a `child_of` / `not child_of` leaf carrying an
/// `altField`, which is projected onto that parent field. Other leaves are
/// left as they are, and every `altField` is kept.
pub fn localize(domain: &Domain, field_name: &str) -> Domain {
    map_leaves(domain, &|leaf| {
        let field = if leaf.field == field_name {
            match &leaf.alt_field {
                Some(alt) if leaf.operator.is_hierarchical() => alt.clone(),
                _ => ID_FIELD.to_string(),
            }
        } else {
            match leaf
                .field
                .strip_prefix(field_name)
                .and_then(|rest| rest.strip_prefix(PATH_SEPARATOR))
            {
                Some(local) => local.to_string(),
                None => leaf.field.clone(),
            }
        };
        Leaf {
            field,
            ..leaf.clone()
        }
    })
}

/// Inverse of [`localize`]: prefix every leaf with `field_name`.
///
/// [`ID_FIELD`] maps back to the bare relation field, which compares the
/// same record as `field_name.id`. A hierarchy leaf standing on its own
/// `altField` maps back to the bare relation field too.
pub fn unlocalize(domain: &Domain, field_name: &str) -> Domain {
    map_leaves(domain, &|leaf| {
        let projected = leaf.operator.is_hierarchical()
            && leaf.alt_field.as_deref() == Some(leaf.field.as_str());
        let field = if leaf.field == ID_FIELD || projected {
            field_name.to_string()
        } else {
            format!("{field_name}{PATH_SEPARATOR}{}", leaf.field)
        };
        Leaf {
            field,
            ..leaf.clone()
        }
    })
}

fn map_leaves(domain: &Domain, rewrite: &dyn Fn(&Leaf) -> Leaf) -> Domain {
    match domain {
        Domain::Leaf(leaf) => Domain::Leaf(rewrite(leaf)),
        Domain::Bool(_) => domain.clone(),
        Domain::And(j) => Domain::and(map_children(j, rewrite)),
        Domain::Or(j) => Domain::or(map_children(j, rewrite)),
    }
}

fn map_children(junction: &Junction, rewrite: &dyn Fn(&Leaf) -> Leaf) -> Vec<Domain> {
    junction
        .children()
        .iter()
        .map(|child| map_leaves(child, rewrite))
        .collect()
}

/// Target models named by leaves on `field_name`.
pub fn extract_reference_models(domain: &Domain, field_name: &str) -> BTreeSet<String> {
    let mut models = BTreeSet::new();
    collect_models(domain, field_name, &mut models);
    models
}

fn collect_models(domain: &Domain, field_name: &str, out: &mut BTreeSet<String>) {
    match domain {
        Domain::Leaf(leaf) => {
            if leaf.base() == field_name {
                if let Some(model) = leaf.target_model() {
                    out.insert(model.to_string());
                }
            }
        }
        Domain::And(j) | Domain::Or(j) => {
            for child in j.children() {
                collect_models(child, field_name, out);
            }
        }
        Domain::Bool(_) => {}
    }
}

/// The literal a domain pins its single field to, if the domain is exactly
/// one non-relational `=` leaf.
pub fn unique_value(domain: &Domain) -> Option<&Value> {
    let leaf = match domain {
        Domain::Leaf(leaf) => leaf,
        Domain::And(j) if j.len() == 1 => j.children()[0].as_leaf()?,
        _ => return None,
    };
    (leaf.operator == Operator::Eq && !leaf.is_relational()).then_some(&leaf.value)
}

enum ReferenceId {
    Id(Value),
    /// `model,%`: any record of the model.
    Any,
}

fn split_reference(value: &Value) -> Option<(String, ReferenceId)> {
    match value {
        Value::String(text) => {
            let (model, id) = text.split_once(',')?;
            if id == "%" {
                Some((model.to_string(), ReferenceId::Any))
            } else {
                let id = id.trim().parse::<i64>().ok()?;
                Some((model.to_string(), ReferenceId::Id(Value::Int(id))))
            }
        }
        Value::List(items) => match items.as_slice() {
            [Value::String(model), Value::Int(id)] => {
                Some((model.clone(), ReferenceId::Id(Value::Int(*id))))
            }
            [Value::String(model), Value::String(any)] if any == "%" => {
                Some((model.clone(), ReferenceId::Any))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Rewrite leaves on the reference field `reference` (values shaped
/// `"model,id"` or `[model, id]`) into `reference.id` leaves that carry the
/// target model as their fourth element.
///
/// Leaves on `reference` that cannot be decoded become vacuous.
pub fn prepare_reference_domain(domain: &Domain, reference: &str) -> Domain {
    match domain {
        Domain::Leaf(leaf) if leaf.field == reference => prepare_reference_leaf(leaf, reference),
        Domain::Leaf(_) | Domain::Bool(_) => domain.clone(),
        Domain::And(j) => Domain::and(
            j.children()
                .iter()
                .map(|c| prepare_reference_domain(c, reference))
                .collect(),
        ),
        Domain::Or(j) => Domain::or(
            j.children()
                .iter()
                .map(|c| prepare_reference_domain(c, reference))
                .collect(),
        ),
    }
}

fn prepare_reference_leaf(leaf: &Leaf, reference: &str) -> Domain {
    let id_field = format!("{reference}{PATH_SEPARATOR}{ID_FIELD}");
    match leaf.operator {
        Operator::Eq | Operator::Ne => {
            if let Some((model, id)) = split_reference(&leaf.value) {
                return match id {
                    ReferenceId::Any if leaf.operator == Operator::Eq => {
                        Leaf::new(id_field, Operator::Ne, Value::Null)
                            .with_alt_field(model)
                            .into()
                    }
                    ReferenceId::Any => {
                        Leaf::new(reference, Operator::NotLike, leaf.value.clone()).into()
                    }
                    ReferenceId::Id(id) => Leaf::new(id_field, leaf.operator, id)
                        .with_alt_field(model)
                        .into(),
                };
            }
        }
        Operator::In | Operator::NotIn => {
            if let Some(grouped) = group_by_model(&leaf.value) {
                let positive = leaf.operator == Operator::In;
                let children: Vec<Domain> = grouped
                    .into_iter()
                    .map(|(model, ids)| -> Domain {
                        match ids {
                            None if positive => {
                                Leaf::new(id_field.clone(), Operator::Ne, Value::Null)
                                    .with_alt_field(model)
                                    .into()
                            }
                            None => {
                                Leaf::new(reference, Operator::NotLike, format!("{model},%")).into()
                            }
                            Some(ids) => {
                                Leaf::new(id_field.clone(), leaf.operator, Value::List(ids))
                                    .with_alt_field(model)
                                    .into()
                            }
                        }
                    })
                    .collect();
                return if positive {
                    Domain::or(children)
                } else {
                    Domain::and(children)
                };
            }
        }
        _ => {}
    }
    Domain::empty()
}

/// Group a list of references by model, in first-seen order. `None` ids
/// mean the model was matched with a `%` wildcard.
fn group_by_model(value: &Value) -> Option<Vec<(String, Option<Vec<Value>>)>> {
    let mut groups: Vec<(String, Option<Vec<Value>>)> = Vec::new();
    for item in value.as_list()? {
        let (model, id) = split_reference(item)?;
        let slot = match groups.iter().position(|(m, _)| *m == model) {
            Some(i) => &mut groups[i].1,
            None => {
                groups.push((model, Some(Vec::new())));
                &mut groups.last_mut()?.1
            }
        };
        match id {
            ReferenceId::Id(id) => {
                if let Some(ids) = slot {
                    ids.push(id);
                }
            }
            ReferenceId::Any => *slot = None,
        }
    }
    Some(groups)
}

/// Replace leaves on `field` that target a model other than `model` with
/// the unsatisfiable `["id", "=", null]`.
pub fn restrict_reference_domain(domain: &Domain, field: &str, model: &str) -> Domain {
    map_domain_leaves(domain, &|leaf| match leaf.target_model() {
        Some(target) if leaf.base() == field && target != model => {
            Domain::leaf(ID_FIELD, Operator::Eq, Value::Null)
        }
        _ => Domain::Leaf(leaf.clone()),
    })
}

fn map_domain_leaves(domain: &Domain, rewrite: &dyn Fn(&Leaf) -> Domain) -> Domain {
    match domain {
        Domain::Leaf(leaf) => rewrite(leaf),
        Domain::Bool(_) => domain.clone(),
        Domain::And(j) => Domain::and(
            j.children()
                .iter()
                .map(|c| map_domain_leaves(c, rewrite))
                .collect(),
        ),
        Domain::Or(j) => Domain::or(
            j.children()
                .iter()
                .map(|c| map_domain_leaves(c, rewrite))
                .collect(),
        ),
    }
}
