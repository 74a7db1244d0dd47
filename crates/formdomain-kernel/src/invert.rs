//! Domain inversion: the residual constraint on one field.
//!
//! Given a target field (the *symbol*) and a partial context, inversion
//! partially evaluates the domain:
//! - leaves on the symbol are kept verbatim,
//! - leaves on known fields are decided and either vanish or decide the
//!   enclosing junction outright,
//! - leaves on unknown fields are dropped as vacuous.
//!
//! The result is either a boolean (the domain is already decided) or a
//! residual domain over the symbol alone, in the same wire form as the
//! input. Inverting a residual again with the same arguments returns it
//! unchanged.

use crate::domain::{Domain, Junction};
use crate::eval::Bias;
use crate::leaf::eval_leaf;
use crate::normalize::simplify;
use crate::value::Context;
use tracing::{debug, trace};

/// Compute the residual constraint `domain` places on `symbol` given what
/// `context` already knows.
///
/// `symbol` is a base field name; leaves on `symbol.sub` count as leaves on
/// `symbol`.
pub fn invert(domain: &Domain, symbol: &str, context: &Context) -> Domain {
    let result = match domain {
        Domain::Bool(b) => Domain::Bool(*b),
        _ if !domain.mentions(symbol) => {
            trace!(symbol, "symbol not mentioned, domain is unconstrained");
            Domain::Bool(true)
        }
        _ => invert_node(domain, symbol, context),
    };
    debug!(symbol, known = context.len(), %result, "inverted domain");
    result
}

fn invert_node(domain: &Domain, symbol: &str, context: &Context) -> Domain {
    match domain {
        Domain::And(j) => invert_and(j.children(), symbol, context),
        Domain::Or(j) => invert_or(j, symbol, context),
        Domain::Leaf(_) => invert_and(std::slice::from_ref(domain), symbol, context),
        Domain::Bool(b) => Domain::Bool(*b),
    }
}

fn invert_and(children: &[Domain], symbol: &str, context: &Context) -> Domain {
    let mut kept = Vec::new();
    for child in children {
        match child {
            Domain::Leaf(leaf) if leaf.base() == symbol => kept.push(child.clone()),
            Domain::Leaf(leaf) => {
                if context.knows(leaf.base()) && !eval_leaf(leaf, context, Bias::And) {
                    trace!(field = %leaf.field, "known leaf falsifies conjunction");
                    return Domain::Bool(false);
                }
            }
            Domain::And(_) | Domain::Or(_) => match invert_node(child, symbol, context) {
                Domain::Bool(true) => {}
                Domain::Bool(false) => {
                    trace!("nested branch falsifies conjunction");
                    return Domain::Bool(false);
                }
                residual => kept.push(residual),
            },
            Domain::Bool(true) => {}
            Domain::Bool(false) => return Domain::Bool(false),
        }
    }

    if kept.is_empty() {
        Domain::Bool(true)
    } else {
        simplify(&Domain::and(kept))
    }
}

fn invert_or(junction: &Junction, symbol: &str, context: &Context) -> Domain {
    let others = junction.variables().iter().filter(|v| v.as_str() != symbol);
    if !context.covers(others) {
        // The unknown alternatives may still be satisfied later; do not
        // restrict the symbol on their account.
        trace!(symbol, "disjunction has unknown fields, left unconstrained");
        return Domain::Bool(true);
    }

    let mut alternatives = Vec::new();
    for child in junction.children() {
        match child {
            Domain::Leaf(leaf) if leaf.base() == symbol => alternatives.push(child.clone()),
            Domain::Leaf(leaf) => {
                if context.knows(leaf.base()) && eval_leaf(leaf, context, Bias::Or) {
                    trace!(field = %leaf.field, "known leaf satisfies disjunction");
                    return Domain::Bool(true);
                }
            }
            Domain::And(_) | Domain::Or(_) => match invert_node(child, symbol, context) {
                Domain::Bool(true) => {
                    trace!("nested branch satisfies disjunction");
                    return Domain::Bool(true);
                }
                Domain::Bool(false) => {}
                residual => alternatives.push(residual),
            },
            Domain::Bool(true) => return Domain::Bool(true),
            Domain::Bool(false) => {}
        }
    }

    if alternatives.is_empty() {
        Domain::Bool(false)
    } else {
        simplify(&Domain::or(alternatives))
    }
}
