//! # Formdomain Kernel
//!
//! The domain algebra of a data-entry client: a notion of "what may this
//! field contain" that is decided locally, without a round-trip, from the
//! values already known for its sibling fields.
//!
//! A *domain* is the declarative filter language shared with the server's
//! search API: nested lists of `(field, operator, value)` leaves, optionally
//! headed by an `"AND"` / `"OR"` marker. This crate parses that wire form
//! into a tagged tree, evaluates it against a complete context, and inverts
//! it for a single field against a partial context.
//!
//! ## Architecture
//!
//! ```text
//! Value / Context       ← Wire values, known vs unknown vs empty
//!     │
//! Operator              ← Closed operator set, local decidability
//!     │
//! Domain                ← Leaf | And | Or | Bool, variables cached
//!     │
//! parse                 ← Wire form → Domain
//!     │
//! eval_leaf / evaluate  ← Total context → bool
//!     │
//! invert                ← Partial context → bool | residual domain
//!     │
//! normalize             ← simplify, merge, concat, (un)localize, …
//! ```
//!
//! Every operation is a pure function of its arguments. Trees are never
//! mutated in place.

pub mod domain;
pub mod error;
pub mod eval;
pub mod invert;
pub mod leaf;
pub mod normalize;
pub mod operator;
pub mod parse;
pub mod value;

pub use domain::{Domain, Junction, Leaf, base_field};
pub use error::DomainError;
pub use eval::{Bias, evaluate, evaluate_with_bias};
pub use invert::invert;
pub use leaf::eval_leaf;
pub use normalize::{
    concat, concat_with, extract_reference_models, localize, merge, prepare_reference_domain,
    restrict_reference_domain, simplify, unique_value, unlocalize,
};
pub use operator::Operator;
pub use parse::{parse, parse_str};
pub use value::{Context, Value};
