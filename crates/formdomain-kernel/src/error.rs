//! Error types for formdomain kernel operations.
//!
//! Only decoding the wire form can fail. Evaluation, inversion and the
//! normalization passes are total: anything they cannot decide degrades to
//! an approximated result instead of an error.

/// Errors arising from malformed domain or context input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The domain (or a branch of it) is not a JSON list.
    #[error("expected a list at {path}, found {found}")]
    NotAList { path: String, found: String },

    /// A leaf's field name is not a string.
    #[error("leaf at {path} has a non-string field name")]
    FieldNotString { path: String },

    /// A leaf carries more than `(field, operator, value, altField)`.
    #[error("leaf at {path} has {len} elements, at most 4 are allowed")]
    LeafTooLong { path: String, len: usize },

    /// A leaf's fourth element is neither a string nor null.
    #[error("leaf at {path} has a non-string fourth element")]
    AltFieldNotString { path: String },

    /// An `"AND"` / `"OR"` marker appears anywhere but at the head of a list.
    #[error("misplaced `{marker}` marker at {path}")]
    MisplacedMarker { marker: String, path: String },

    /// A context snapshot is not a JSON object.
    #[error("context must be a JSON object")]
    ContextNotObject,

    /// A `__class__`-tagged object could not be decoded.
    #[error("invalid {class} value: {description}")]
    InvalidValue { class: String, description: String },

    /// The input is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
