//! Wire values and context snapshots.
//!
//! A context maps field names to the values currently known for them.
//! Three states are kept apart:
//! 1. **Unknown**: the field is absent from the context.
//! 2. **Empty**: the field is present and holds [`Value::Null`].
//! 3. **Set**: the field holds any other value.
//!
//! Values travel in the record layer's JSON encoding. Plain JSON scalars
//! and lists map directly; dates, datetimes and decimals use tagged
//! objects of the form `{"__class__": "date", "year": …, "month": …, "day": …}`.

use crate::error::DomainError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, json};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

const CLASS_KEY: &str = "__class__";

/// A single value as it appears in a leaf operand or a context entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Known and empty.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact decimal text; compared numerically.
    Decimal(String),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Lists and tuples alike. A two-element list is the relational
    /// `(target id, display text)` or `(model, id)` pair.
    List(Vec<Value>),
    /// Any other JSON object, compared by equality only.
    Opaque(serde_json::Value),
}

impl Value {
    /// Truthiness: null, zero, empty text and empty lists are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Decimal(_) => self.as_f64().is_some_and(|f| f != 0.0),
            Self::String(s) => !s.is_empty(),
            Self::Date(_) | Self::DateTime(_) => true,
            Self::List(items) => !items.is_empty(),
            Self::Opaque(v) => match v {
                serde_json::Value::Null => false,
                serde_json::Value::Object(map) => !map.is_empty(),
                _ => true,
            },
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view shared by `Int`, `Float` and `Decimal`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Decimal(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_) | Self::Decimal(_))
    }

    /// Equality with numeric coercion across `Int`/`Float`/`Decimal`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (a, b) if a.is_numeric() && b.is_numeric() => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (a, b) => a == b,
        }
    }

    /// Ordering between comparable values; `None` when the kinds differ.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::List(a), Self::List(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// The `"x,y"` text of a two-element scalar pair, if this is one.
    pub fn pair_text(&self) -> Option<String> {
        match self.as_list()? {
            [first, second] => Some(format!("{},{}", first.scalar_text()?, second.scalar_text()?)),
            _ => None,
        }
    }

    fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Decimal(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Encode to the JSON wire form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Decimal(text) => json!({"__class__": "Decimal", "decimal": text}),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => json!({
                "__class__": "date",
                "year": d.year(),
                "month": d.month(),
                "day": d.day(),
            }),
            Self::DateTime(dt) => json!({
                "__class__": "datetime",
                "year": dt.year(),
                "month": dt.month(),
                "day": dt.day(),
                "hour": dt.hour(),
                "minute": dt.minute(),
                "second": dt.second(),
                "microsecond": dt.nanosecond() / 1_000,
            }),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Self::Opaque(v) => v.clone(),
        }
    }

    /// Decode from the JSON wire form.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, DomainError> {
        Ok(match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // Above `i64::MAX`: keep every digit.
                None if n.is_u64() => Self::Decimal(n.to_string()),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::List(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => decode_tagged(map)?,
        })
    }
}

fn decode_tagged(map: &Map<String, serde_json::Value>) -> Result<Value, DomainError> {
    let Some(class) = map.get(CLASS_KEY).and_then(|v| v.as_str()) else {
        return Ok(Value::Opaque(serde_json::Value::Object(map.clone())));
    };
    match class {
        "date" => Ok(Value::Date(decode_date(class, map)?)),
        "datetime" => {
            let date = decode_date(class, map)?;
            let time = date
                .and_hms_micro_opt(
                    component(class, map, "hour", Some(0))?,
                    component(class, map, "minute", Some(0))?,
                    component(class, map, "second", Some(0))?,
                    component(class, map, "microsecond", Some(0))?,
                )
                .ok_or_else(|| invalid(class, "time out of range"))?;
            Ok(Value::DateTime(time))
        }
        "Decimal" => match map.get("decimal") {
            Some(serde_json::Value::String(text)) => Ok(Value::Decimal(text.clone())),
            Some(serde_json::Value::Number(n)) => Ok(Value::Decimal(n.to_string())),
            _ => Err(invalid(class, "missing `decimal` text")),
        },
        _ => Ok(Value::Opaque(serde_json::Value::Object(map.clone()))),
    }
}

fn decode_date(class: &str, map: &Map<String, serde_json::Value>) -> Result<NaiveDate, DomainError> {
    let year = map
        .get("year")
        .and_then(|v| v.as_i64())
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| invalid(class, "missing `year`"))?;
    let month = component(class, map, "month", None)?;
    let day = component(class, map, "day", None)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(class, "date out of range"))
}

fn component(
    class: &str,
    map: &Map<String, serde_json::Value>,
    key: &str,
    default: Option<u32>,
) -> Result<u32, DomainError> {
    match map.get(key) {
        None => default.ok_or_else(|| invalid(class, &format!("missing `{key}`"))),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid(class, &format!("`{key}` is not a small integer"))),
    }
}

fn invalid(class: &str, description: &str) -> DomainError {
    DomainError::InvalidValue {
        class: class.to_string(),
        description: description.to_string(),
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = DomainError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json(&json)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        value.to_json()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// A snapshot of known field values.
///
/// Supplied by the record layer; keys may be plain or dotted field names
/// and include derived pseudo-fields such as `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(BTreeMap<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// The value for `field`, or `None` when it is unknown.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether `field` is known (possibly empty).
    pub fn knows(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether every name in `fields` is known.
    pub fn covers<'a>(&self, fields: impl IntoIterator<Item = &'a String>) -> bool {
        fields.into_iter().all(|f| self.knows(f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode a context from a JSON object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, DomainError> {
        let serde_json::Value::Object(map) = json else {
            return Err(DomainError::ContextNotObject);
        };
        let fields = map
            .iter()
            .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
            .collect::<Result<BTreeMap<_, _>, DomainError>>()?;
        Ok(Self(fields))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
