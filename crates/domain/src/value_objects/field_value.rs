//! Field values carried by prototype specifications
//!
//! A field is either a literal JSON value, a deferred computation that is run
//! at spawn time, a nested prototype (used by the `prototype` field to name
//! parents), an ordered list of values, or a handle to an object that already
//! exists.

use std::fmt;
use std::sync::Arc;

use crate::ids::ObjectId;
use crate::prototype::Prototype;

/// A zero-argument producer evaluated when a spawn record is built.
///
/// Cloning a `Deferred` shares the producer; two clones compare equal.
#[derive(Clone)]
pub struct Deferred {
    label: Option<String>,
    producer: Arc<dyn Fn() -> serde_json::Value + Send + Sync>,
}

impl Deferred {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> serde_json::Value + Send + Sync + 'static,
    {
        Self {
            label: None,
            producer: Arc::new(producer),
        }
    }

    /// Attach a human-readable label, shown in `Debug` output and logs.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Run the producer once.
    pub fn evaluate(&self) -> serde_json::Value {
        (self.producer)()
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.producer, &other.producer)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Deferred({label})"),
            None => write!(f, "Deferred(<fn>)"),
        }
    }
}

/// The value of one field in a prototype specification.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain data (strings, numbers, arrays, maps, null)
    Literal(serde_json::Value),
    /// Computed at spawn time, once per spawn call
    Deferred(Deferred),
    /// A parent specification, by direct reference
    Prototype(Arc<Prototype>),
    /// An ordered sequence, e.g. several parents
    List(Vec<FieldValue>),
    /// A live object handle (valid for `location`, `home`, `destination`)
    Object(ObjectId),
}

impl FieldValue {
    /// Wrap a producer as a deferred value.
    pub fn deferred<F>(producer: F) -> Self
    where
        F: Fn() -> serde_json::Value + Send + Sync + 'static,
    {
        Self::Deferred(Deferred::new(producer))
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Returns the string if this is a literal string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Literal(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Literal(serde_json::Value::Null))
    }

    /// Replace a top-level deferred value by its result. Other values are returned as-is.
    pub fn evaluate(self) -> Self {
        match self {
            Self::Deferred(deferred) => Self::Literal(deferred.evaluate()),
            other => other,
        }
    }

    /// Short description of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(serde_json::Value::Null) => "null",
            Self::Literal(serde_json::Value::Bool(_)) => "a boolean",
            Self::Literal(serde_json::Value::Number(_)) => "a number",
            Self::Literal(serde_json::Value::String(_)) => "a string",
            Self::Literal(serde_json::Value::Array(_)) => "an array",
            Self::Literal(serde_json::Value::Object(_)) => "a map",
            Self::Deferred(_) => "a deferred value",
            Self::Prototype(_) => "a prototype",
            Self::List(_) => "a list",
            Self::Object(_) => "an object handle",
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Literal(serde_json::Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Literal(serde_json::Value::String(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Literal(serde_json::Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Literal(serde_json::Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Literal(serde_json::Value::Bool(value))
    }
}

impl From<Deferred> for FieldValue {
    fn from(value: Deferred) -> Self {
        Self::Deferred(value)
    }
}

impl From<Prototype> for FieldValue {
    fn from(value: Prototype) -> Self {
        Self::Prototype(Arc::new(value))
    }
}

impl From<Arc<Prototype>> for FieldValue {
    fn from(value: Arc<Prototype>) -> Self {
        Self::Prototype(value)
    }
}

impl From<ObjectId> for FieldValue {
    fn from(value: ObjectId) -> Self {
        Self::Object(value)
    }
}
