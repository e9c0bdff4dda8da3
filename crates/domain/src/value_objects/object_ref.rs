//! References to existing objects
//!
//! Placement fields (`location`, `home`, `destination`) may name an object by
//! database reference (`"#12"`, `"12"` or `12`), by key (`"Limbo"`), or hand
//! over a live handle directly. The object store turns any of these into an `ObjectId`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FieldValue;
use crate::error::DomainError;
use crate::ids::ObjectId;

/// A bare reference to an object that must already exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectRef {
    /// Database reference number, written `#N`
    Dbref(i64),
    /// Object key, matched exactly
    Key(String),
    /// Already a handle
    Handle(ObjectId),
}

impl ObjectRef {
    /// Read an optional reference out of a placement field.
    ///
    /// `null` means "no object". Strings are parsed with [`ObjectRef::from_str`],
    /// integers are dbrefs, object handles pass through.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` for any other value, deferred values included.
    pub fn from_field(field: &str, value: &FieldValue) -> Result<Option<Self>, DomainError> {
        const EXPECTED: &str = "a #dbref, an object key, or an object handle";
        match value {
            FieldValue::Literal(serde_json::Value::Null) => Ok(None),
            FieldValue::Literal(serde_json::Value::String(s)) => s
                .parse()
                .map(Some)
                .map_err(|_| DomainError::invalid_field(field, EXPECTED)),
            FieldValue::Literal(serde_json::Value::Number(n)) => n
                .as_i64()
                .map(|dbref| Some(Self::Dbref(dbref)))
                .ok_or_else(|| DomainError::invalid_field(field, EXPECTED)),
            FieldValue::Object(id) => Ok(Some(Self::Handle(*id))),
            _ => Err(DomainError::invalid_field(field, EXPECTED)),
        }
    }
}

impl FromStr for ObjectRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::parse("Empty object reference"));
        }
        let dbref = match trimmed.strip_prefix('#') {
            Some(digits) => digits.parse::<i64>().ok(),
            // Bare numbers are dbrefs too
            None if trimmed.bytes().all(|b| b.is_ascii_digit()) => trimmed.parse::<i64>().ok(),
            None => None,
        };
        Ok(dbref.map_or_else(|| Self::Key(trimmed.to_string()), Self::Dbref))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dbref(dbref) => write!(f, "#{}", dbref),
            Self::Key(key) => write!(f, "{}", key),
            Self::Handle(id) => write!(f, "<{}>", id),
        }
    }
}
