//! Spawn records
//!
//! A spawn record is a resolved prototype split into the pieces the object
//! store consumes separately: construction arguments, access-control strings,
//! transient attributes and persisted attributes. Each resolved field lands in
//! exactly one of them, according to [`FieldCategory`].

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::error::DomainError;
use crate::prototype::{AccessField, FieldCategory, IdentityField, ResolvedFields};
use crate::value_objects::{FieldValue, ObjectRef};

/// Range of the random number embedded in placeholder keys.
pub const PLACEHOLDER_KEY_RANGE: RangeInclusive<i32> = 1..=100_000;

/// Key given to objects whose prototype defines none.
pub fn placeholder_key(n: i32) -> String {
    format!("Spawned Object {:06}", n)
}

/// Values used when a prototype leaves `home` or `typeclass` unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnDefaults {
    pub default_home: Option<ObjectRef>,
    pub base_typeclass: String,
}

impl SpawnDefaults {
    pub fn new(base_typeclass: impl Into<String>) -> Self {
        Self {
            default_home: None,
            base_typeclass: base_typeclass.into(),
        }
    }

    pub fn with_default_home(mut self, home: ObjectRef) -> Self {
        self.default_home = Some(home);
        self
    }
}

/// Identity and placement arguments, with placement still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityArgs {
    pub key: String,
    pub location: Option<ObjectRef>,
    pub home: Option<ObjectRef>,
    pub destination: Option<ObjectRef>,
    pub typeclass: String,
}

/// Raw permission, lock and alias strings. An empty list means "skip the handler".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControl {
    pub permissions: Vec<String>,
    pub locks: Vec<String>,
    pub aliases: Vec<String>,
}

impl AccessControl {
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.locks.is_empty() && self.aliases.is_empty()
    }

    fn slot(&mut self, field: AccessField) -> &mut Vec<String> {
        match field {
            AccessField::Permissions => &mut self.permissions,
            AccessField::Locks => &mut self.locks,
            AccessField::Aliases => &mut self.aliases,
        }
    }
}

/// Everything needed to create and set up one object.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRecord {
    pub identity: IdentityArgs,
    pub access: AccessControl,
    /// Keyed by the stripped name. Deferred values are NOT evaluated here.
    pub transient: BTreeMap<String, FieldValue>,
    /// Persisted attributes, deferred values already evaluated
    pub attributes: BTreeMap<String, FieldValue>,
}

impl SpawnRecord {
    /// Split resolved fields into a spawn record.
    ///
    /// `placeholder` is only called when no `key` was resolved. Deferred
    /// persisted-attribute values are evaluated exactly once, here; deferred
    /// transient values are stored as they are.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` when a reserved field holds a value
    /// of the wrong shape.
    pub fn partition(
        resolved: ResolvedFields,
        defaults: &SpawnDefaults,
        placeholder: impl FnOnce() -> String,
    ) -> Result<Self, DomainError> {
        let mut key = None;
        let mut location = None;
        let mut home = defaults.default_home.clone();
        let mut destination = None;
        let mut typeclass = None;
        let mut access = AccessControl::default();
        let mut transient = BTreeMap::new();
        let mut attributes = BTreeMap::new();

        for (name, value) in resolved {
            match FieldCategory::of(&name) {
                // resolve() never emits it
                FieldCategory::Inheritance => {}
                FieldCategory::Identity(field) => match field {
                    IdentityField::Key => key = Some(string_field(field.name(), &value)?),
                    IdentityField::Location => {
                        location = ObjectRef::from_field(field.name(), &value)?
                    }
                    IdentityField::Home => home = ObjectRef::from_field(field.name(), &value)?,
                    IdentityField::Destination => {
                        destination = ObjectRef::from_field(field.name(), &value)?
                    }
                    IdentityField::Typeclass => {
                        typeclass = Some(string_field(field.name(), &value)?)
                    }
                },
                FieldCategory::AccessControl(field) => {
                    *access.slot(field) = string_list(field.name(), &value)?;
                }
                FieldCategory::Transient(stripped) => {
                    // Handed over unevaluated, unlike persisted attributes
                    transient.insert(stripped.to_string(), value);
                }
                FieldCategory::Generic => {
                    attributes.insert(name, value.evaluate());
                }
            }
        }

        let identity = IdentityArgs {
            key: key.unwrap_or_else(placeholder),
            location,
            home,
            destination,
            typeclass: typeclass.unwrap_or_else(|| defaults.base_typeclass.clone()),
        };

        Ok(Self {
            identity,
            access,
            transient,
            attributes,
        })
    }
}

fn string_field(field: &str, value: &FieldValue) -> Result<String, DomainError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DomainError::invalid_field(field, "a string"))
}

/// Accepts a string, a list of strings, or null. Empty strings are dropped.
fn string_list(field: &str, value: &FieldValue) -> Result<Vec<String>, DomainError> {
    const EXPECTED: &str = "a string or list of strings";
    let invalid = || DomainError::invalid_field(field, EXPECTED);

    let strings: Vec<String> = match value {
        FieldValue::Literal(serde_json::Value::Null) => Vec::new(),
        FieldValue::Literal(serde_json::Value::String(s)) => vec![s.clone()],
        FieldValue::Literal(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect::<Result<_, _>>()?,
        FieldValue::List(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect::<Result<_, _>>()?,
        _ => return Err(invalid()),
    };

    Ok(strings.into_iter().filter(|s| !s.is_empty()).collect())
}
