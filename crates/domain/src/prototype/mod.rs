//! Prototype specifications
//!
//! A prototype is a declarative field mapping describing an object to be
//! spawned. The reserved `prototype` field names parent prototypes by direct
//! reference; [`resolve`] flattens a prototype and its ancestors into one
//! [`ResolvedFields`] mapping.
//!
//! ```ignore
//! let goblin = Prototype::new()
//!     .with("key", "goblin grunt")
//!     .with("resists", FieldValue::list(["cold", "poison"]));
//! let wizard = Prototype::new()
//!     .with_parent(goblin)
//!     .with("key", "goblin wizard");
//! ```

mod fields;
mod resolve;

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::value_objects::FieldValue;

pub use fields::{AccessField, FieldCategory, IdentityField, TRANSIENT_PREFIX};
pub use resolve::{resolve, ResolvedFields};

/// Name of the field holding parent prototypes.
pub const PROTOTYPE_FIELD: &str = "prototype";

/// A declarative field mapping, possibly inheriting from parent prototypes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prototype {
    fields: BTreeMap<String, FieldValue>,
}

impl Prototype {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inherit from a single parent.
    pub fn with_parent(self, parent: impl Into<Arc<Prototype>>) -> Self {
        self.with(PROTOTYPE_FIELD, FieldValue::Prototype(parent.into()))
    }

    /// Inherit from several parents; later parents override earlier ones.
    pub fn with_parents<I, P>(self, parents: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Arc<Prototype>>,
    {
        let parents = parents
            .into_iter()
            .map(|p| FieldValue::Prototype(p.into()))
            .collect();
        self.with(PROTOTYPE_FIELD, FieldValue::List(parents))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The raw value of the `prototype` field, if any.
    pub fn parents(&self) -> Option<&FieldValue> {
        self.get(PROTOTYPE_FIELD)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Prototype {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Prototype {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
