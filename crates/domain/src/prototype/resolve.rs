//! Prototype resolution
//!
//! Flattens a prototype and its ancestors into one field mapping. Parents are
//! merged depth-first, left to right, each later merge overwriting earlier
//! ones; the prototype's own fields are applied last and always win.

use std::collections::btree_map;
use std::collections::BTreeMap;

use super::{Prototype, PROTOTYPE_FIELD};
use crate::error::DomainError;
use crate::value_objects::FieldValue;

/// The flat result of resolving a prototype.
///
/// Never contains the `prototype` field. Deferred values are carried through
/// unevaluated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields {
    fields: BTreeMap<String, FieldValue>,
}

impl ResolvedFields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }
}

impl IntoIterator for ResolvedFields {
    type Item = (String, FieldValue);
    type IntoIter = btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Resolve `spec` against all of its ancestors.
///
/// # Errors
///
/// Returns `DomainError::MalformedPrototype` if a `prototype` field anywhere in
/// the chain holds something other than a prototype or a list of prototypes.
pub fn resolve(spec: &Prototype) -> Result<ResolvedFields, DomainError> {
    let mut fields = BTreeMap::new();
    merge_into(spec, &mut fields)?;
    Ok(ResolvedFields { fields })
}

fn merge_into(spec: &Prototype, acc: &mut BTreeMap<String, FieldValue>) -> Result<(), DomainError> {
    if let Some(parents) = spec.parents() {
        for parent in parent_list(parents)? {
            merge_into(parent, acc)?;
        }
    }

    for (name, value) in spec {
        if name != PROTOTYPE_FIELD {
            acc.insert(name.clone(), value.clone());
        }
    }
    Ok(())
}

/// A bare prototype counts as a one-element list.
fn parent_list(value: &FieldValue) -> Result<Vec<&Prototype>, DomainError> {
    match value {
        FieldValue::Prototype(parent) => Ok(vec![parent.as_ref()]),
        FieldValue::List(items) => items
            .iter()
            .map(|item| match item {
                FieldValue::Prototype(parent) => Ok(parent.as_ref()),
                other => Err(DomainError::malformed_prototype(format!(
                    "parent list entries must be prototypes, found {}",
                    other.kind()
                ))),
            })
            .collect(),
        other => Err(DomainError::malformed_prototype(format!(
            "'{}' must be a prototype or a list of prototypes, found {}",
            PROTOTYPE_FIELD,
            other.kind()
        ))),
    }
}
