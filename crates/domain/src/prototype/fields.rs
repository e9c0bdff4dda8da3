//! Field classification
//!
//! Every resolved field name falls into exactly one category. The rule set is
//! the two `name` tables below plus the transient prefix.

use std::fmt;

use super::PROTOTYPE_FIELD;

/// Names starting with this prefix are transient (in-memory only) attributes.
pub const TRANSIENT_PREFIX: &str = "ndb_";

/// Fields consumed as object construction arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Key,
    Location,
    Home,
    Destination,
    Typeclass,
}

/// Fields handed to the permission, lock and alias handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessField {
    Permissions,
    Locks,
    Aliases,
}

impl IdentityField {
    pub const ALL: [IdentityField; 5] = [
        Self::Key,
        Self::Location,
        Self::Home,
        Self::Destination,
        Self::Typeclass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Location => "location",
            Self::Home => "home",
            Self::Destination => "destination",
            Self::Typeclass => "typeclass",
        }
    }
}

impl AccessField {
    pub const ALL: [AccessField; 3] = [Self::Permissions, Self::Locks, Self::Aliases];

    pub fn name(self) -> &'static str {
        match self {
            Self::Permissions => "permissions",
            Self::Locks => "locks",
            Self::Aliases => "aliases",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for AccessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which part of a spawn record a field name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory<'a> {
    /// The reserved `prototype` field (never present after resolution)
    Inheritance,
    Identity(IdentityField),
    AccessControl(AccessField),
    /// Transient attribute; carries the name with the prefix stripped
    Transient(&'a str),
    /// Persisted attribute under its own name
    Generic,
}

impl<'a> FieldCategory<'a> {
    pub fn of(name: &'a str) -> Self {
        if name == PROTOTYPE_FIELD {
            return Self::Inheritance;
        }
        if let Some(field) = IdentityField::ALL.into_iter().find(|f| f.name() == name) {
            return Self::Identity(field);
        }
        if let Some(field) = AccessField::ALL.into_iter().find(|f| f.name() == name) {
            return Self::AccessControl(field);
        }
        match name.strip_prefix(TRANSIENT_PREFIX) {
            // A bare "ndb_" has no name to store under
            Some(stripped) if !stripped.is_empty() => Self::Transient(stripped),
            _ => Self::Generic,
        }
    }
}
