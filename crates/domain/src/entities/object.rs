//! Spawned objects as seen by the spawner
//!
//! The object store owns everything else about an object (typeclass binding,
//! attribute storage, locks). The spawner only needs the construction
//! arguments going in and a handle coming out.

use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;

/// Identity and placement arguments for constructing one object.
///
/// Placement references are already resolved to live objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateObjectArgs {
    pub key: String,
    pub location: Option<ObjectId>,
    pub home: Option<ObjectId>,
    pub destination: Option<ObjectId>,
    /// Path of the behavior implementation to bind
    pub typeclass: String,
}

impl CreateObjectArgs {
    pub fn new(key: impl Into<String>, typeclass: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            location: None,
            home: None,
            destination: None,
            typeclass: typeclass.into(),
        }
    }

    pub fn with_location(mut self, location: Option<ObjectId>) -> Self {
        self.location = location;
        self
    }

    pub fn with_home(mut self, home: Option<ObjectId>) -> Self {
        self.home = home;
        self
    }

    pub fn with_destination(mut self, destination: Option<ObjectId>) -> Self {
        self.destination = destination;
        self
    }
}

/// Handle to an object created by the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHandle {
    pub id: ObjectId,
    /// Database reference number (`#N`)
    pub dbref: i64,
    pub key: String,
    pub typeclass: String,
}

impl ObjectHandle {
    pub fn dbref_string(&self) -> String {
        format!("#{}", self.dbref)
    }
}
