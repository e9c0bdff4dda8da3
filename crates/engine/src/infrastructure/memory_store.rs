//! In-memory object store.
//!
//! Implements every object store port on top of `DashMap`. Used by the demo
//! binary and the end-to-end tests; it records hook calls so the setup order
//! can be asserted.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use protospawn_domain::{CreateObjectArgs, FieldValue, ObjectHandle, ObjectId, ObjectRef};

use crate::infrastructure::ports::{
    AttachmentHandlers, ClockPort, ObjectFactory, ObjectLifecycle, ObjectLookup, StoreError,
};

/// Lifecycle hooks, in the order they were invoked on an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    BasetypeSetup,
    AtObjectCreation,
    BasetypePosthookSetup,
}

/// Everything the store knows about one object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub handle: ObjectHandle,
    pub location: Option<ObjectId>,
    pub home: Option<ObjectId>,
    pub destination: Option<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub permissions: Vec<String>,
    pub locks: Vec<String>,
    pub aliases: Vec<String>,
    pub attributes: BTreeMap<String, FieldValue>,
    pub transient: BTreeMap<String, FieldValue>,
    pub hooks: Vec<LifecycleHook>,
}

impl StoredObject {
    pub fn attribute(&self, name: &str) -> Option<&FieldValue> {
        self.attributes.get(name)
    }

    /// True once `basetype_posthook_setup` has run.
    pub fn is_initialized(&self) -> bool {
        self.hooks.contains(&LifecycleHook::BasetypePosthookSetup)
    }
}

pub struct InMemoryObjectStore {
    objects: DashMap<ObjectId, StoredObject>,
    by_dbref: DashMap<i64, ObjectId>,
    next_dbref: AtomicI64,
    known_typeclasses: Option<HashSet<String>>,
    clock: Arc<dyn ClockPort>,
}

impl InMemoryObjectStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            objects: DashMap::new(),
            by_dbref: DashMap::new(),
            next_dbref: AtomicI64::new(1),
            known_typeclasses: None,
            clock,
        }
    }

    /// Reject construction for any typeclass not in `typeclasses`.
    pub fn with_known_typeclasses<I, S>(mut self, typeclasses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_typeclasses = Some(typeclasses.into_iter().map(Into::into).collect());
        self
    }

    /// Create the `Void` (#1) and `Limbo` (#2) rooms, so the stock default
    /// home resolves.
    pub fn seed_starting_rooms(&self, room_typeclass: &str) -> Result<Vec<ObjectHandle>, StoreError> {
        ["Void", "Limbo"]
            .into_iter()
            .map(|key| self.insert(&CreateObjectArgs::new(key, room_typeclass)))
            .collect()
    }

    pub fn get(&self, id: ObjectId) -> Option<StoredObject> {
        self.objects.get(&id).map(|entry| entry.value().clone())
    }

    pub fn get_by_dbref(&self, dbref: i64) -> Option<StoredObject> {
        let id = *self.by_dbref.get(&dbref)?;
        self.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn insert(&self, args: &CreateObjectArgs) -> Result<ObjectHandle, StoreError> {
        if args.key.trim().is_empty() {
            return Err(StoreError::construction("object key cannot be empty"));
        }
        if let Some(known) = &self.known_typeclasses {
            if !known.contains(&args.typeclass) {
                return Err(StoreError::construction(format!(
                    "unknown typeclass '{}'",
                    args.typeclass
                )));
            }
        }
        for placement in [args.location, args.home, args.destination].into_iter().flatten() {
            if !self.objects.contains_key(&placement) {
                return Err(StoreError::not_found("Object", placement));
            }
        }

        let dbref = self.next_dbref.fetch_add(1, Ordering::SeqCst);
        let handle = ObjectHandle {
            id: ObjectId::new(),
            dbref,
            key: args.key.clone(),
            typeclass: args.typeclass.clone(),
        };
        let stored = StoredObject {
            handle: handle.clone(),
            location: args.location,
            home: args.home,
            destination: args.destination,
            created_at: self.clock.now(),
            permissions: Vec::new(),
            locks: Vec::new(),
            aliases: Vec::new(),
            attributes: BTreeMap::new(),
            transient: BTreeMap::new(),
            hooks: Vec::new(),
        };
        self.objects.insert(handle.id, stored);
        self.by_dbref.insert(dbref, handle.id);
        Ok(handle)
    }

    fn update(
        &self,
        id: ObjectId,
        apply: impl FnOnce(&mut StoredObject),
    ) -> Result<(), StoreError> {
        let mut entry = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Object", id))?;
        apply(entry.value_mut());
        Ok(())
    }

    fn find_by_key(&self, key: &str) -> Result<ObjectId, StoreError> {
        let mut matches: Vec<(i64, ObjectId)> = self
            .objects
            .iter()
            .filter(|entry| entry.handle.key == key)
            .map(|entry| (entry.handle.dbref, entry.handle.id))
            .collect();
        match matches.len() {
            0 => Err(StoreError::not_found("Object", key)),
            1 => Ok(matches[0].1),
            _ => {
                matches.sort_by_key(|(dbref, _)| *dbref);
                let dbrefs: Vec<String> = matches.iter().map(|(d, _)| format!("#{}", d)).collect();
                Err(StoreError::constraint(format!(
                    "key '{}' is ambiguous ({})",
                    key,
                    dbrefs.join(", ")
                )))
            }
        }
    }
}

#[async_trait]
impl ObjectFactory for InMemoryObjectStore {
    async fn construct(&self, args: &CreateObjectArgs) -> Result<ObjectHandle, StoreError> {
        self.insert(args)
    }
}

#[async_trait]
impl ObjectLookup for InMemoryObjectStore {
    async fn resolve(&self, reference: &ObjectRef) -> Result<ObjectId, StoreError> {
        match reference {
            ObjectRef::Dbref(dbref) => self
                .by_dbref
                .get(dbref)
                .map(|id| *id)
                .ok_or_else(|| StoreError::not_found("Object", reference)),
            ObjectRef::Key(key) => self.find_by_key(key),
            ObjectRef::Handle(id) if self.objects.contains_key(id) => Ok(*id),
            ObjectRef::Handle(id) => Err(StoreError::not_found("Object", id)),
        }
    }
}

#[async_trait]
impl ObjectLifecycle for InMemoryObjectStore {
    async fn basetype_setup(&self, object: ObjectId) -> Result<(), StoreError> {
        self.update(object, |o| o.hooks.push(LifecycleHook::BasetypeSetup))
    }

    async fn at_object_creation(&self, object: ObjectId) -> Result<(), StoreError> {
        self.update(object, |o| o.hooks.push(LifecycleHook::AtObjectCreation))
    }

    async fn basetype_posthook_setup(&self, object: ObjectId) -> Result<(), StoreError> {
        self.update(object, |o| o.hooks.push(LifecycleHook::BasetypePosthookSetup))
    }
}

#[async_trait]
impl AttachmentHandlers for InMemoryObjectStore {
    async fn add_permissions(&self, object: ObjectId, permissions: &[String]) -> Result<(), StoreError> {
        self.update(object, |o| o.permissions.extend_from_slice(permissions))
    }

    async fn add_locks(&self, object: ObjectId, locks: &[String]) -> Result<(), StoreError> {
        self.update(object, |o| o.locks.extend_from_slice(locks))
    }

    async fn add_aliases(&self, object: ObjectId, aliases: &[String]) -> Result<(), StoreError> {
        self.update(object, |o| o.aliases.extend_from_slice(aliases))
    }

    async fn set_transient(&self, object: ObjectId, name: &str, value: FieldValue) -> Result<(), StoreError> {
        self.update(object, |o| {
            o.transient.insert(name.to_string(), value);
        })
    }

    async fn batch_add_attributes(
        &self,
        object: ObjectId,
        attributes: Vec<(String, FieldValue)>,
    ) -> Result<(), StoreError> {
        self.update(object, |o| o.attributes.extend(attributes))
    }
}
