//! Object store port traits.
//!
//! The spawner never touches storage directly. Construction, reference lookup,
//! lifecycle hooks and attachment handlers are separate ports so a test can
//! fail exactly one of them.

use async_trait::async_trait;
use protospawn_domain::{CreateObjectArgs, FieldValue, ObjectHandle, ObjectId, ObjectRef};

use super::error::StoreError;

// =============================================================================
// Construction
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectFactory: Send + Sync {
    /// Create one object bound to `args.typeclass`. Callable once per object in
    /// a batch without an intermediate flush.
    async fn construct(&self, args: &CreateObjectArgs) -> Result<ObjectHandle, StoreError>;
}

// =============================================================================
// Reference Lookup
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectLookup: Send + Sync {
    /// Turn a dbref, key or handle into a live object id.
    async fn resolve(&self, reference: &ObjectRef) -> Result<ObjectId, StoreError>;
}

// =============================================================================
// Lifecycle Hooks
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectLifecycle: Send + Sync {
    /// Structural setup. Runs right after construction, before any attachment.
    async fn basetype_setup(&self, object: ObjectId) -> Result<(), StoreError>;

    /// Typeclass creation hook. Runs after structural setup.
    async fn at_object_creation(&self, object: ObjectId) -> Result<(), StoreError>;

    /// Runs after every attachment for the object has completed.
    async fn basetype_posthook_setup(&self, object: ObjectId) -> Result<(), StoreError>;
}

// =============================================================================
// Attachment Handlers
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentHandlers: Send + Sync {
    async fn add_permissions(&self, object: ObjectId, permissions: &[String]) -> Result<(), StoreError>;

    async fn add_locks(&self, object: ObjectId, locks: &[String]) -> Result<(), StoreError>;

    async fn add_aliases(&self, object: ObjectId, aliases: &[String]) -> Result<(), StoreError>;

    /// Attach a non-persisted value.
    async fn set_transient(&self, object: ObjectId, name: &str, value: FieldValue) -> Result<(), StoreError>;

    /// Persist several named attributes in one call.
    async fn batch_add_attributes(
        &self,
        object: ObjectId,
        attributes: Vec<(String, FieldValue)>,
    ) -> Result<(), StoreError>;
}
