//! Spawn use case.
//!
//! Turns prototypes into live objects in one batch: every prototype is
//! resolved and partitioned first, then every object is constructed, then each
//! object runs its setup sequence in input order.

mod error;

pub use error::{SetupFailure, SetupStage, SpawnError};

use std::sync::Arc;

use protospawn_domain::{
    placeholder_key, resolve, BatchId, CreateObjectArgs, IdentityArgs, IdentityField, ObjectHandle,
    ObjectId, ObjectRef, Prototype, SpawnDefaults, SpawnRecord, PLACEHOLDER_KEY_RANGE,
};

use crate::infrastructure::ports::{
    AttachmentHandlers, ObjectFactory, ObjectLifecycle, ObjectLookup, RandomPort, StoreError,
};

/// A prototype ready for construction.
struct PreparedObject {
    /// Position in the input batch
    index: usize,
    args: CreateObjectArgs,
    record: SpawnRecord,
}

/// Spawn prototypes use case.
///
/// Orchestrates: resolution, partitioning, placement lookup, construction,
/// lifecycle hooks and attachments.
pub struct SpawnPrototypes {
    factory: Arc<dyn ObjectFactory>,
    lookup: Arc<dyn ObjectLookup>,
    lifecycle: Arc<dyn ObjectLifecycle>,
    attachments: Arc<dyn AttachmentHandlers>,
    random: Arc<dyn RandomPort>,
    defaults: SpawnDefaults,
}

impl SpawnPrototypes {
    pub fn new(
        factory: Arc<dyn ObjectFactory>,
        lookup: Arc<dyn ObjectLookup>,
        lifecycle: Arc<dyn ObjectLifecycle>,
        attachments: Arc<dyn AttachmentHandlers>,
        random: Arc<dyn RandomPort>,
        defaults: SpawnDefaults,
    ) -> Self {
        Self {
            factory,
            lookup,
            lifecycle,
            attachments,
            random,
            defaults,
        }
    }

    /// Spawn one object per non-empty prototype.
    ///
    /// Handles come back in input order. Prototypes that resolve to no fields
    /// at all are skipped and have no position in the output.
    ///
    /// # Errors
    /// * `SpawnError::Prototype` - malformed prototype; nothing was created
    /// * `SpawnError::Reference` - unresolvable placement; nothing was created
    /// * `SpawnError::Construction` - the store refused an object; earlier ones remain
    /// * `SpawnError::PartialBatch` - some objects failed setup; all remain
    pub async fn execute(&self, prototypes: &[Prototype]) -> Result<Vec<ObjectHandle>, SpawnError> {
        let batch_id = BatchId::new();

        let mut prepared = Vec::with_capacity(prototypes.len());
        for (index, prototype) in prototypes.iter().enumerate() {
            if let Some(object) = self.prepare(index, prototype).await? {
                prepared.push(object);
            } else {
                tracing::debug!(batch_id = %batch_id, index, "Skipping empty prototype");
            }
        }

        let mut constructed = Vec::with_capacity(prepared.len());
        for object in &prepared {
            match self.factory.construct(&object.args).await {
                Ok(handle) => {
                    tracing::debug!(
                        batch_id = %batch_id,
                        object = %handle.dbref_string(),
                        key = %handle.key,
                        typeclass = %handle.typeclass,
                        "Constructed object"
                    );
                    constructed.push(handle);
                }
                Err(source) => {
                    tracing::error!(
                        batch_id = %batch_id,
                        index = object.index,
                        key = %object.args.key,
                        error = %source,
                        constructed = constructed.len(),
                        "Object construction failed"
                    );
                    return Err(SpawnError::Construction {
                        index: object.index,
                        key: object.args.key.clone(),
                        constructed,
                        source,
                    });
                }
            }
        }

        let mut failures = Vec::new();
        for (object, handle) in prepared.into_iter().zip(&constructed) {
            if let Err((stage, error)) = self.set_up(handle.id, object.record).await {
                tracing::warn!(
                    batch_id = %batch_id,
                    object = %handle.dbref_string(),
                    key = %handle.key,
                    stage = %stage,
                    error = %error,
                    "Object setup failed"
                );
                failures.push(SetupFailure {
                    index: object.index,
                    object: handle.clone(),
                    stage,
                    error,
                });
            }
        }

        if !failures.is_empty() {
            return Err(SpawnError::PartialBatch {
                total: constructed.len(),
                spawned: constructed,
                failures,
            });
        }

        tracing::info!(
            batch_id = %batch_id,
            requested = prototypes.len(),
            spawned = constructed.len(),
            "Spawned batch"
        );

        Ok(constructed)
    }

    async fn prepare(
        &self,
        index: usize,
        prototype: &Prototype,
    ) -> Result<Option<PreparedObject>, SpawnError> {
        let resolved = resolve(prototype).map_err(|source| SpawnError::Prototype { index, source })?;
        if resolved.is_empty() {
            return Ok(None);
        }

        let record = SpawnRecord::partition(resolved, &self.defaults, || self.placeholder_key())
            .map_err(|source| SpawnError::Prototype { index, source })?;
        let args = self.create_args(index, &record.identity).await?;

        Ok(Some(PreparedObject {
            index,
            args,
            record,
        }))
    }

    fn placeholder_key(&self) -> String {
        let n = self
            .random
            .gen_range(*PLACEHOLDER_KEY_RANGE.start(), *PLACEHOLDER_KEY_RANGE.end());
        placeholder_key(n)
    }

    async fn create_args(
        &self,
        index: usize,
        identity: &IdentityArgs,
    ) -> Result<CreateObjectArgs, SpawnError> {
        let location = self
            .placement(index, IdentityField::Location, identity.location.as_ref())
            .await?;
        let home = self
            .placement(index, IdentityField::Home, identity.home.as_ref())
            .await?;
        let destination = self
            .placement(index, IdentityField::Destination, identity.destination.as_ref())
            .await?;

        Ok(CreateObjectArgs::new(identity.key.clone(), identity.typeclass.clone())
            .with_location(location)
            .with_home(home)
            .with_destination(destination))
    }

    async fn placement(
        &self,
        index: usize,
        field: IdentityField,
        reference: Option<&ObjectRef>,
    ) -> Result<Option<ObjectId>, SpawnError> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        self.lookup
            .resolve(reference)
            .await
            .map(Some)
            .map_err(|source| SpawnError::Reference {
                index,
                field: field.name(),
                reference: reference.clone(),
                source,
            })
    }

    /// Hooks and attachments for one constructed object, stopping at the first failure.
    async fn set_up(&self, object: ObjectId, record: SpawnRecord) -> Result<(), (SetupStage, StoreError)> {
        let SpawnRecord {
            access,
            transient,
            attributes,
            ..
        } = record;

        self.lifecycle
            .basetype_setup(object)
            .await
            .map_err(at(SetupStage::BasetypeSetup))?;
        self.lifecycle
            .at_object_creation(object)
            .await
            .map_err(at(SetupStage::AtObjectCreation))?;

        if !access.permissions.is_empty() {
            self.attachments
                .add_permissions(object, &access.permissions)
                .await
                .map_err(at(SetupStage::Permissions))?;
        }
        if !access.locks.is_empty() {
            self.attachments
                .add_locks(object, &access.locks)
                .await
                .map_err(at(SetupStage::Locks))?;
        }
        if !access.aliases.is_empty() {
            self.attachments
                .add_aliases(object, &access.aliases)
                .await
                .map_err(at(SetupStage::Aliases))?;
        }

        for (name, value) in transient {
            self.attachments
                .set_transient(object, &name, value)
                .await
                .map_err(at(SetupStage::Transient))?;
        }

        if !attributes.is_empty() {
            self.attachments
                .batch_add_attributes(object, attributes.into_iter().collect())
                .await
                .map_err(at(SetupStage::Attributes))?;
        }

        self.lifecycle
            .basetype_posthook_setup(object)
            .await
            .map_err(at(SetupStage::PosthookSetup))
    }
}

fn at(stage: SetupStage) -> impl FnOnce(StoreError) -> (SetupStage, StoreError) {
    move |error| (stage, error)
}
