//! Spawn operation errors.

use std::fmt;

use protospawn_domain::{DomainError, ObjectHandle, ObjectRef};

use crate::infrastructure::ports::StoreError;

/// Step of an object's setup sequence, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    BasetypeSetup,
    AtObjectCreation,
    Permissions,
    Locks,
    Aliases,
    Transient,
    Attributes,
    PosthookSetup,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BasetypeSetup => "basetype setup",
            Self::AtObjectCreation => "at_object_creation",
            Self::Permissions => "permissions",
            Self::Locks => "locks",
            Self::Aliases => "aliases",
            Self::Transient => "transient attributes",
            Self::Attributes => "attributes",
            Self::PosthookSetup => "posthook setup",
        };
        f.write_str(name)
    }
}

/// An object that was constructed but could not be fully set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupFailure {
    /// Position in the input batch
    pub index: usize,
    pub object: ObjectHandle,
    pub stage: SetupStage,
    pub error: StoreError,
}

impl fmt::Display for SetupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} '{}' failed at {}: {}",
            self.object.dbref, self.object.key, self.stage, self.error
        )
    }
}

/// Errors that can occur while spawning a batch.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("Prototype {index} is invalid: {source}")]
    Prototype {
        index: usize,
        #[source]
        source: DomainError,
    },
    #[error("Prototype {index}: cannot resolve {field} '{reference}': {source}")]
    Reference {
        index: usize,
        field: &'static str,
        reference: ObjectRef,
        #[source]
        source: StoreError,
    },
    #[error("Failed to construct '{key}' (prototype {index}): {source}")]
    Construction {
        index: usize,
        key: String,
        /// Objects created before the failure; they are not rolled back
        constructed: Vec<ObjectHandle>,
        #[source]
        source: StoreError,
    },
    #[error("{} of {total} objects failed setup", failures.len())]
    PartialBatch {
        /// Every constructed object, in input order, including the failed ones
        spawned: Vec<ObjectHandle>,
        failures: Vec<SetupFailure>,
        total: usize,
    },
}

impl SpawnError {
    /// Objects that exist in the store despite the error.
    pub fn created(&self) -> &[ObjectHandle] {
        match self {
            Self::Construction { constructed, .. } => constructed,
            Self::PartialBatch { spawned, .. } => spawned,
            Self::Prototype { .. } | Self::Reference { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protospawn_domain::ObjectId;

    fn handle(dbref: i64, key: &str) -> ObjectHandle {
        ObjectHandle {
            id: ObjectId::new(),
            dbref,
            key: key.to_string(),
            typeclass: "typeclasses.objects.Object".to_string(),
        }
    }

    #[test]
    fn partial_batch_reports_failure_count() {
        let goblin = handle(3, "goblin grunt");
        let err = SpawnError::PartialBatch {
            spawned: vec![goblin.clone()],
            failures: vec![SetupFailure {
                index: 0,
                object: goblin,
                stage: SetupStage::Locks,
                error: StoreError::storage("add_locks", "lock parser rejected 'get:'"),
            }],
            total: 1,
        };
        assert_eq!(err.to_string(), "1 of 1 objects failed setup");
        assert_eq!(err.created().len(), 1);
    }

    #[test]
    fn setup_failure_names_object_and_stage() {
        let failure = SetupFailure {
            index: 2,
            object: handle(7, "goblin wizard"),
            stage: SetupStage::PosthookSetup,
            error: StoreError::construction("boom"),
        };
        let text = failure.to_string();
        assert!(text.starts_with("#7 'goblin wizard' failed at posthook setup"));
    }

    #[test]
    fn reference_errors_created_nothing() {
        let err = SpawnError::Reference {
            index: 0,
            field: "location",
            reference: ObjectRef::Dbref(99),
            source: StoreError::not_found("Object", "#99"),
        };
        assert!(err.created().is_empty());
        assert!(err.to_string().contains("location '#99'"));
    }
}
