//! protospawn domain layer.
//!
//! Pure data and algorithms: prototype specifications, the resolver that
//! flattens inheritance chains, field classification, and the spawn records
//! the engine hands to the object store. No I/O, no RNG state.

pub mod entities;
pub mod error;
pub mod ids;
pub mod prototype;
pub mod spawn_record;
pub mod value_objects;

pub use entities::{CreateObjectArgs, ObjectHandle};

pub use error::DomainError;

pub use ids::{BatchId, ObjectId};

pub use prototype::{
    resolve, AccessField, FieldCategory, IdentityField, Prototype, ResolvedFields,
    PROTOTYPE_FIELD, TRANSIENT_PREFIX,
};

pub use spawn_record::{
    placeholder_key, AccessControl, IdentityArgs, SpawnDefaults, SpawnRecord,
    PLACEHOLDER_KEY_RANGE,
};

pub use value_objects::{Deferred, DiceFormula, DiceParseError, FieldValue, ObjectRef};
