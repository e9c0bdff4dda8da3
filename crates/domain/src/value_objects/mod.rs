//! Value objects - Immutable objects defined by their attributes

mod dice;
mod field_value;
mod object_ref;

pub use dice::{DiceFormula, DiceParseError};
pub use field_value::{Deferred, FieldValue};
pub use object_ref::ObjectRef;
