//! Domain entities

mod object;

pub use object::{CreateObjectArgs, ObjectHandle};
