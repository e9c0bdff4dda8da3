//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Object construction (could swap the in-memory store for a database)
//! - Reference lookup, lifecycle hooks and attachment handlers (owned by the store)
//! - Clock/Random (for testing)

mod error;
mod objects;
mod testing;

pub use error::StoreError;

// =============================================================================
// Object Store Ports
// =============================================================================
pub use objects::{AttachmentHandlers, ObjectFactory, ObjectLifecycle, ObjectLookup};

#[cfg(test)]
pub use objects::{
    MockAttachmentHandlers, MockObjectFactory, MockObjectLifecycle, MockObjectLookup,
};

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::MockRandomPort;
