//! Unified error types for the domain layer
//!
//! Provides a common error type for prototype resolution and spawn-record
//! partitioning, so callers never need to match on strings or use anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The `prototype` field holds something other than a prototype or a list of prototypes
    #[error("Malformed prototype: {0}")]
    MalformedPrototype(String),

    /// A parent chain refers back to a prototype that is still being resolved
    #[error("Cyclic prototype: {0}")]
    CyclicPrototype(String),

    /// A reserved field holds a value of the wrong shape
    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a malformed prototype error
    pub fn malformed_prototype(msg: impl Into<String>) -> Self {
        Self::MalformedPrototype(msg.into())
    }

    /// Create a cyclic prototype error naming the prototype that was revisited
    pub fn cyclic_prototype(name: impl Into<String>) -> Self {
        Self::CyclicPrototype(name.into())
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected,
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
