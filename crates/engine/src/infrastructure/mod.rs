//! Infrastructure implementations.
//!
//! Contains port trait implementations and the adapters around them.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod memory_store;
pub mod ports;
