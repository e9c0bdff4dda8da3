//! Use cases - User story orchestration.
//!
//! Use cases orchestrate across ports to fulfill user stories.

pub mod spawn;

pub use spawn::{SetupFailure, SetupStage, SpawnError, SpawnPrototypes};
