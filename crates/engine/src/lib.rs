//! Protospawn Engine library.
//!
//! Spawns game objects from prototypes.
//!
//! ## Structure
//!
//! - `use_cases/` - Batch spawning orchestration
//! - `infrastructure/` - Ports, the in-memory object store, catalogs and configuration
//! - `demo` - Built-in goblin prototypes
//! - `app` - Application composition

pub mod app;
pub mod demo;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end tests against the in-memory object store.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
