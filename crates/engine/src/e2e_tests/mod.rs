//! End-to-end spawning tests.
//!
//! These run the full App (config, spawn use case, in-memory object store)
//! without mocks:
//!
//! ```bash
//! cargo test -p protospawn-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod goblin_spawn_tests;
mod placement_tests;

pub use e2e_helpers::*;
