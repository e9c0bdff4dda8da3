//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    config::SpawnerConfig,
    ports::{AttachmentHandlers, ObjectFactory, ObjectLifecycle, ObjectLookup, RandomPort},
};
use crate::use_cases::SpawnPrototypes;

/// Main application state.
///
/// Holds the object store ports and use cases.
pub struct App {
    pub ports: Ports,
    pub use_cases: UseCases,
}

/// Port traits injected directly; one store usually backs all of them.
pub struct Ports {
    pub factory: Arc<dyn ObjectFactory>,
    pub lookup: Arc<dyn ObjectLookup>,
    pub lifecycle: Arc<dyn ObjectLifecycle>,
    pub attachments: Arc<dyn AttachmentHandlers>,
    pub random: Arc<dyn RandomPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub spawn: Arc<SpawnPrototypes>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(ports: Ports, config: &SpawnerConfig) -> Self {
        let spawn = Arc::new(SpawnPrototypes::new(
            ports.factory.clone(),
            ports.lookup.clone(),
            ports.lifecycle.clone(),
            ports.attachments.clone(),
            ports.random.clone(),
            config.spawn_defaults(),
        ));

        Self {
            ports,
            use_cases: UseCases { spawn },
        }
    }

    /// Wire every object port to the same store.
    pub fn with_store<S>(store: Arc<S>, random: Arc<dyn RandomPort>, config: &SpawnerConfig) -> Self
    where
        S: ObjectFactory + ObjectLookup + ObjectLifecycle + AttachmentHandlers + 'static,
    {
        let ports = Ports {
            factory: store.clone(),
            lookup: store.clone(),
            lifecycle: store.clone(),
            attachments: store,
            random,
        };
        Self::new(ports, config)
    }
}
