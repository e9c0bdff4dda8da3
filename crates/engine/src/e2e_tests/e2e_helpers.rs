//! E2E test helpers for constructing the full application stack.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use protospawn_domain::{ObjectHandle, Prototype};

use crate::app::App;
use crate::infrastructure::clock::{FixedClock, SystemRandom};
use crate::infrastructure::config::SpawnerConfig;
use crate::infrastructure::memory_store::{InMemoryObjectStore, StoredObject};
use crate::infrastructure::ports::RandomPort;
use crate::use_cases::SpawnError;

pub const ROOM_TYPECLASS: &str = "typeclasses.rooms.Room";

/// A wired App over a fresh store holding Void (#1) and Limbo (#2).
pub struct E2ETestContext {
    pub store: Arc<InMemoryObjectStore>,
    pub app: App,
    pub void: ObjectHandle,
    pub limbo: ObjectHandle,
}

impl E2ETestContext {
    pub fn setup() -> Self {
        Self::setup_with(SpawnerConfig::default(), Arc::new(SystemRandom))
    }

    pub fn setup_with(config: SpawnerConfig, random: Arc<dyn RandomPort>) -> Self {
        let store = InMemoryObjectStore::new(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        )));
        Self::setup_with_store(store, config, random)
    }

    pub fn setup_with_store(
        store: InMemoryObjectStore,
        config: SpawnerConfig,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let store = Arc::new(store);
        let mut rooms = store
            .seed_starting_rooms(ROOM_TYPECLASS)
            .expect("Seeding rooms should succeed")
            .into_iter();
        let void = rooms.next().expect("Void should be seeded");
        let limbo = rooms.next().expect("Limbo should be seeded");

        let app = App::with_store(store.clone(), random, &config);
        Self {
            store,
            app,
            void,
            limbo,
        }
    }

    pub async fn spawn(&self, prototypes: &[Prototype]) -> Result<Vec<ObjectHandle>, SpawnError> {
        self.app.use_cases.spawn.execute(prototypes).await
    }

    /// Stored state of a spawned object.
    pub fn object(&self, handle: &ObjectHandle) -> StoredObject {
        self.store
            .get(handle.id)
            .unwrap_or_else(|| panic!("{} should be in the store", handle.dbref_string()))
    }
}
