//! Protospawn Engine - Main entry point.
//!
//! Usage: `protospawn-engine [CATALOG.json [NAME...]]`
//!
//! Without arguments, spawns the built-in goblin and goblin archwizard.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use protospawn_engine::demo::GoblinPrototypes;
use protospawn_engine::infrastructure::{
    catalog::PrototypeCatalog,
    clock::{SeededRandom, SystemClock, SystemRandom},
    config::{load_dotenv_from_repo_root, SpawnerConfig},
    memory_store::InMemoryObjectStore,
    ports::{ClockPort, RandomPort},
};
use protospawn_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "protospawn_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Protospawn Engine");

    // Load configuration
    let config = SpawnerConfig::from_env();

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let random: Arc<dyn RandomPort> = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded random source");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(SystemRandom),
    };

    let store = Arc::new(InMemoryObjectStore::new(clock));
    let rooms = store.seed_starting_rooms(&config.base_typeclass)?;
    tracing::info!(rooms = rooms.len(), "Seeded starting rooms");

    let mut args = std::env::args().skip(1);
    let prototypes = match args.next() {
        Some(path) => {
            let catalog = PrototypeCatalog::from_path(&path, random.clone())?;
            let names: Vec<String> = args.collect();
            tracing::info!(
                path = %path,
                prototypes = catalog.len(),
                requested = names.len(),
                "Loaded prototype catalog"
            );
            catalog.select(&names)?
        }
        None => GoblinPrototypes::new(random.clone()).default_batch(),
    };

    let app = App::with_store(store.clone(), random, &config);
    let spawned = app.use_cases.spawn.execute(&prototypes).await?;

    for handle in &spawned {
        if let Some(object) = store.get(handle.id) {
            let attributes: Vec<String> = object
                .attributes
                .iter()
                .map(|(name, value)| format!("{name}={value:?}"))
                .collect();
            tracing::info!(
                object = %handle.dbref_string(),
                key = %handle.key,
                typeclass = %handle.typeclass,
                attributes = %attributes.join(", "),
                "Spawned object"
            );
        }
    }

    let keys: Vec<&str> = spawned.iter().map(|h| h.key.as_str()).collect();
    println!("{keys:?}");

    Ok(())
}
