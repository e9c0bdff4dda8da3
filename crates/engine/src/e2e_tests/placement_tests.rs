//! E2E tests for placement references, access control and failure handling.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use protospawn_domain::{FieldValue, ObjectRef, Prototype};
use serde_json::{json, Value};

use super::{E2ETestContext, ROOM_TYPECLASS};
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::config::SpawnerConfig;
use crate::infrastructure::memory_store::InMemoryObjectStore;
use crate::use_cases::SpawnError;

fn sword() -> Prototype {
    Prototype::new().with("key", "rusty sword")
}

#[tokio::test]
async fn test_placements_resolve_by_dbref_key_and_handle() {
    let ctx = E2ETestContext::setup();

    let spawned = ctx
        .spawn(&[sword()
            .with("location", "#1")
            .with("home", "Limbo")
            .with("destination", FieldValue::Object(ctx.void.id))])
        .await
        .expect("Spawning should succeed");

    let object = ctx.object(&spawned[0]);
    assert_eq!(object.location, Some(ctx.void.id));
    assert_eq!(object.home, Some(ctx.limbo.id));
    assert_eq!(object.destination, Some(ctx.void.id));
}

#[tokio::test]
async fn test_placement_can_target_object_spawned_earlier() {
    let ctx = E2ETestContext::setup();

    let chest = ctx
        .spawn(&[Prototype::new().with("key", "chest")])
        .await
        .expect("Spawning chest should succeed");
    let spawned = ctx
        .spawn(&[sword().with("location", chest[0].dbref_string())])
        .await
        .expect("Spawning sword should succeed");

    assert_eq!(ctx.object(&spawned[0]).location, Some(chest[0].id));
}

#[tokio::test]
async fn test_explicit_null_home_overrides_default() {
    let ctx = E2ETestContext::setup();

    let spawned = ctx
        .spawn(&[sword().with("home", Value::Null)])
        .await
        .expect("Spawning should succeed");

    assert_eq!(ctx.object(&spawned[0]).home, None);
}

#[tokio::test]
async fn test_configured_default_home_and_typeclass() {
    let config = SpawnerConfig {
        default_home: Some(ObjectRef::Key("Void".to_string())),
        base_typeclass: "typeclasses.things.Thing".to_string(),
        ..SpawnerConfig::default()
    };
    let ctx = E2ETestContext::setup_with(config, Arc::new(FixedRandom(1)));

    let spawned = ctx.spawn(&[sword()]).await.expect("Spawning should succeed");

    let object = ctx.object(&spawned[0]);
    assert_eq!(object.home, Some(ctx.void.id));
    assert_eq!(object.handle.typeclass, "typeclasses.things.Thing");
}

#[tokio::test]
async fn test_access_control_and_transients_are_attached() {
    let ctx = E2ETestContext::setup();

    let spawned = ctx
        .spawn(&[sword()
            .with("permissions", "Builder")
            .with("locks", json!(["get:all()", "drop:holds()"]))
            .with("aliases", json!(["sword", "blade"]))
            .with("ndb_glint", FieldValue::deferred(|| json!("faint")))
            .with("ndb_", 1)
            .with("sharpness", 3)])
        .await
        .expect("Spawning should succeed");

    let object = ctx.object(&spawned[0]);
    assert_eq!(object.permissions, vec!["Builder"]);
    assert_eq!(object.locks, vec!["get:all()", "drop:holds()"]);
    assert_eq!(object.aliases, vec!["sword", "blade"]);

    let glint = object.transient.get("glint").expect("transient should be stored");
    assert!(glint.is_deferred(), "Transient values are stored unevaluated");
    assert!(object.attribute("ndb_glint").is_none());

    // A bare prefix has nothing left to name, so it stays a persisted attribute
    assert_eq!(object.attribute("ndb_"), Some(&FieldValue::from(1)));
    assert_eq!(object.attribute("sharpness"), Some(&FieldValue::from(3)));
}

#[tokio::test]
async fn test_unknown_location_creates_nothing() {
    let ctx = E2ETestContext::setup();

    let result = ctx
        .spawn(&[sword(), sword().with("location", "#99")])
        .await;

    match result {
        Err(SpawnError::Reference {
            index, reference, ..
        }) => {
            assert_eq!(index, 1);
            assert_eq!(reference, ObjectRef::Dbref(99));
        }
        other => panic!("expected reference error, got {other:?}"),
    }
    assert_eq!(ctx.store.len(), 2, "Only the seeded rooms exist");
}

#[tokio::test]
async fn test_construction_failure_keeps_earlier_objects() {
    let store = InMemoryObjectStore::new(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    )))
    .with_known_typeclasses([ROOM_TYPECLASS, "typeclasses.objects.Object"]);
    let ctx = E2ETestContext::setup_with_store(store, SpawnerConfig::default(), Arc::new(FixedRandom(1)));

    let result = ctx
        .spawn(&[
            sword(),
            sword().with("typeclass", "typeclasses.missing.Ghost"),
            sword(),
        ])
        .await;

    match result {
        Err(err @ SpawnError::Construction { .. }) => {
            assert_eq!(err.created().len(), 1);
            let kept = ctx.object(&err.created()[0]);
            assert!(
                kept.hooks.is_empty(),
                "Setup only starts once the whole batch is constructed"
            );
        }
        other => panic!("expected construction error, got {other:?}"),
    }
    assert_eq!(ctx.store.len(), 3, "No rollback of earlier objects");
}

#[tokio::test]
async fn test_malformed_prototype_is_rejected() {
    let ctx = E2ETestContext::setup();

    let result = ctx
        .spawn(&[sword().with("prototype", json!({ "key": "not a prototype" }))])
        .await;

    assert!(matches!(result, Err(SpawnError::Prototype { index: 0, .. })));
    assert_eq!(ctx.store.len(), 2);
}
