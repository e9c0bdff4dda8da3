//! E2E tests spawning the built-in goblin prototypes.
//!
//! Tests verify:
//! - Identity defaults (typeclass, home) are applied
//! - Multi-parent inheritance reaches the stored attributes
//! - Lifecycle hooks run in order on every object
//! - Deferred values are evaluated per spawned object

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use protospawn_domain::{FieldValue, Prototype};
use serde_json::json;

use super::E2ETestContext;
use crate::demo::GoblinPrototypes;
use crate::infrastructure::clock::{FixedRandom, SystemRandom};
use crate::infrastructure::config::SpawnerConfig;
use crate::infrastructure::memory_store::LifecycleHook;

fn int_of(value: Option<&FieldValue>) -> i64 {
    value
        .and_then(FieldValue::as_literal)
        .and_then(|v| v.as_i64())
        .expect("attribute should be an evaluated integer")
}

#[tokio::test]
async fn test_goblin_grunt_gets_defaults() {
    let ctx = E2ETestContext::setup();
    let goblins = GoblinPrototypes::new(Arc::new(SystemRandom));

    let spawned = ctx
        .spawn(&[goblins.goblin.as_ref().clone()])
        .await
        .expect("Spawning goblin should succeed");
    assert_eq!(spawned.len(), 1);

    let grunt = ctx.object(&spawned[0]);
    assert_eq!(grunt.handle.key, "goblin grunt");
    assert_eq!(grunt.handle.dbref, 3, "First spawned object follows the seeded rooms");
    assert_eq!(grunt.handle.typeclass, "typeclasses.objects.Object");
    assert_eq!(grunt.home, Some(ctx.limbo.id), "Default home is #2");
    assert_eq!(grunt.location, None);
    assert_eq!(grunt.destination, None);

    let health = int_of(grunt.attribute("health"));
    assert!((20..=30).contains(&health), "health {health} out of range");
    assert_eq!(
        grunt.attribute("resists"),
        Some(&FieldValue::Literal(json!(["cold", "poison"])))
    );
    assert_eq!(grunt.attribute("attacks"), Some(&FieldValue::Literal(json!(["fists"]))));
    assert!(grunt.attribute("key").is_none(), "Identity fields are not attributes");
    assert!(grunt.transient.is_empty());
}

#[tokio::test]
async fn test_goblin_archwizard_inherits_from_both_parents() {
    let ctx = E2ETestContext::setup();
    let goblins = GoblinPrototypes::new(Arc::new(FixedRandom(24)));

    let spawned = ctx
        .spawn(&goblins.default_batch())
        .await
        .expect("Spawning default batch should succeed");

    let keys: Vec<&str> = spawned.iter().map(|h| h.key.as_str()).collect();
    assert_eq!(keys, vec!["goblin grunt", "goblin archwizard"]);

    let archwizard = ctx.object(&spawned[1]);
    assert_eq!(
        archwizard.attribute("attacks"),
        Some(&FieldValue::Literal(json!(["archwizard staff"]))),
        "Rightmost parent wins"
    );
    assert_eq!(
        archwizard.attribute("spells"),
        Some(&FieldValue::Literal(json!(["fire ball", "lighting bolt"])))
    );
    assert_eq!(
        archwizard.attribute("weaknesses"),
        Some(&FieldValue::Literal(json!(["fire", "light"])))
    );
    assert_eq!(int_of(archwizard.attribute("health")), 24);
}

#[tokio::test]
async fn test_every_object_runs_hooks_in_order() {
    let ctx = E2ETestContext::setup();
    let goblins = GoblinPrototypes::new(Arc::new(FixedRandom(20)));

    let spawned = ctx
        .spawn(&[
            goblins.goblin_wizard.as_ref().clone(),
            goblins.goblin_archer.as_ref().clone(),
        ])
        .await
        .expect("Spawning should succeed");

    for handle in &spawned {
        let object = ctx.object(handle);
        assert_eq!(
            object.hooks,
            vec![
                LifecycleHook::BasetypeSetup,
                LifecycleHook::AtObjectCreation,
                LifecycleHook::BasetypePosthookSetup,
            ]
        );
        assert!(object.is_initialized());
    }
}

#[tokio::test]
async fn test_empty_prototypes_are_skipped() {
    let ctx = E2ETestContext::setup();
    let goblins = GoblinPrototypes::new(Arc::new(FixedRandom(20)));

    let spawned = ctx
        .spawn(&[
            goblins.goblin.as_ref().clone(),
            goblins.nobody.clone(),
            goblins.goblin_archer.as_ref().clone(),
        ])
        .await
        .expect("Spawning should succeed");

    let dbrefs: Vec<i64> = spawned.iter().map(|h| h.dbref).collect();
    assert_eq!(dbrefs, vec![3, 4]);
    assert_eq!(spawned[1].key, "goblin archer");
    assert_eq!(ctx.store.len(), 4);
}

#[tokio::test]
async fn test_keyless_prototype_gets_placeholder_key() {
    let ctx = E2ETestContext::setup_with(SpawnerConfig::default(), Arc::new(FixedRandom(7)));

    let spawned = ctx
        .spawn(&[Prototype::new().with("strength", 12)])
        .await
        .expect("Spawning should succeed");

    assert_eq!(spawned[0].key, "Spawned Object 000007");
}

#[tokio::test]
async fn test_deferred_values_differ_per_object() {
    let ctx = E2ETestContext::setup();
    let rolls = Arc::new(AtomicUsize::new(0));
    let counter = rolls.clone();
    let parent = Arc::new(
        Prototype::new()
            .with("key", "rat")
            .with("serial", FieldValue::deferred(move || json!(counter.fetch_add(1, Ordering::SeqCst)))),
    );
    let rat = Prototype::new().with_parent(parent);

    let first = ctx.spawn(&[rat.clone(), rat.clone()]).await.expect("first batch");
    let second = ctx.spawn(&[rat]).await.expect("second batch");

    let serials: Vec<i64> = first
        .iter()
        .chain(second.iter())
        .map(|h| int_of(ctx.object(h).attribute("serial")))
        .collect();
    assert_eq!(serials, vec![0, 1, 2]);
    assert_eq!(rolls.load(Ordering::SeqCst), 3);
}
