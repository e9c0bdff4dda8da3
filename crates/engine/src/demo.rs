//! Built-in goblin prototypes used by the demo binary and end-to-end tests.

use std::sync::Arc;

use protospawn_domain::{Deferred, Prototype};
use serde_json::json;

use crate::infrastructure::ports::RandomPort;

/// The goblin family, sharing one random source for their health rolls.
pub struct GoblinPrototypes {
    pub nobody: Prototype,
    pub goblin: Arc<Prototype>,
    pub goblin_wizard: Arc<Prototype>,
    pub goblin_archer: Arc<Prototype>,
    pub archwizard: Arc<Prototype>,
    pub goblin_archwizard: Prototype,
}

impl GoblinPrototypes {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        let health = Deferred::new(move || json!(random.gen_range(20, 30))).with_label("20-30");

        let goblin = Arc::new(
            Prototype::new()
                .with("key", "goblin grunt")
                .with("health", health)
                .with("resists", json!(["cold", "poison"]))
                .with("attacks", json!(["fists"]))
                .with("weaknesses", json!(["fire", "light"])),
        );

        let goblin_wizard = Arc::new(
            Prototype::new()
                .with_parent(goblin.clone())
                .with("key", "goblin wizard")
                .with("spells", json!(["fire ball", "lighting bolt"])),
        );

        let goblin_archer = Arc::new(
            Prototype::new()
                .with_parent(goblin.clone())
                .with("key", "goblin archer")
                .with("attacks", json!(["short bow"])),
        );

        let archwizard = Arc::new(Prototype::new().with("attacks", json!(["archwizard staff"])));

        let goblin_archwizard = Prototype::new()
            .with("key", "goblin archwizard")
            .with_parents([goblin_wizard.clone(), archwizard.clone()]);

        Self {
            nobody: Prototype::new(),
            goblin,
            goblin_wizard,
            goblin_archer,
            archwizard,
            goblin_archwizard,
        }
    }

    /// The batch the demo spawns by default.
    pub fn default_batch(&self) -> Vec<Prototype> {
        vec![self.goblin.as_ref().clone(), self.goblin_archwizard.clone()]
    }
}
