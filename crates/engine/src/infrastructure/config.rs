//! Spawner configuration.
//!
//! The system-wide fallbacks for `home` and `typeclass` come from the
//! environment (optionally via `.env` / `.env.local` at the repository root)
//! and are handed to the spawner explicitly as [`SpawnDefaults`].

use protospawn_domain::{ObjectRef, SpawnDefaults};

/// Environment variable holding the default home reference (`#2`, a key, or empty for none).
pub const DEFAULT_HOME_VAR: &str = "PROTOSPAWN_DEFAULT_HOME";

/// Environment variable holding the base typeclass path.
pub const BASE_TYPECLASS_VAR: &str = "PROTOSPAWN_BASE_TYPECLASS";

/// Environment variable holding an RNG seed for reproducible spawns.
pub const SEED_VAR: &str = "PROTOSPAWN_SEED";

const DEFAULT_HOME: &str = "#2";
const BASE_TYPECLASS: &str = "typeclasses.objects.Object";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnerConfig {
    pub default_home: Option<ObjectRef>,
    pub base_typeclass: String,
    pub seed: Option<u64>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            default_home: Some(ObjectRef::Dbref(2)),
            base_typeclass: BASE_TYPECLASS.to_string(),
            seed: None,
        }
    }
}

impl SpawnerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let home = lookup(DEFAULT_HOME_VAR).unwrap_or_else(|| DEFAULT_HOME.to_string());
        // Empty means "no default home"; parse only fails on empty input
        let default_home = home.parse::<ObjectRef>().ok();

        let base_typeclass = lookup(BASE_TYPECLASS_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| BASE_TYPECLASS.to_string());

        let seed = lookup(SEED_VAR).and_then(|s| match s.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                tracing::warn!(value = %s, error = %e, "Ignoring invalid {}", SEED_VAR);
                None
            }
        });

        tracing::debug!(
            default_home = ?default_home,
            base_typeclass = %base_typeclass,
            seed = ?seed,
            "Loaded spawner configuration"
        );

        Self {
            default_home,
            base_typeclass,
            seed,
        }
    }

    pub fn spawn_defaults(&self) -> SpawnDefaults {
        SpawnDefaults {
            default_home: self.default_home.clone(),
            base_typeclass: self.base_typeclass.clone(),
        }
    }
}

/// Load `.env.local` then `.env` from the repository root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = SpawnerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SpawnerConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = SpawnerConfig::from_lookup(lookup(&[
            (DEFAULT_HOME_VAR, "Limbo"),
            (BASE_TYPECLASS_VAR, " typeclasses.monsters.Monster "),
        ]));
        assert_eq!(config.default_home, Some(ObjectRef::Key("Limbo".to_string())));
        assert_eq!(config.base_typeclass, "typeclasses.monsters.Monster");
    }

    #[test]
    fn empty_home_disables_default_home() {
        let config = SpawnerConfig::from_lookup(lookup(&[(DEFAULT_HOME_VAR, "")]));
        assert_eq!(config.default_home, None);
        assert_eq!(config.spawn_defaults().default_home, None);
    }

    #[test]
    fn seed_is_parsed_and_garbage_ignored() {
        let config = SpawnerConfig::from_lookup(lookup(&[(SEED_VAR, " 1234 ")]));
        assert_eq!(config.seed, Some(1234));

        let config = SpawnerConfig::from_lookup(lookup(&[(SEED_VAR, "dice")]));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn blank_typeclass_falls_back_to_base() {
        let config = SpawnerConfig::from_lookup(lookup(&[(BASE_TYPECLASS_VAR, "  ")]));
        assert_eq!(config.base_typeclass, BASE_TYPECLASS);
    }
}
