//! Prototype catalogs loaded from JSON.
//!
//! A catalog document names its prototypes, and a prototype inherits by naming
//! its parents:
//!
//! ```json
//! {
//!   "prototypes": {
//!     "GOBLIN": { "key": "goblin grunt", "health": { "$dice": "2d6+18" } },
//!     "GOBLIN_WIZARD": { "prototype": "GOBLIN", "spells": ["fire ball"] },
//!     "GOBLIN_ARCHWIZARD": { "prototype": ["GOBLIN_WIZARD", "ARCHWIZARD"] }
//!   }
//! }
//! ```
//!
//! Loading links every name into a direct parent reference, so the resolver
//! never sees names. `{"$dice": "..."}` values become deferred rolls.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use protospawn_domain::{
    Deferred, DiceFormula, DiceParseError, DomainError, FieldValue, Prototype, PROTOTYPE_FIELD,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::infrastructure::ports::RandomPort;

/// Key marking a deferred dice roll inside a field value.
pub const DICE_DIRECTIVE: &str = "$dice";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown prototype '{0}'")]
    UnknownPrototype(String),
    #[error("Prototype '{name}' inherits from unknown prototype '{parent}'")]
    UnknownParent { name: String, parent: String },
    #[error("Prototype '{name}' field '{field}': {source}")]
    InvalidDice {
        name: String,
        field: String,
        #[source]
        source: DiceParseError,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    prototypes: BTreeMap<String, Map<String, Value>>,
}

/// Named, fully linked prototypes.
#[derive(Debug, Clone, Default)]
pub struct PrototypeCatalog {
    prototypes: BTreeMap<String, Arc<Prototype>>,
}

impl PrototypeCatalog {
    pub fn from_json_str(json: &str, random: Arc<dyn RandomPort>) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut linker = Linker {
            raw: &document.prototypes,
            linked: BTreeMap::new(),
            active: Vec::new(),
            random,
        };
        for name in document.prototypes.keys() {
            linker.link(name)?;
        }

        tracing::debug!(prototypes = linker.linked.len(), "Loaded prototype catalog");
        Ok(Self {
            prototypes: linker.linked,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, random: Arc<dyn RandomPort>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json, random)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Prototype>> {
        self.prototypes.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prototypes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Prototypes for `names`, in the order given. An empty selection means all of them.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Prototype>, CatalogError> {
        if names.is_empty() {
            return Ok(self.prototypes.values().map(|p| p.as_ref().clone()).collect());
        }
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .map(|p| p.as_ref().clone())
                    .ok_or_else(|| CatalogError::UnknownPrototype(name.to_string()))
            })
            .collect()
    }
}

struct Linker<'a> {
    raw: &'a BTreeMap<String, Map<String, Value>>,
    linked: BTreeMap<String, Arc<Prototype>>,
    /// Names currently being linked, outermost first
    active: Vec<String>,
    random: Arc<dyn RandomPort>,
}

impl Linker<'_> {
    fn link(&mut self, name: &str) -> Result<Arc<Prototype>, CatalogError> {
        if let Some(done) = self.linked.get(name) {
            return Ok(done.clone());
        }
        if let Some(start) = self.active.iter().position(|n| n == name) {
            let mut chain = self.active[start..].to_vec();
            chain.push(name.to_string());
            return Err(DomainError::cyclic_prototype(chain.join(" -> ")).into());
        }
        let raw = self
            .raw
            .get(name)
            .ok_or_else(|| CatalogError::UnknownPrototype(name.to_string()))?;

        self.active.push(name.to_string());
        let prototype = self.build(name, raw);
        self.active.pop();

        let prototype = Arc::new(prototype?);
        self.linked.insert(name.to_string(), prototype.clone());
        Ok(prototype)
    }

    fn build(&mut self, name: &str, raw: &Map<String, Value>) -> Result<Prototype, CatalogError> {
        let mut prototype = Prototype::new();
        for (field, value) in raw {
            let value = if field == PROTOTYPE_FIELD {
                self.parents(name, value)?
            } else {
                self.field_value(name, field, value)?
            };
            prototype.insert(field.clone(), value);
        }
        Ok(prototype)
    }

    fn parents(&mut self, name: &str, value: &Value) -> Result<FieldValue, CatalogError> {
        match value {
            Value::String(parent) => Ok(FieldValue::Prototype(self.link_parent(name, parent)?)),
            Value::Array(parents) => parents
                .iter()
                .map(|parent| match parent {
                    Value::String(parent) => Ok(FieldValue::Prototype(self.link_parent(name, parent)?)),
                    _ => Err(malformed_parents(name)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List),
            _ => Err(malformed_parents(name)),
        }
    }

    fn link_parent(&mut self, name: &str, parent: &str) -> Result<Arc<Prototype>, CatalogError> {
        if !self.raw.contains_key(parent) {
            return Err(CatalogError::UnknownParent {
                name: name.to_string(),
                parent: parent.to_string(),
            });
        }
        self.link(parent)
    }

    fn field_value(&self, name: &str, field: &str, value: &Value) -> Result<FieldValue, CatalogError> {
        let dice = match value {
            Value::Object(map) if map.len() == 1 => map.get(DICE_DIRECTIVE).and_then(Value::as_str),
            _ => None,
        };
        let Some(expr) = dice else {
            return Ok(FieldValue::Literal(value.clone()));
        };

        let formula = DiceFormula::parse(expr).map_err(|source| CatalogError::InvalidDice {
            name: name.to_string(),
            field: field.to_string(),
            source,
        })?;
        let random = self.random.clone();
        let deferred = Deferred::new(move || {
            Value::from(formula.roll_with(|min, max| random.gen_range(min, max)))
        })
        .with_label(formula.to_string());
        Ok(FieldValue::Deferred(deferred))
    }
}

fn malformed_parents(name: &str) -> CatalogError {
    DomainError::malformed_prototype(format!(
        "'{}' in '{}' must name a prototype or a list of prototypes",
        PROTOTYPE_FIELD, name
    ))
    .into()
}
