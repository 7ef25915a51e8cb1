//! Named key generators for the `Custom` strategy.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use sqlmapper_core::{Result, Value};

/// A caller-supplied primary-key generator.
///
/// Receives the entity name and returns the key value. Returning
/// `Value::Null` leaves the key unset.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, entity: &'static str) -> Result<Value>;
}

impl<F> KeyGenerator for F
where
    F: Fn(&str) -> Value + Send + Sync,
{
    fn generate(&self, entity: &'static str) -> Result<Value> {
        Ok(self(entity))
    }
}

/// Shared name → generator mapping.
///
/// Registration happens at setup; lookups happen on every insert that uses a
/// custom strategy, so reads take a shared lock.
///
/// ```ignore
/// let registry = GeneratorRegistry::new();
/// registry.register("order_no", |entity: &str| Value::from(format!("{entity}-0001")));
/// ```
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: RwLock<HashMap<String, Arc<dyn KeyGenerator>>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `generator` under `name`, replacing any previous entry.
    pub fn register(&self, name: impl Into<String>, generator: impl KeyGenerator + 'static) {
        let name = name.into();
        tracing::debug!(generator = %name, "Registering key generator");
        self.generators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(generator));
    }

    /// Look up a generator by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn KeyGenerator>> {
        self.generators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.generators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let generators = self.generators.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = generators.keys().collect();
        names.sort();
        f.debug_struct("GeneratorRegistry")
            .field("generators", &names)
            .finish()
    }
}
