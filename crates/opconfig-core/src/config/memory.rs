//! In-memory layered configuration store

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::layer::ConfigLayer;
use super::traits::{ConfigResult, ConfigStore};

const BASE_LAYER: &str = "memory";

/// In-memory configuration store
///
/// Starts with a single empty base layer. `set` writes into every layer,
/// `add_layer` pushes on top, and reads walk the layers newest-first, so the
/// most recent call touching a key decides its value.
///
/// # Example
///
/// ```
/// use opconfig_core::config::{ConfigStore, ConfigLayer, MemoryConfigStore};
///
/// let store = MemoryConfigStore::new();
/// store.set("Mode", "direct").unwrap();
/// store.add_layer(ConfigLayer::from_pairs("notes", [("Mode", "layered")])).unwrap();
/// assert_eq!(store.get("Mode"), Some("layered".to_string()));
///
/// store.set("Mode", "direct-again").unwrap();
/// assert_eq!(store.get("Mode"), Some("direct-again".to_string()));
/// ```
#[derive(Debug)]
pub struct MemoryConfigStore {
    layers: RwLock<Vec<ConfigLayer>>,
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfigStore {
    /// Create a store with one empty base layer
    pub fn new() -> Self {
        Self {
            layers: RwLock::new(vec![ConfigLayer::new(BASE_LAYER)]),
        }
    }

    /// Create a store whose base layer holds `values`
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            layers: RwLock::new(vec![ConfigLayer::from_pairs(BASE_LAYER, values)]),
        }
    }

    /// Create a store seeded with a snapshot of the process environment
    pub fn from_env() -> Self {
        let store = Self::new();
        store.layers.write().push(ConfigLayer::from_env());
        store
    }

    /// Number of layers, including the base layer
    pub fn layer_count(&self) -> usize {
        self.layers.read().len()
    }

    /// Source names of all layers, bottom first
    pub fn layer_sources(&self) -> Vec<String> {
        self.layers.read().iter().map(|l| l.source().to_string()).collect()
    }

    /// Effective key/value view after applying layer precedence
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let layers = self.layers.read();
        let mut merged = BTreeMap::new();
        for layer in layers.iter() {
            for (k, v) in layer.iter() {
                merged.insert(k.to_string(), v.to_string());
            }
        }
        merged
    }
}

impl ConfigStore for MemoryConfigStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        let layers = self.layers.read();
        layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(key))
            .map(str::to_string)
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut layers = self.layers.write();
        for layer in layers.iter_mut() {
            layer.insert(key, value);
        }
        Ok(())
    }

    fn add_layer(&self, layer: ConfigLayer) -> ConfigResult<()> {
        self.layers.write().push(layer);
        Ok(())
    }
}
