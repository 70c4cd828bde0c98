//! Configuration store trait

use super::layer::ConfigLayer;

/// Destination configuration store
///
/// An ordered stack of layers. Reads resolve against the most recently
/// added layer that holds a key. `set` assigns the value in every layer,
/// so a direct write overrides all layers added before it but loses to
/// layers added after it.
///
/// Implementations:
/// - `MemoryConfigStore`: in-process layers
/// - Host adapters: forward to the host application's configuration
pub trait ConfigStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Look up a key
    fn get(&self, key: &str) -> Option<String>;

    /// Assign a key directly
    fn set(&self, key: &str, value: &str) -> ConfigResult<()>;

    /// Push a layer on top of the existing ones
    fn add_layer(&self, layer: ConfigLayer) -> ConfigResult<()>;

    /// Check if a key resolves to a value
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration layer '{source_name}' must be a JSON object, found {found}")]
    NotAnObject { source_name: String, found: &'static str },

    #[error("Required setting '{key}' is missing or blank")]
    MissingSetting { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
