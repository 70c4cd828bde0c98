//! opconfig Core
//!
//! Loads secrets from a 1Password Connect vault into a layered
//! configuration store at application startup.
//!
//! Every field of every tagged item becomes a `title:label` key. A note
//! field holding a ```` ```json ```` fenced block is flattened and added as
//! a configuration layer of its own.
//!
//! ```rust,ignore
//! use opconfig_core::{SecretsLoader, LoaderOptions, MemoryConfigStore, CancellationToken};
//!
//! let store = MemoryConfigStore::from_env();
//! let loader = SecretsLoader::new(LoaderOptions::default(), logger);
//! loader.load_from_config(&store, &CancellationToken::new()).await?;
//!
//! let password = store.get("Database:password");
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod vault;
pub mod extract;
pub mod loader;

// Re-export commonly used types
pub use types::{VaultItem, Field, FieldType, Section, CancellationToken};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, MemoryLogger};

pub use config::{
    ConfigStore, ConfigLayer, ConfigError, MemoryConfigStore,
    ConnectSettings, SettingKeys, LoaderOptions, ItemFailurePolicy, OptionsFile,
};

pub use vault::{VaultSource, VaultError, ConnectClient, MemoryVault};

pub use extract::{extract_secrets, is_fenced_json, parse_fenced_json};

pub use loader::{SecretsLoader, LoadRequest, LoadSummary, LoadError, LoadResult};
