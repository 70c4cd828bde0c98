//! Configuration store abstractions
//!
//! - `ConfigStore`: the destination the loader merges into
//! - `ConfigLayer`: a named set of flattened keys (JSON objects become `a:b:c` keys)
//! - `MemoryConfigStore`: ordered in-memory layers
//! - `ConnectSettings` / `SettingKeys`: where the loader finds its connection settings
//! - `OptionsFile` / `LoaderOptions`: YAML-backed loader options (user/workspace level)

mod traits;
mod layer;
mod memory;
mod settings;
mod file;

pub use traits::{ConfigStore, ConfigError, ConfigResult};
pub use layer::{ConfigLayer, KEY_DELIMITER};
pub use memory::MemoryConfigStore;
pub use settings::{ConnectSettings, SettingKeys};
pub use file::{OptionsFile, OptionsLevel, LoaderOptions, ItemFailurePolicy};
