//! Loader error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::extract::ExtractError;
use crate::vault::VaultError;

/// Errors that abort a secrets load
///
/// Malformed embedded config in a note is not listed here: it is logged and
/// the load continues without that item's layer.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A required connection setting is missing or blank
    #[error("secrets loader is misconfigured: '{key}' is missing or blank")]
    Misconfigured { key: String },

    /// Listing or fetching from the vault failed
    #[error("vault request failed: {0}")]
    Vault(#[from] VaultError),

    /// Two fields of one item map to the same key
    #[error("duplicate key '{key}' in item '{item}'")]
    DuplicateKey { item: String, key: String },

    /// The destination store rejected a write
    #[error("configuration store error: {0}")]
    Config(ConfigError),

    /// The load was cancelled while a vault call was pending
    #[error("secrets load cancelled")]
    Cancelled,
}

impl From<ConfigError> for LoadError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingSetting { key } => LoadError::Misconfigured { key },
            other => LoadError::Config(other),
        }
    }
}

impl From<ExtractError> for LoadError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::DuplicateKey { item, key } => LoadError::DuplicateKey { item, key },
        }
    }
}

impl LoadError {
    /// Whether the failure came from the network or HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Vault(err) if err.is_transport())
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
