//! Connection settings for the Connect API

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult, ConfigStore};

pub const DEFAULT_BASE_URL_KEY: &str = "OP_API_BASEURL";
pub const DEFAULT_TOKEN_KEY: &str = "OP_API_TOKEN";
pub const DEFAULT_VAULT_ID_KEY: &str = "OP_API_VAULT_ID";

/// Names of the configuration keys that hold the connection settings
///
/// Passed explicitly to the loader; hosts that keep these settings under
/// other names override the fields instead of mutating shared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingKeys {
    pub base_url: String,
    pub token: String,
    pub vault_id: String,
}

impl Default for SettingKeys {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL_KEY.to_string(),
            token: DEFAULT_TOKEN_KEY.to_string(),
            vault_id: DEFAULT_VAULT_ID_KEY.to_string(),
        }
    }
}

impl SettingKeys {
    pub fn with_base_url(mut self, key: impl Into<String>) -> Self {
        self.base_url = key.into();
        self
    }

    pub fn with_token(mut self, key: impl Into<String>) -> Self {
        self.token = key.into();
        self
    }

    pub fn with_vault_id(mut self, key: impl Into<String>) -> Self {
        self.vault_id = key.into();
        self
    }
}

/// Resolved connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    pub base_url: String,
    pub token: String,
    pub vault_id: String,
}

impl ConnectSettings {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        vault_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            vault_id: vault_id.into(),
        }
    }

    /// Read the settings from `store` under the names in `keys`.
    ///
    /// Fails with [`ConfigError::MissingSetting`] naming the first blank
    /// key, checked in base URL, token, vault id order.
    pub fn from_store(store: &dyn ConfigStore, keys: &SettingKeys) -> ConfigResult<Self> {
        let settings = Self {
            base_url: store.get(&keys.base_url).unwrap_or_default(),
            token: store.get(&keys.token).unwrap_or_default(),
            vault_id: store.get(&keys.vault_id).unwrap_or_default(),
        };
        settings.validate(keys)?;
        Ok(settings)
    }

    /// Check that every setting is non-blank
    pub fn validate(&self, keys: &SettingKeys) -> ConfigResult<()> {
        let required = [
            (&self.base_url, &keys.base_url),
            (&self.token, &keys.token),
            (&self.vault_id, &keys.vault_id),
        ];
        match required.iter().find(|(value, _)| value.trim().is_empty()) {
            Some((_, key)) => Err(ConfigError::MissingSetting { key: key.to_string() }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ConnectSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectSettings")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("vault_id", &self.vault_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    fn full_store() -> MemoryConfigStore {
        MemoryConfigStore::with_values([
            ("OP_API_BASEURL", "http://connect:8080"),
            ("OP_API_TOKEN", "tok"),
            ("OP_API_VAULT_ID", "vault1"),
        ])
    }

    #[test]
    fn test_default_keys() {
        let keys = SettingKeys::default();
        assert_eq!(keys.base_url, "OP_API_BASEURL");
        assert_eq!(keys.token, "OP_API_TOKEN");
        assert_eq!(keys.vault_id, "OP_API_VAULT_ID");
    }

    #[test]
    fn test_from_store_default_keys() {
        let settings = ConnectSettings::from_store(&full_store(), &SettingKeys::default()).unwrap();
        assert_eq!(settings, ConnectSettings::new("http://connect:8080", "tok", "vault1"));
    }

    #[test]
    fn test_from_store_remapped_keys() {
        let store = MemoryConfigStore::with_values([
            ("Vault:Url", "http://other"),
            ("Vault:Token", "t2"),
            ("Vault:Id", "v2"),
        ]);
        let keys = SettingKeys::default()
            .with_base_url("Vault:Url")
            .with_token("Vault:Token")
            .with_vault_id("Vault:Id");

        let settings = ConnectSettings::from_store(&store, &keys).unwrap();
        assert_eq!(settings.base_url, "http://other");
        assert_eq!(settings.vault_id, "v2");
    }

    #[test]
    fn test_missing_setting_names_key() {
        let store = MemoryConfigStore::with_values([
            ("OP_API_BASEURL", "http://connect:8080"),
            ("OP_API_VAULT_ID", "vault1"),
        ]);
        let err = ConnectSettings::from_store(&store, &SettingKeys::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { ref key } if key == "OP_API_TOKEN"));
    }

    #[test]
    fn test_blank_setting_rejected() {
        let store = full_store();
        store.set("OP_API_BASEURL", "   ").unwrap();
        let err = ConnectSettings::from_store(&store, &SettingKeys::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { ref key } if key == "OP_API_BASEURL"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = ConnectSettings::new("http://x", "super-secret", "v");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
