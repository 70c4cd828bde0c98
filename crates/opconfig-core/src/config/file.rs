//! File-based loader options (YAML)
//!
//! Supports user-level (~/.config/opconfig/config.yaml) and workspace-level
//! (.config/opconfig/config.yaml) options files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::settings::SettingKeys;
use super::traits::{ConfigError, ConfigResult};

/// What the loader does when fetching one item's detail fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFailurePolicy {
    /// Abort the whole load
    #[default]
    Abort,
    /// Log a warning, leave the item out and keep going
    Skip,
}

/// Options controlling one secrets load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Configuration keys holding the connection settings
    pub keys: SettingKeys,
    /// Only list items carrying this tag; empty means no filter
    pub filter_tag: String,
    /// Only extract fields from items that have a section with this label
    pub section_filter: String,
    /// Policy for detail-fetch failures
    pub on_item_error: ItemFailurePolicy,
    /// Maximum number of detail requests in flight
    pub detail_concurrency: usize,
    /// Per-request timeout for the HTTP client, at least one second
    pub request_timeout_secs: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            keys: SettingKeys::default(),
            filter_tag: String::new(),
            section_filter: String::new(),
            on_item_error: ItemFailurePolicy::Abort,
            detail_concurrency: 1,
            request_timeout_secs: 30,
        }
    }
}

impl LoaderOptions {
    pub fn with_filter_tag(mut self, tag: impl Into<String>) -> Self {
        self.filter_tag = tag.into();
        self
    }

    pub fn with_section_filter(mut self, section: impl Into<String>) -> Self {
        self.section_filter = section.into();
        self
    }

    pub fn with_item_failure_policy(mut self, policy: ItemFailurePolicy) -> Self {
        self.on_item_error = policy;
        self
    }

    pub fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency;
        self
    }

    pub fn with_keys(mut self, keys: SettingKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// HTTP request timeout; zero is raised to one second
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Options file level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsLevel {
    User,
    Workspace,
}

impl OptionsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionsLevel::User => "user",
            OptionsLevel::Workspace => "workspace",
        }
    }
}

/// YAML options file
///
/// # Example
///
/// ```no_run
/// use opconfig_core::config::OptionsFile;
///
/// let options = OptionsFile::user().load().unwrap();
/// println!("filter tag: {:?}", options.filter_tag);
/// ```
#[derive(Debug, Clone)]
pub struct OptionsFile {
    path: PathBuf,
    level: OptionsLevel,
}

impl OptionsFile {
    pub fn new(path: impl Into<PathBuf>, level: OptionsLevel) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }

    /// User-level options (~/.config/opconfig/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("opconfig").join("config.yaml"), OptionsLevel::User)
    }

    /// Workspace-level options (.config/opconfig/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("opconfig").join("config.yaml");
        Self::new(path, OptionsLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> OptionsLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load options; a missing file yields the defaults
    pub fn load(&self) -> ConfigResult<LoaderOptions> {
        if !self.path.exists() {
            return Ok(LoaderOptions::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LoaderOptions::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Other(format!("Failed to parse YAML {}: {}", self.path.display(), e)))
    }

    /// Write options, creating parent directories
    pub fn save(&self, options: &LoaderOptions) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(options)
            .map_err(|e| ConfigError::Other(format!("Failed to serialize YAML: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let file = OptionsFile::workspace(dir.path());
        assert!(!file.exists());
        assert_eq!(file.load().unwrap(), LoaderOptions::default());
        assert_eq!(file.level().as_str(), "workspace");
    }

    #[test]
    fn test_workspace_path() {
        let file = OptionsFile::workspace("/srv/app");
        assert_eq!(file.path(), Path::new("/srv/app/.config/opconfig/config.yaml"));
    }

    #[test]
    fn test_user_path() {
        let file = OptionsFile::user();
        assert!(file.path().ends_with("opconfig/config.yaml"));
        assert_eq!(file.level(), OptionsLevel::User);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "filter_tag: backend\non_item_error: skip\nkeys:\n  token: Vault:Token\n",
        )
        .unwrap();

        let options = OptionsFile::new(&path, OptionsLevel::User).load().unwrap();
        assert_eq!(options.filter_tag, "backend");
        assert_eq!(options.on_item_error, ItemFailurePolicy::Skip);
        assert_eq!(options.keys.token, "Vault:Token");
        assert_eq!(options.keys.base_url, "OP_API_BASEURL");
        assert_eq!(options.detail_concurrency, 1);
        assert_eq!(options.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let file = OptionsFile::workspace(dir.path());
        let options = LoaderOptions::default()
            .with_filter_tag("web")
            .with_section_filter("Production")
            .with_detail_concurrency(4);

        file.save(&options).unwrap();
        assert!(file.exists());
        assert_eq!(file.load().unwrap(), options);
    }

    #[test]
    fn test_request_timeout_has_floor() {
        assert_eq!(LoaderOptions::default().request_timeout(), Duration::from_secs(30));
        let options = LoaderOptions::default().with_request_timeout_secs(0);
        assert_eq!(options.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "on_item_error: [not, a, policy]").unwrap();

        let err = OptionsFile::new(&path, OptionsLevel::User).load().unwrap_err();
        assert!(matches!(err, ConfigError::Other(ref msg) if msg.contains("Failed to parse YAML")));
    }
}
