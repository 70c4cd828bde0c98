//! In-memory vault

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{VaultError, VaultResult, VaultSource};
use crate::types::VaultItem;

#[derive(Debug, Default)]
struct MemoryVaultState {
    items: Vec<VaultItem>,
    failing_items: HashSet<String>,
    missing_detail: HashSet<String>,
    list_failure: Option<String>,
    list_calls: Vec<(String, String)>,
    detail_calls: Vec<String>,
}

/// In-process vault holding a fixed, ordered set of items
///
/// Listing returns summaries (no fields or sections) in insertion order,
/// filtered by tag like the Connect API. Failures can be injected per item
/// to exercise the loader's error paths.
///
/// # Example
///
/// ```
/// use opconfig_core::vault::MemoryVault;
/// use opconfig_core::types::{VaultItem, Field};
///
/// let vault = MemoryVault::new("v1");
/// vault.insert(VaultItem::new("i1", "Payments").with_field(Field::new("f1", "key", "abc")));
/// assert_eq!(vault.len(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryVault {
    vault_id: String,
    state: RwLock<MemoryVaultState>,
}

impl MemoryVault {
    /// Create an empty vault with the given id
    pub fn new(vault_id: impl Into<String>) -> Self {
        Self {
            vault_id: vault_id.into(),
            state: RwLock::new(MemoryVaultState::default()),
        }
    }

    /// Create a vault pre-filled with items
    pub fn with_items(vault_id: impl Into<String>, items: Vec<VaultItem>) -> Self {
        let vault = Self::new(vault_id);
        vault.state.write().items = items;
        vault
    }

    pub fn vault_id(&self) -> &str {
        &self.vault_id
    }

    /// Append an item (replacing any item with the same id in place)
    pub fn insert(&self, item: VaultItem) {
        let mut state = self.state.write();
        match state.items.iter().position(|i| i.id == item.id) {
            Some(pos) => state.items[pos] = item,
            None => state.items.push(item),
        }
    }

    /// Make detail requests for `item_id` fail with a transport error
    pub fn fail_detail(&self, item_id: impl Into<String>) {
        self.state.write().failing_items.insert(item_id.into());
    }

    /// Make detail requests for `item_id` return an empty payload
    pub fn drop_detail(&self, item_id: impl Into<String>) {
        self.state.write().missing_detail.insert(item_id.into());
    }

    /// Make listing fail with a transport error
    pub fn fail_list(&self, message: impl Into<String>) {
        self.state.write().list_failure = Some(message.into());
    }

    /// `(vault_id, tag)` of every list call so far
    pub fn list_calls(&self) -> Vec<(String, String)> {
        self.state.read().list_calls.clone()
    }

    /// Item ids of every detail call so far
    pub fn detail_calls(&self) -> Vec<String> {
        self.state.read().detail_calls.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_vault(&self, vault_id: &str) -> VaultResult<()> {
        if vault_id == self.vault_id {
            Ok(())
        } else {
            Err(VaultError::NotFound(format!("vault {vault_id}")))
        }
    }
}

#[async_trait]
impl VaultSource for MemoryVault {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_items(&self, vault_id: &str, tag: &str) -> VaultResult<Vec<VaultItem>> {
        let mut state = self.state.write();
        state.list_calls.push((vault_id.to_string(), tag.to_string()));
        if let Some(message) = &state.list_failure {
            return Err(VaultError::Transport(message.clone()));
        }
        self.check_vault(vault_id)?;

        Ok(state
            .items
            .iter()
            .filter(|item| tag.is_empty() || item.has_tag(tag))
            .map(VaultItem::to_summary)
            .collect())
    }

    async fn get_item(&self, vault_id: &str, item_id: &str) -> VaultResult<VaultItem> {
        let mut state = self.state.write();
        state.detail_calls.push(item_id.to_string());
        self.check_vault(vault_id)?;

        if state.failing_items.contains(item_id) {
            return Err(VaultError::Transport(format!("injected failure for item {item_id}")));
        }
        if state.missing_detail.contains(item_id) {
            return Err(VaultError::MissingDetail {
                item_id: item_id.to_string(),
            });
        }

        state
            .items
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(format!("item {item_id} in vault {vault_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Section};

    fn sample() -> MemoryVault {
        MemoryVault::with_items(
            "v1",
            vec![
                VaultItem::new("i1", "Payments")
                    .with_tag("backend")
                    .with_section(Section::new("s1", "Production"))
                    .with_field(Field::new("f1", "key", "abc")),
                VaultItem::new("i2", "Frontend").with_tag("web"),
            ],
        )
    }

    #[tokio::test]
    async fn test_list_all_returns_summaries() {
        let vault = sample();
        let items = vault.list_items("v1", "").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "i1");
        assert!(items[0].fields.is_empty());
        assert!(items[0].sections.is_empty());
        assert_eq!(vault.list_calls(), vec![("v1".to_string(), String::new())]);
    }

    #[tokio::test]
    async fn test_list_filters_by_tag() {
        let vault = sample();
        let items = vault.list_items("v1", "web").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Frontend");
    }

    #[tokio::test]
    async fn test_get_item_returns_detail() {
        let vault = sample();
        let item = vault.get_item("v1", "i1").await.unwrap();
        assert_eq!(item.fields.len(), 1);
        assert_eq!(vault.detail_calls(), vec!["i1".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_vault_and_item() {
        let vault = sample();
        assert!(matches!(vault.list_items("other", "").await, Err(VaultError::NotFound(_))));
        assert!(matches!(vault.get_item("v1", "nope").await, Err(VaultError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let vault = sample();
        vault.fail_detail("i1");
        vault.drop_detail("i2");

        assert!(matches!(vault.get_item("v1", "i1").await, Err(VaultError::Transport(_))));
        assert!(matches!(
            vault.get_item("v1", "i2").await,
            Err(VaultError::MissingDetail { .. })
        ));

        vault.fail_list("down");
        assert!(matches!(vault.list_items("v1", "").await, Err(VaultError::Transport(_))));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let vault = sample();
        vault.insert(VaultItem::new("i1", "Renamed"));
        vault.insert(VaultItem::new("i3", "New"));
        assert_eq!(vault.len(), 3);
        assert!(!vault.is_empty());
        assert_eq!(vault.vault_id(), "v1");
    }
}
