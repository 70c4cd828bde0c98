//! Vault source trait and error taxonomy

use async_trait::async_trait;

use crate::types::VaultItem;

/// Errors from vault calls
///
/// Raw response bodies are never included; they may echo secret material.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("transport error communicating with the vault: {0}")]
    Transport(String),

    #[error("vault authentication failed (check bearer token)")]
    Unauthorized,

    #[error("vault resource not found: {0}")]
    NotFound(String),

    #[error("unexpected vault response for {resource}: status {status}")]
    Status { status: u16, resource: String },

    #[error("malformed vault response for {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("vault returned no detail for item {item_id}")]
    MissingDetail { item_id: String },
}

impl VaultError {
    /// Whether this is a network or HTTP-level failure
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VaultError::Transport(_)
                | VaultError::Unauthorized
                | VaultError::NotFound(_)
                | VaultError::Status { .. }
        )
    }
}

pub type VaultResult<T> = Result<T, VaultError>;

/// Source of vault items
///
/// Implementations perform exactly one attempt per call; retrying is the
/// caller's business.
#[async_trait]
pub trait VaultSource: Send + Sync {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// List item summaries in `vault_id` carrying `tag`; an empty tag lists everything.
    /// An empty vault is `Ok(vec![])`, not an error.
    async fn list_items(&self, vault_id: &str, tag: &str) -> VaultResult<Vec<VaultItem>>;

    /// Fetch one item with its fields and sections
    async fn get_item(&self, vault_id: &str, item_id: &str) -> VaultResult<VaultItem>;
}
