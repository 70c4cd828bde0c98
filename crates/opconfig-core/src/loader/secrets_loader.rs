//! Secrets loader
//!
//! One load is a single pass:
//! 1. validate the request (no network before this succeeds)
//! 2. list items carrying the filter tag
//! 3. fetch every item's detail, in listing order
//! 4. per item: write its `title:label` secrets, then add its fenced JSON
//!    notes as a layer on top
//! 5. report a summary
//!
//! Items are merged only after every detail fetch has finished, so an
//! aborted or cancelled load never leaves a half-merged item behind. Later
//! items overwrite earlier items' keys; an item's notes layer overrides its
//! own fields.

use std::pin::pin;
use std::sync::Arc;

use futures::StreamExt;

use super::error::{LoadError, LoadResult};
use crate::config::{ConfigStore, ConnectSettings, ItemFailurePolicy, LoaderOptions};
use crate::extract::{extract_secrets, parse_fenced_json};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::{CancellationToken, VaultItem};
use crate::vault::{ConnectClient, VaultSource};
use crate::{log_debug, log_error, log_info, log_warn};

/// What to load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadRequest {
    /// Vault to read from
    pub vault_id: String,
    /// Only items with this tag; empty lists every item
    pub filter_tag: String,
    /// Only items having a section with this label (case-insensitive); empty disables the filter
    pub section_filter: String,
}

impl LoadRequest {
    pub fn new(vault_id: impl Into<String>) -> Self {
        Self {
            vault_id: vault_id.into(),
            ..Default::default()
        }
    }

    pub fn with_filter_tag(mut self, tag: impl Into<String>) -> Self {
        self.filter_tag = tag.into();
        self
    }

    pub fn with_section_filter(mut self, section: impl Into<String>) -> Self {
        self.section_filter = section.into();
        self
    }
}

/// Outcome of a successful load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Items returned by the list call
    pub items_listed: usize,
    /// Items whose detail was retrieved
    pub items_loaded: usize,
    /// Direct key writes
    pub keys_written: usize,
    /// Embedded config layers added
    pub layers_added: usize,
    /// Ids of items left out because their detail could not be fetched
    pub skipped_items: Vec<String>,
    /// Titles of items whose fenced notes failed to parse
    pub embedded_failures: Vec<String>,
}

/// Loads vault secrets into a configuration store
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use opconfig_core::config::{LoaderOptions, MemoryConfigStore};
/// use opconfig_core::logging::ConsoleLogger;
/// use opconfig_core::loader::SecretsLoader;
/// use opconfig_core::types::CancellationToken;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryConfigStore::from_env();
/// let loader = SecretsLoader::new(LoaderOptions::default(), Arc::new(ConsoleLogger::new()));
/// let summary = loader.load_from_config(&store, &CancellationToken::new()).await?;
/// println!("loaded {} item(s)", summary.items_loaded);
/// # Ok(())
/// # }
/// ```
pub struct SecretsLoader {
    options: LoaderOptions,
    logger: SharedLogger,
}

impl Default for SecretsLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default(), Arc::new(NoOpLogger::new()))
    }
}

impl SecretsLoader {
    pub fn new(options: LoaderOptions, logger: SharedLogger) -> Self {
        Self { options, logger }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Request for `vault_id` using the filters from the options
    pub fn request_for(&self, vault_id: impl Into<String>) -> LoadRequest {
        LoadRequest::new(vault_id)
            .with_filter_tag(self.options.filter_tag.clone())
            .with_section_filter(self.options.section_filter.clone())
    }

    /// Read connection settings from `store`, connect to the Connect
    /// server and load into the same store.
    pub async fn load_from_config(
        &self,
        store: &dyn ConfigStore,
        cancel: &CancellationToken,
    ) -> LoadResult<LoadSummary> {
        let settings = ConnectSettings::from_store(store, &self.options.keys)?;
        let client = ConnectClient::from_settings(&settings, self.options.request_timeout())?;
        log_debug!(
            self.logger,
            "Loading secrets from {} (vault {})",
            client.base_url(),
            settings.vault_id
        );

        let request = self.request_for(settings.vault_id.clone());
        self.load_secrets(&client, &request, store, cancel).await
    }

    /// Load every matching item from `source` into `store`
    pub async fn load_secrets(
        &self,
        source: &dyn VaultSource,
        request: &LoadRequest,
        store: &dyn ConfigStore,
        cancel: &CancellationToken,
    ) -> LoadResult<LoadSummary> {
        if request.vault_id.trim().is_empty() {
            return Err(LoadError::Misconfigured {
                key: self.options.keys.vault_id.clone(),
            });
        }

        let mut summary = LoadSummary::default();

        let listed = self.list_items(source, request, cancel).await?;
        summary.items_listed = listed.len();

        let items = self
            .fetch_details(source, request, &listed, cancel, &mut summary)
            .await?;
        summary.items_loaded = items.len();

        for item in &items {
            self.merge_item(item, &request.section_filter, store, &mut summary)?;
        }

        log_info!(
            self.logger,
            "Loaded {} item(s) from vault {} via {}",
            summary.items_loaded,
            request.vault_id,
            source.name()
        );
        Ok(summary)
    }

    async fn list_items(
        &self,
        source: &dyn VaultSource,
        request: &LoadRequest,
        cancel: &CancellationToken,
    ) -> LoadResult<Vec<VaultItem>> {
        let items = cancel
            .run_until_cancelled(source.list_items(&request.vault_id, &request.filter_tag))
            .await
            .ok_or(LoadError::Cancelled)?
            .map_err(|err| {
                log_error!(self.logger, "Listing vault {} failed: {}", request.vault_id, err);
                err
            })?;

        if items.is_empty() {
            log_warn!(
                self.logger,
                "No items found in vault {} with tag '{}'",
                request.vault_id,
                request.filter_tag
            );
        }
        Ok(items)
    }

    /// Fetch details with up to `detail_concurrency` requests in flight.
    /// Results come back in listing order regardless of completion order.
    async fn fetch_details(
        &self,
        source: &dyn VaultSource,
        request: &LoadRequest,
        listed: &[VaultItem],
        cancel: &CancellationToken,
        summary: &mut LoadSummary,
    ) -> LoadResult<Vec<VaultItem>> {
        let concurrency = self.options.detail_concurrency.max(1);
        let mut fetches = pin!(futures::stream::iter(listed.iter().map(move |entry| async move {
            (entry, source.get_item(&request.vault_id, &entry.id).await)
        }))
        .buffered(concurrency));

        let mut items = Vec::with_capacity(listed.len());
        loop {
            let next = cancel
                .run_until_cancelled(fetches.next())
                .await
                .ok_or(LoadError::Cancelled)?;
            let Some((entry, result)) = next else {
                break;
            };

            match (result, self.options.on_item_error) {
                (Ok(item), _) => items.push(item),
                (Err(err), ItemFailurePolicy::Abort) => {
                    log_error!(
                        self.logger,
                        "Fetching item '{}' ({}) failed: {}",
                        entry.title,
                        entry.id,
                        err
                    );
                    return Err(err.into());
                }
                (Err(err), ItemFailurePolicy::Skip) => {
                    log_warn!(
                        self.logger,
                        "Skipping item '{}' ({}): {}",
                        entry.title,
                        entry.id,
                        err
                    );
                    summary.skipped_items.push(entry.id.clone());
                }
            }
        }
        Ok(items)
    }

    fn merge_item(
        &self,
        item: &VaultItem,
        section_filter: &str,
        store: &dyn ConfigStore,
        summary: &mut LoadSummary,
    ) -> LoadResult<()> {
        if item.fields.is_empty() {
            log_warn!(self.logger, "Item '{}' has no fields", item.title);
        }

        // Extract fully before the first write so a duplicate key leaves the store untouched
        let secrets = extract_secrets(item, section_filter)?;
        for (key, value) in &secrets {
            store.set(key, value)?;
            summary.keys_written += 1;
            log_debug!(self.logger, "Set {}", key);
        }

        self.merge_notes(item, store, summary)
    }

    fn merge_notes(
        &self,
        item: &VaultItem,
        store: &dyn ConfigStore,
        summary: &mut LoadSummary,
    ) -> LoadResult<()> {
        let Some(notes) = item.notes_field() else {
            return Ok(());
        };
        if notes.value.trim().is_empty() {
            return Ok(());
        }

        match parse_fenced_json(&notes.value, &item.title) {
            Ok(Some(layer)) => {
                let keys = layer.len();
                store.add_layer(layer)?;
                summary.layers_added += 1;
                log_debug!(
                    self.logger,
                    "Added embedded config from '{}' ({} keys)",
                    item.title,
                    keys
                );
            }
            Ok(None) => {}
            Err(err) => {
                log_warn!(
                    self.logger,
                    "Ignoring embedded config in item '{}': {}",
                    item.title,
                    err
                );
                summary.embedded_failures.push(item.title.clone());
            }
        }
        Ok(())
    }
}
