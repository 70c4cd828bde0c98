//! 1Password Connect Server API client.
//!
//! Wraps the two REST endpoints the loader needs:
//! - `GET /v1/vaults/{vault}/items?tags={tag}`
//! - `GET /v1/vaults/{vault}/items/{item}`
//!
//! Response bodies are never copied into errors or logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::traits::{VaultError, VaultResult, VaultSource};
use crate::config::ConnectSettings;
use crate::logging::file_logger as log;
use crate::types::VaultItem;

const LOG_MODULE: &str = "vault::connect";

/// 1Password Connect REST API client
#[derive(Clone)]
pub struct ConnectClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for ConnectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ConnectClient {
    fn user_agent() -> String {
        format!("opconfig/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Create a client for the Connect Server at `base_url`
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> VaultResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| VaultError::Transport(format!("invalid Connect base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(VaultError::Transport(format!(
                "invalid Connect base URL: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: token.to_owned(),
        })
    }

    /// Create a client from resolved connection settings
    pub fn from_settings(settings: &ConnectSettings, timeout: Duration) -> VaultResult<Self> {
        Self::new(&settings.base_url, &settings.token, timeout)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base}/v1/vaults/{vault_id}/items[/{item_id}]` with each id percent-encoded
    fn items_url(&self, vault_id: &str, item_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "vaults", vault_id, "items"])
                .extend(item_id);
        }
        url
    }

    /// GET `url` and decode the body. `null` or an empty body decode to `None`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        resource: &str,
    ) -> VaultResult<Option<T>> {
        log::debug(LOG_MODULE, &format!("GET {resource}"));

        let mut request = self.http.get(url).bearer_auth(&self.token);
        if !query.is_empty() {
            request = request.query(query);
        }

        let resp = request.send().await.map_err(|e| {
            log::error(LOG_MODULE, &format!("request for {resource} failed: {e}"));
            VaultError::Transport(e.to_string())
        })?;

        let status = resp.status().as_u16();
        log::debug(LOG_MODULE, &format!("{resource} -> {status}"));
        match status {
            200..=299 => {}
            401 | 403 => return Err(VaultError::Unauthorized),
            404 => return Err(VaultError::NotFound(resource.to_string())),
            other => {
                return Err(VaultError::Status {
                    status: other,
                    resource: resource.to_string(),
                })
            }
        }

        let body = resp
            .text()
            .await
            .map_err(|e| VaultError::Transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Option<T>>(&body).map_err(|source| VaultError::Decode {
            resource: resource.to_string(),
            source,
        })
    }
}

#[async_trait]
impl VaultSource for ConnectClient {
    fn name(&self) -> &str {
        "connect"
    }

    async fn list_items(&self, vault_id: &str, tag: &str) -> VaultResult<Vec<VaultItem>> {
        let url = self.items_url(vault_id, None);
        // The tags parameter is always sent, empty when unfiltered
        let items = self
            .fetch::<Vec<VaultItem>>(url, &[("tags", tag)], &format!("items of vault {vault_id}"))
            .await?;
        Ok(items.unwrap_or_default())
    }

    async fn get_item(&self, vault_id: &str, item_id: &str) -> VaultResult<VaultItem> {
        let url = self.items_url(vault_id, Some(item_id));
        self.fetch::<VaultItem>(url, &[], &format!("item {item_id} in vault {vault_id}"))
            .await?
            .ok_or_else(|| VaultError::MissingDetail {
                item_id: item_id.to_string(),
            })
    }
}
