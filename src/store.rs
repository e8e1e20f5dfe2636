use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{Config, StoreBackend};

/// Options for a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Seconds until the stored value expires. `None` writes without
    /// expiration.
    pub expiration_ttl: Option<u64>,
}

/// Capability interface to the managed key/value store.
///
/// The proxy performs exactly one of these calls per request. Errors are
/// surfaced as-is; the handler layer maps them to a generic server failure.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value for `key`, or `None` if the store holds no such key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `key -> value`, with expiration when the options carry a TTL.
    async fn put(&self, key: &str, value: String, options: PutOptions) -> Result<()>;

    /// Remove `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Build the store client the config names.
pub fn from_config(config: &Config) -> Result<Arc<dyn KvStore>> {
    match &config.backend {
        StoreBackend::Cloudflare {
            account_id,
            namespace_id,
            api_token,
        } => {
            let store = CloudflareKv::new(account_id, namespace_id, api_token)?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Cloudflare Workers KV, driven through its REST API.
///
/// Values live under
/// `/accounts/{account}/storage/kv/namespaces/{namespace}/values/{key}`;
/// GET returns the raw value, PUT takes the raw value as the body with
/// `expiration_ttl` as a query parameter, DELETE removes the key.
#[derive(Debug)]
pub struct CloudflareKv {
    client: reqwest::Client,
    values_url: String,
}

impl CloudflareKv {
    pub fn new(account_id: &str, namespace_id: &str, api_token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {api_token}"))
            .context("CLOUDFLARE_API_TOKEN is not a valid header value")?;
        headers.insert(header::AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build Cloudflare KV HTTP client")?;

        Ok(Self {
            client,
            values_url: format!(
                "https://api.cloudflare.com/client/v4/accounts/{account_id}/storage/kv/namespaces/{namespace_id}/values"
            ),
        })
    }

    fn value_url(&self, key: &str) -> String {
        format!("{}/{key}", self.values_url)
    }
}

#[async_trait]
impl KvStore for CloudflareKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.value_url(key))
            .send()
            .await
            .context("Cloudflare KV get request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Key not present in Cloudflare KV: {key}");
            return Ok(None);
        }

        let value = response
            .error_for_status()
            .context("Cloudflare KV get returned an error status")?
            .text()
            .await
            .context("Failed to read Cloudflare KV value body")?;

        tracing::debug!("Fetched key from Cloudflare KV: {key}");
        Ok(Some(value))
    }

    async fn put(&self, key: &str, value: String, options: PutOptions) -> Result<()> {
        let mut request = self.client.put(self.value_url(key));
        if let Some(ttl) = options.expiration_ttl {
            request = request.query(&[("expiration_ttl", ttl)]);
        }

        request
            .body(value)
            .send()
            .await
            .context("Cloudflare KV put request failed")?
            .error_for_status()
            .context("Cloudflare KV put returned an error status")?;

        tracing::debug!("Wrote key to Cloudflare KV: {key} (ttl: {:?})", options.expiration_ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.value_url(key))
            .send()
            .await
            .context("Cloudflare KV delete request failed")?;

        // Deleting a key that was never written comes back 404; the proxy
        // treats delete as idempotent.
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Delete of absent key in Cloudflare KV: {key}");
            return Ok(());
        }

        response
            .error_for_status()
            .context("Cloudflare KV delete returned an error status")?;

        tracing::debug!("Deleted key from Cloudflare KV: {key}");
        Ok(())
    }
}

/// A value held by [`MemoryStore`], together with the TTL it was written
/// with. The memory store records TTLs but never expires entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    pub value: String,
    pub expiration_ttl: Option<u64>,
}

/// In-process store used with `KV_BACKEND=memory` and throughout the handler
/// tests. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Snapshot of a single entry, for inspection in tests.
    pub async fn entry(&self, key: &str) -> Option<StoredValue> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).map(|e| e.value.clone()))
    }

    async fn put(&self, key: &str, value: String, options: PutOptions) -> Result<()> {
        self.entries.write().await.insert(
            key.to_string(),
            StoredValue {
                value,
                expiration_ttl: options.expiration_ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
