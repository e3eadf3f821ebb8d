//! Top-level client and the shared transport + cache context.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use ragdesk_core::{ChatTarget, Result};

use crate::agents::AgentsApi;
use crate::cache::TtlCache;
use crate::chat::{ChatApi, ChatSession};
use crate::config::ClientConfig;
use crate::documents::DocumentsApi;
use crate::ingest::IngestApi;
use crate::poller::IngestPoller;
use crate::transport::{QueryParams, Transport};
use crate::vaults::VaultsApi;

/// Transport plus the response cache, shared by every resource client.
#[derive(Debug, Clone)]
pub(crate) struct ClientContext {
    pub(crate) transport: Transport,
    pub(crate) cache: Arc<TtlCache<Value>>,
}

impl ClientContext {
    /// Serve `key` from the cache, or fetch `path` and cache the raw JSON.
    ///
    /// Payloads are decoded before they are cached so a malformed response is
    /// never served from the cache.
    pub(crate) async fn cached_get<T: DeserializeOwned>(
        &self,
        key: &str,
        path: &str,
        params: QueryParams<'_>,
    ) -> Result<T> {
        if let Some(value) = self.cache.get(key) {
            debug!(cache_key = key, "Cache hit");
            return Ok(serde_json::from_value(value)?);
        }

        debug!(cache_key = key, "Cache miss");
        let value: Value = self.transport.get(path, params).await?;
        let decoded = serde_json::from_value(value.clone())?;
        self.cache.set(key, value);
        Ok(decoded)
    }

    pub(crate) fn invalidate(&self, pattern: &str) {
        let removed = self.cache.invalidate(Some(pattern));
        debug!(pattern, removed, "Cache invalidated");
    }
}

/// Entry point for talking to the RAG backend.
///
/// Cloning is cheap; clones share the HTTP connection pool and the cache.
///
/// # Example
///
/// ```rust,no_run
/// use ragdesk_client::{ClientConfig, RagClient};
///
/// #[tokio::main]
/// async fn main() -> ragdesk_client::Result<()> {
///     let client = RagClient::new(ClientConfig::from_env())?;
///     for vault in client.vaults().list().await? {
///         println!("{} ({})", vault.name, vault.id);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RagClient {
    ctx: ClientContext,
    config: ClientConfig,
}

impl RagClient {
    /// Create a client, validating `config` first.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = Transport::new(&config)?;
        let cache = Arc::new(TtlCache::new(config.cache_ttl()));
        Ok(Self {
            ctx: ClientContext { transport, cache },
            config,
        })
    }

    /// Create from `RAGDESK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Normalized API base URL (no trailing slash), e.g. for cURL snippets.
    pub fn base_url(&self) -> &str {
        self.ctx.transport.base_url()
    }

    pub fn vaults(&self) -> VaultsApi {
        VaultsApi::new(self.ctx.clone())
    }

    pub fn agents(&self) -> AgentsApi {
        AgentsApi::new(self.ctx.clone())
    }

    pub fn documents(&self) -> DocumentsApi {
        DocumentsApi::new(self.ctx.clone())
    }

    pub fn ingest(&self) -> IngestApi {
        IngestApi::new(self.ctx.clone())
    }

    pub fn chat(&self) -> ChatApi {
        ChatApi::new(self.ctx.clone())
    }

    /// A new chat transcript with a fresh session id.
    pub fn chat_session(&self, target: ChatTarget) -> ChatSession {
        ChatSession::new(self.chat(), target)
    }

    /// A poller checking ingestion status at the configured interval.
    pub fn ingest_poller(&self) -> IngestPoller {
        IngestPoller::new(Arc::new(self.ingest()), self.config.poll_interval())
    }

    /// Drop cached reads matching `pattern`, or all of them.
    pub fn invalidate_cache(&self, pattern: Option<&str>) -> usize {
        self.ctx.cache.invalidate(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = RagClient::new(ClientConfig::with_base_url("")).unwrap_err();
        assert!(matches!(err, ragdesk_core::Error::Config(_)));
    }

    #[test]
    fn test_base_url_normalized() {
        let client = RagClient::new(ClientConfig::with_base_url("http://localhost:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_clones_share_cache() {
        let client = RagClient::new(ClientConfig::default()).unwrap();
        let clone = client.clone();
        client.ctx.cache.set("vaults", Value::Array(vec![]));
        assert_eq!(clone.invalidate_cache(Some("vaults")), 1);
        assert_eq!(client.invalidate_cache(None), 0);
    }
}
