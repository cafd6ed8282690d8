//! State shared by every [`Exchange`](super::exchange::Exchange) handle.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::http::{HttpTransport, ReqwestTransport};
use crate::core::cache::{ResponseCache, SWEEP_INTERVAL};
use crate::core::config::AppConfig;
use crate::core::Result;

/// One HTTP transport, one response cache and the API credentials.
///
/// Owned by the application and handed to each client as an `Arc`, so all
/// clients with caching enabled see the same entries.
pub struct ExchangeContext {
    base_url: String,
    access_key: String,
    transport: Arc<dyn HttpTransport>,
    cache: Arc<ResponseCache>,
}

impl ExchangeContext {
    /// Creates a context talking to `base_url` over a default [`ReqwestTransport`].
    pub fn new(base_url: &str, access_key: impl Into<String>) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(30))?;
        Ok(Self::with_transport(base_url, access_key, Arc::new(transport)))
    }

    pub fn with_transport(
        base_url: &str,
        access_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let context = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.into(),
            transport,
            cache: Arc::new(ResponseCache::new()),
        };
        context.start_sweeper();
        context
    }

    /// Replaces the response cache, e.g. to share one between contexts.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self.start_sweeper();
        self
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(
            &config.base_url,
            config.access_key(),
            Arc::new(transport),
        ))
    }

    // Expired entries are still ignored on lookup when no runtime is around.
    // A cache that already has a sweeper keeps just that one.
    fn start_sweeper(&self) {
        if tokio::runtime::Handle::try_current().is_ok() {
            self.cache.spawn_sweeper(SWEEP_INTERVAL);
        } else {
            debug!("No tokio runtime, cache sweeper not started");
        }
    }

    /// Full URL of the endpoint at `path`, e.g. `latest` or a `YYYY-MM-DD` date.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }
}
