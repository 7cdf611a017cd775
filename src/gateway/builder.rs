//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::Gateway;
use crate::cache::{CacheConfig, ResponseCache};
use crate::routing::Router;
use crate::usage::UsageRecorder;
use crate::{Config, ModelBackend};

/// Main entry point for creating gateway instances.
pub struct Heimdall;

impl Heimdall {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> HeimdallBuilder {
        HeimdallBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// Every component is constructed explicitly here and owned by the built
/// [`Gateway`]; pass a shared `Arc<UsageRecorder>` or `Arc<ResponseCache>`
/// to let several gateways report into the same instances.
pub struct HeimdallBuilder {
    router: Option<Router>,
    cache_config: CacheConfig,
    cache: Option<Arc<ResponseCache<crate::BackendResponse>>>,
    usage: Option<Arc<UsageRecorder>>,
    timeout: Option<Duration>,
}

impl HeimdallBuilder {
    pub fn new() -> Self {
        Self {
            router: None,
            cache_config: CacheConfig::default(),
            cache: None,
            usage: None,
            timeout: None,
        }
    }

    /// Apply settings from a loaded [`Config`].
    pub fn from_config(self, config: &Config) -> Self {
        self.cache(config.cache.clone())
    }

    /// Use a specific router (e.g. one pinned to a year).
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Configure the response cache the gateway will create.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Share an existing response cache instead of creating one.
    pub fn shared_cache(mut self, cache: Arc<ResponseCache<crate::BackendResponse>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Share an existing usage recorder instead of creating one.
    pub fn usage(mut self, usage: Arc<UsageRecorder>) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Bound each backend call. Without a timeout the call runs to completion.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the gateway around `backend`.
    pub fn build<B: ModelBackend>(self, backend: B) -> Gateway<B> {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResponseCache::new(&self.cache_config)));
        info!(
            max_size = cache.config().max_size,
            ttl_secs = cache.config().ttl.as_secs_f64(),
            timeout = ?self.timeout,
            "heimdall gateway ready"
        );
        Gateway {
            router: self.router.unwrap_or_default(),
            cache,
            usage: self.usage.unwrap_or_default(),
            backend,
            timeout: self.timeout,
        }
    }
}

impl Default for HeimdallBuilder {
    fn default() -> Self {
        Self::new()
    }
}
