use async_trait::async_trait;
use hop_core::cache::Result;
use hop_core::{Alias, CacheStore};
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// An in-process cache implementation using Moka.
///
/// Suited to single-node deployments and tests. Entries are only visible to
/// the process that wrote them.
#[derive(Debug, Clone)]
pub struct MokaCacheStore {
    cache: Cache<String, String>,
}

impl MokaCacheStore {
    /// Creates a new Moka cache with default settings.
    ///
    /// The cache will have a default maximum capacity of 10,000 entries and
    /// no expiry.
    pub fn new() -> Self {
        let cache = Cache::builder().max_capacity(10_000).build();
        Self { cache }
    }

    /// Creates a new Moka cache with time-to-live (TTL) settings.
    ///
    /// Entries will expire after the specified TTL from the time of insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> MokaConfigBuilder {
        MokaConfig::builder()
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn save_url(&self, alias: &Alias, url: &str) -> Result<bool> {
        trace!(alias = %alias, "Storing url in Moka cache");

        // `or_insert` resolves concurrent inserts for one key to a single winner.
        let entry = self
            .cache
            .entry(alias.as_str().to_owned())
            .or_insert(url.to_owned())
            .await;

        let written = entry.is_fresh();
        debug!(alias = %alias, written, "Moka set-if-absent completed");
        Ok(written)
    }

    async fn replace_url(&self, alias: &Alias, url: &str) -> Result<()> {
        self.cache
            .insert(alias.as_str().to_owned(), url.to_owned())
            .await;
        debug!(alias = %alias, "Replaced entry in Moka cache");
        Ok(())
    }

    async fn get_url(&self, alias: &Alias) -> Result<Option<String>> {
        match self.cache.get(alias.as_str()).await {
            Some(url) => {
                debug!(alias = %alias, "Cache hit in Moka");
                Ok(Some(url))
            }
            None => {
                trace!(alias = %alias, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn delete_url(&self, alias: &Alias) -> Result<()> {
        self.cache.invalidate(alias.as_str()).await;
        debug!(alias = %alias, "Removed entry from Moka cache (if present)");
        Ok(())
    }
}

/// Configuration for creating a [`MokaCacheStore`] with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct MokaConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
}

impl From<MokaConfig> for MokaCacheStore {
    fn from(config: MokaConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        MokaCacheStore {
            cache: builder.build(),
        }
    }
}
