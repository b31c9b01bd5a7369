use async_trait::async_trait;
use hop_core::cache::Result;
use hop_core::{Alias, CacheError, CacheStore};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, trace, warn};

const DEFAULT_KEY_PREFIX: &str = "hop:url:";

/// A Redis-based implementation of [`CacheStore`].
///
/// URLs are stored as plain strings under a configurable key prefix. Writes
/// use `SET NX` so a concurrent writer never replaces an entry, and carry a
/// `PX` expiry when a TTL is configured.
#[derive(Debug, Clone)]
pub struct RedisCacheStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Option<Duration>,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisCacheStore {
    /// Creates a new Redis cache with the default key prefix and no expiry.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl: None,
        }
    }

    /// Opens a multiplexed connection to `redis_url` and wraps it.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Unavailable(format!("failed to connect to Redis: {e}")))?;
        Ok(Self::new(conn))
    }

    /// Replaces the key prefix (e.g. "myapp:url:").
    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Sets the expiry applied to every written entry. A zero TTL disables expiry.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    fn cache_key(&self, alias: &Alias) -> String {
        format!("{}{}", self.key_prefix, alias.as_str())
    }

    fn set_cmd(&self, key: &str, url: &str) -> redis::Cmd {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(url);
        if let Some(ttl) = self.ttl {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            cmd.arg("PX").arg(millis);
        }
        cmd
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn save_url(&self, alias: &Alias, url: &str) -> Result<bool> {
        let key = self.cache_key(alias);
        trace!(alias = %alias, "Storing url in Redis cache");

        let mut cmd = self.set_cmd(&key, url);
        cmd.arg("NX");

        let mut conn = self.conn.clone();
        // SET NX replies OK when written and nil when the key already exists.
        match cmd.query_async::<Option<String>>(&mut conn).await {
            Ok(reply) => {
                let written = reply.is_some();
                debug!(alias = %alias, written, "Redis set-if-absent completed");
                Ok(written)
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Failed to cache url in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }

    async fn replace_url(&self, alias: &Alias, url: &str) -> Result<()> {
        let key = self.cache_key(alias);

        let mut conn = self.conn.clone();
        match self.set_cmd(&key, url).query_async::<()>(&mut conn).await {
            Ok(()) => {
                debug!(alias = %alias, "Replaced entry in Redis cache");
                Ok(())
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Failed to replace url in Redis");
                Err(map_redis_error("failed to replace value in Redis", e))
            }
        }
    }

    async fn get_url(&self, alias: &Alias) -> Result<Option<String>> {
        let key = self.cache_key(alias);

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!(alias = %alias, "Cache hit in Redis");
                Ok(Some(url))
            }
            Ok(None) => {
                trace!(alias = %alias, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn delete_url(&self, alias: &Alias) -> Result<()> {
        let key = self.cache_key(alias);

        let mut conn = self.conn.clone();
        match conn.del::<_, ()>(&key).await {
            Ok(()) => {
                debug!(alias = %alias, "Removed entry from Redis cache");
                Ok(())
            }
            Err(e) => {
                warn!(alias = %alias, error = %e, "Failed to remove entry from Redis cache");
                Err(map_redis_error("failed to delete value from Redis", e))
            }
        }
    }
}

