use crate::alias::Alias;
use crate::error::CacheError;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A fast, non-authoritative alias → URL lookup layer.
///
/// Entries are a denormalized projection of the durable store. A missing
/// entry never proves the alias does not exist, and a present entry may be
/// stale until its TTL runs out.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Stores `url` under `alias` only if no entry exists yet.
    ///
    /// Returns `Ok(true)` if the entry was written and `Ok(false)` if an
    /// existing entry was kept.
    async fn save_url(&self, alias: &Alias, url: &str) -> Result<bool>;

    /// Stores `url` under `alias`, replacing any existing entry.
    ///
    /// Only called once the durable store has accepted `alias`, to evict an
    /// entry left behind by an earlier lifecycle of the same token.
    async fn replace_url(&self, alias: &Alias, url: &str) -> Result<()>;

    /// Returns the cached URL, or `Ok(None)` on a miss.
    async fn get_url(&self, alias: &Alias) -> Result<Option<String>>;

    /// Removes the entry. It is not an error if the key does not exist.
    async fn delete_url(&self, alias: &Alias) -> Result<()>;
}

/// The result of a best-effort cache call.
///
/// Deliberately not a [`Result`]: a degraded cache call cannot be propagated
/// with `?` into an operation failure.
#[must_use = "cache outcomes should be inspected or explicitly discarded"]
#[derive(Debug)]
pub enum CacheOutcome<T> {
    /// The cache call completed.
    Applied(T),
    /// The cache call failed; the surrounding operation carries on without it.
    Degraded(CacheError),
}

impl<T> CacheOutcome<T> {
    /// Returns the value if the call completed.
    pub fn applied(self) -> Option<T> {
        match self {
            CacheOutcome::Applied(value) => Some(value),
            CacheOutcome::Degraded(_) => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, CacheOutcome::Applied(_))
    }

    /// Returns the cache error if the call failed.
    pub fn degraded(&self) -> Option<&CacheError> {
        match self {
            CacheOutcome::Applied(_) => None,
            CacheOutcome::Degraded(err) => Some(err),
        }
    }
}

impl<T> From<Result<T>> for CacheOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => CacheOutcome::Applied(value),
            Err(err) => CacheOutcome::Degraded(err),
        }
    }
}
