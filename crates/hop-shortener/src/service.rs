use crate::config::ServiceConfig;
use crate::error::ShortenerError;
use hop_core::{
    AccessAuthority, Alias, CacheError, CacheOutcome, CacheStore, DurableStore, RecordId,
    StorageError, UserId,
};
use hop_generator::{AliasGenerator, DurableProbe};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A successfully created alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub alias: Alias,
    /// Creation-order id assigned by the durable store.
    pub id: RecordId,
}

/// Orchestrates the alias lifecycle across the cache and the durable store.
///
/// The durable store is the only authority for existence and uniqueness.
/// Cache calls are best-effort: a failing cache degrades latency, never
/// correctness. Every store and authority call is bounded by
/// [`ServiceConfig::store_timeout`].
///
/// The store parameters may be trait objects, so a single service type can
/// be assembled from backends chosen at runtime.
pub struct AliasService<C: ?Sized, D: ?Sized, A: ?Sized> {
    cache: Arc<C>,
    durable: Arc<D>,
    authority: Arc<A>,
    generator: AliasGenerator,
    config: ServiceConfig,
}

impl<C: ?Sized, D: ?Sized, A: ?Sized> Clone for AliasService<C, D, A> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            durable: Arc::clone(&self.durable),
            authority: Arc::clone(&self.authority),
            generator: self.generator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: ?Sized, D: ?Sized, A: ?Sized> fmt::Debug for AliasService<C, D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C, D, A> AliasService<C, D, A>
where
    C: CacheStore + ?Sized,
    D: DurableStore + ?Sized,
    A: AccessAuthority + ?Sized,
{
    pub fn new(config: ServiceConfig, cache: Arc<C>, durable: Arc<D>, authority: Arc<A>) -> Self {
        Self {
            cache,
            durable,
            authority,
            generator: AliasGenerator::new(config.generator_config()),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Creates an alias for `url` on behalf of `creator`.
    ///
    /// An empty or missing `requested` alias is generated. The cache is
    /// staged before the durable insert; the durable insert alone decides
    /// whether the alias is taken. When staging found an existing entry, a
    /// successful insert replaces it.
    pub async fn create(
        &self,
        url: &str,
        requested: Option<&str>,
        creator: UserId,
    ) -> Result<Created, ShortenerError> {
        validate_url(url)?;

        let alias = match requested.filter(|alias| !alias.is_empty()) {
            Some(requested) => Alias::new(requested)?,
            None => {
                self.generator
                    .generate(&DurableProbe(self.durable.as_ref()))
                    .await?
            }
        };

        if alias.is_reserved() {
            return Err(ShortenerError::ReservedAlias(alias.to_string()));
        }

        let staged = self
            .cache_call("save_url", &alias, self.cache.save_url(&alias, url))
            .await
            .applied()
            == Some(true);

        let saved = self
            .durable_call("save_url", &alias, self.durable.save_url(&alias, url, creator))
            .await;

        let id = match saved {
            Ok(id) => id,
            Err(err) => {
                // Only an entry this call wrote is removed. If a winner has
                // replaced it meanwhile, removing it just causes a miss.
                if staged {
                    let _ = self
                        .cache_call("delete_url", &alias, self.cache.delete_url(&alias))
                        .await;
                }
                return Err(err);
            }
        };

        // The durable store accepted the alias, so whatever the cache kept
        // instead of our URL is stale.
        if !staged {
            let _ = self
                .cache_call("replace_url", &alias, self.cache.replace_url(&alias, url))
                .await;
        }

        info!(alias = %alias, id, creator, "Created alias");
        Ok(Created { alias, id })
    }

    /// Returns the target URL, preferring the cache.
    ///
    /// A durable hit after a cache miss repopulates the cache. The result may
    /// be stale for up to the cache TTL after a delete.
    pub async fn resolve(&self, alias: &Alias) -> Result<String, ShortenerError> {
        if alias.is_reserved() {
            return Err(ShortenerError::NotFound(alias.to_string()));
        }

        let cached = self
            .cache_call("get_url", alias, self.cache.get_url(alias))
            .await
            .applied()
            .flatten();

        if let Some(url) = cached {
            debug!(alias = %alias, "Resolved from cache");
            return Ok(url);
        }

        let url = self.resolve_durable(alias).await?;

        let _ = self
            .cache_call("save_url", alias, self.cache.save_url(alias, &url))
            .await;

        Ok(url)
    }

    /// Returns the target URL straight from the durable store.
    pub async fn resolve_durable(&self, alias: &Alias) -> Result<String, ShortenerError> {
        if alias.is_reserved() {
            return Err(ShortenerError::NotFound(alias.to_string()));
        }

        self.durable_call("get_url", alias, self.durable.get_url(alias))
            .await
    }

    /// Deletes `alias` if `requester` created it or is an administrator.
    ///
    /// Existence is checked before authorization. The durable record is
    /// removed before the cache entry.
    pub async fn delete(&self, alias: &Alias, requester: UserId) -> Result<(), ShortenerError> {
        let creator = self
            .durable_call("creator", alias, self.durable.creator(alias))
            .await?;

        if creator != requester && !self.is_admin(requester).await? {
            warn!(alias = %alias, requester, creator, "Rejected delete by non-owner");
            return Err(ShortenerError::Unauthorized(alias.to_string()));
        }

        let removed = self
            .durable_call("delete_url", alias, self.durable.delete_url(alias))
            .await?;

        // The record is durably gone either way, so the cache entry can go too.
        let _ = self
            .cache_call("delete_url", alias, self.cache.delete_url(alias))
            .await;

        if !removed {
            debug!(alias = %alias, "Alias was deleted concurrently");
            return Err(ShortenerError::NotFound(alias.to_string()));
        }

        info!(alias = %alias, requester, "Deleted alias");
        Ok(())
    }

    async fn is_admin(&self, user: UserId) -> Result<bool, ShortenerError> {
        match tokio::time::timeout(self.config.store_timeout, self.authority.is_admin(user)).await
        {
            Ok(Ok(admin)) => Ok(admin),
            Ok(Err(e)) => {
                error!(user, error = %e, "Access authority call failed");
                Err(ShortenerError::Internal(e.to_string()))
            }
            Err(_) => {
                error!(user, timeout = ?self.config.store_timeout, "Access authority call timed out");
                Err(ShortenerError::Internal("access authority timed out".to_string()))
            }
        }
    }

    async fn durable_call<T, F>(
        &self,
        op: &'static str,
        alias: &Alias,
        call: F,
    ) -> Result<T, ShortenerError>
    where
        F: Future<Output = hop_core::store::Result<T>>,
    {
        let result = match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(format!(
                "{op} exceeded {:?}",
                self.config.store_timeout
            ))),
        };

        result.map_err(|e| match e {
            StorageError::AliasExists(key) => ShortenerError::AliasExists(key),
            StorageError::AliasNotFound(key) => ShortenerError::NotFound(key),
            other => {
                error!(op, alias = %alias, error = %other, "Durable store call failed");
                ShortenerError::Internal(other.to_string())
            }
        })
    }

    async fn cache_call<T, F>(&self, op: &'static str, alias: &Alias, call: F) -> CacheOutcome<T>
    where
        F: Future<Output = hop_core::cache::Result<T>>,
    {
        let result = match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(format!(
                "{op} exceeded {:?}",
                self.config.store_timeout
            ))),
        };

        let outcome = CacheOutcome::from(result);
        if let Some(e) = outcome.degraded() {
            warn!(op, alias = %alias, error = %e, "Cache call degraded");
        }
        outcome
    }
}

/// Checks that `url` is an absolute http(s) URL with a host.
fn validate_url(url: &str) -> Result<(), ShortenerError> {
    if url.is_empty() {
        return Err(ShortenerError::InvalidUrl(
            "URL cannot be empty".to_string(),
        ));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must be absolute: {}",
            url
        )));
    };

    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            scheme
        )));
    }

    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    let host = match host_port.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once(']').map_or("", |(ip, _)| ip),
        None => host_port.split(':').next().unwrap_or_default(),
    };
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must have a valid host: {}",
            url
        )));
    }

    Ok(())
}
