use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
}

/// Errors surfaced by [`CacheStore`](crate::CacheStore) implementations.
///
/// None of these are fatal to an alias operation; see
/// [`CacheOutcome`](crate::CacheOutcome).
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by [`DurableStore`](crate::DurableStore) implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("alias already exists: {0}")]
    AliasExists(String),
    #[error("alias not found: {0}")]
    AliasNotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors surfaced by an [`AccessAuthority`](crate::AccessAuthority).
#[derive(Debug, Clone, Error)]
pub enum AuthorityError {
    #[error("access authority unavailable: {0}")]
    Unavailable(String),
    #[error("access authority call timed out: {0}")]
    Timeout(String),
    #[error("access authority rejected the call: {0}")]
    Rejected(String),
}
