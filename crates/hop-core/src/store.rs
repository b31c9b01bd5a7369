use crate::alias::Alias;
use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Opaque identifier of an authenticated principal.
pub type UserId = i64;

/// Monotonic identifier assigned by the durable store on insert.
pub type RecordId = i64;

/// A stored alias mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Creation order within the store.
    pub id: RecordId,
    /// The original URL that was shortened.
    pub url: String,
    /// The principal that created the alias.
    pub creator: UserId,
}

/// The authoritative alias → URL mapping.
///
/// Every mutating call is atomic: concurrent readers never observe a
/// partially applied write.
#[async_trait]
pub trait DurableStore: Send + Sync + 'static {
    /// Inserts a new record. Returns `Err(AliasExists)` if the alias is taken.
    async fn save_url(&self, alias: &Alias, url: &str, creator: UserId) -> Result<RecordId>;

    /// Returns the target URL, or `Err(AliasNotFound)`.
    async fn get_url(&self, alias: &Alias) -> Result<String>;

    /// Returns the principal that created the alias, or `Err(AliasNotFound)`.
    async fn creator(&self, alias: &Alias) -> Result<UserId>;

    /// Deletes the record for an alias.
    /// Returns `true` if the record existed and was removed.
    async fn delete_url(&self, alias: &Alias) -> Result<bool>;
}
