use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hop_core::{Alias, DurableStore, RecordId, UrlRecord, UserId};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{Result, StorageError};

/// In-memory implementation of the durable store contract using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks. Insert-if-absent goes through the entry API, which
/// holds the shard lock for the whole check-and-insert, so concurrent saves
/// of the same alias have exactly one winner.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<String, UrlRecord>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(0),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn save_url(&self, alias: &Alias, url: &str, creator: UserId) -> Result<RecordId> {
        match self.records.entry(alias.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::AliasExists(alias.to_string())),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                slot.insert(UrlRecord {
                    id,
                    url: url.to_owned(),
                    creator,
                });
                Ok(id)
            }
        }
    }

    async fn get_url(&self, alias: &Alias) -> Result<String> {
        self.records
            .get(alias.as_str())
            .map(|record| record.url.clone())
            .ok_or_else(|| StorageError::AliasNotFound(alias.to_string()))
    }

    async fn creator(&self, alias: &Alias) -> Result<UserId> {
        self.records
            .get(alias.as_str())
            .map(|record| record.creator)
            .ok_or_else(|| StorageError::AliasNotFound(alias.to_string()))
    }

    async fn delete_url(&self, alias: &Alias) -> Result<bool> {
        Ok(self.records.remove(alias.as_str()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn alias(s: &str) -> Alias {
        Alias::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get() {
        let store = InMemoryStore::new();

        let id = store
            .save_url(&alias("abc123"), "https://example.com", 42)
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(
            store.get_url(&alias("abc123")).await.unwrap(),
            "https://example.com"
        );
        assert_eq!(store.creator(&alias("abc123")).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let store = InMemoryStore::new();

        let first = store.save_url(&alias("a1"), "https://a.com", 1).await.unwrap();
        let second = store.save_url(&alias("a2"), "https://b.com", 1).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let store = InMemoryStore::new();

        let err = store.get_url(&alias("nope")).await.unwrap_err();
        assert!(matches!(err, StorageError::AliasNotFound(_)));

        let err = store.creator(&alias("nope")).await.unwrap_err();
        assert!(matches!(err, StorageError::AliasNotFound(_)));
    }

    #[tokio::test]
    async fn save_conflict_keeps_first_record() {
        let store = InMemoryStore::new();

        store
            .save_url(&alias("abc123"), "https://example.com", 1)
            .await
            .unwrap();

        let err = store
            .save_url(&alias("abc123"), "https://other.com", 2)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::AliasExists(_)));
        assert_eq!(
            store.get_url(&alias("abc123")).await.unwrap(),
            "https://example.com"
        );
        assert_eq!(store.creator(&alias("abc123")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_existing() {
        let store = InMemoryStore::new();

        store
            .save_url(&alias("abc123"), "https://example.com", 1)
            .await
            .unwrap();

        assert!(store.delete_url(&alias("abc123")).await.unwrap());
        assert!(store.get_url(&alias("abc123")).await.is_err());
        assert!(!store.delete_url(&alias("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn alias_can_be_reused_after_delete() {
        let store = InMemoryStore::new();

        store.save_url(&alias("again"), "https://old.com", 1).await.unwrap();
        store.delete_url(&alias("again")).await.unwrap();
        store.save_url(&alias("again"), "https://new.com", 2).await.unwrap();

        assert_eq!(store.get_url(&alias("again")).await.unwrap(), "https://new.com");
        assert_eq!(store.creator(&alias("again")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_saves_of_same_alias_have_one_winner() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for i in 0..16i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .save_url(&alias("contested"), &format!("https://example{i}.com"), i)
                    .await
            }));
        }

        let mut wins = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(StorageError::AliasExists(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.len(), 1);
    }
}
