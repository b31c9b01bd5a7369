use async_trait::async_trait;
use hop_core::{Alias, DurableStore, StorageError};
use tracing::debug;

/// What a probe learned about a candidate alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The lookup authority reported the alias as not found.
    Available,
    /// The alias is in use.
    Taken,
    /// The lookup failed; the candidate is treated as unavailable for now.
    Unknown,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Answers whether a candidate alias is free in some lookup authority.
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    async fn probe(&self, candidate: &Alias) -> Availability;
}

/// Probes a [`DurableStore`] by looking the candidate up.
///
/// Only an explicit `AliasNotFound` counts as available.
#[derive(Debug)]
pub struct DurableProbe<'a, D: ?Sized>(pub &'a D);

#[async_trait]
impl<'a, D> ExistenceProbe for DurableProbe<'a, D>
where
    D: DurableStore + ?Sized,
{
    async fn probe(&self, candidate: &Alias) -> Availability {
        match self.0.get_url(candidate).await {
            Err(StorageError::AliasNotFound(_)) => Availability::Available,
            Ok(_) => Availability::Taken,
            Err(e) => {
                debug!(alias = %candidate, error = %e, "Existence probe failed");
                Availability::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hop_storage::InMemoryStore;

    #[tokio::test]
    async fn durable_probe_reports_free_and_taken() {
        let store = InMemoryStore::new();
        let taken = Alias::new_unchecked("taken1");
        store.save_url(&taken, "https://example.com", 1).await.unwrap();

        let probe = DurableProbe(&store);

        assert_eq!(probe.probe(&taken).await, Availability::Taken);
        assert_eq!(
            probe.probe(&Alias::new_unchecked("free01")).await,
            Availability::Available
        );
    }

    struct BrokenStore;

    #[async_trait]
    impl DurableStore for BrokenStore {
        async fn save_url(&self, _: &Alias, _: &str, _: i64) -> hop_core::store::Result<i64> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn get_url(&self, _: &Alias) -> hop_core::store::Result<String> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn creator(&self, _: &Alias) -> hop_core::store::Result<i64> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn delete_url(&self, _: &Alias) -> hop_core::store::Result<bool> {
            Err(StorageError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn durable_probe_treats_errors_as_unknown() {
        let probe = DurableProbe(&BrokenStore);
        let availability = probe.probe(&Alias::new_unchecked("abc")).await;

        assert_eq!(availability, Availability::Unknown);
        assert!(!availability.is_available());
    }
}
