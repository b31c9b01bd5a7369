//! Cache store adapters for hop.

pub mod moka;
pub mod redis;

pub use hop_core::cache::Result;
pub use hop_core::{CacheError, CacheStore};
pub use self::moka::{MokaCacheStore, MokaConfig};
pub use self::redis::RedisCacheStore;
