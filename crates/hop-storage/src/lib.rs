//! Durable store adapters for hop.

pub mod error;
pub mod memory;
pub mod mysql;

pub use error::{Result, StorageError};
pub use hop_core::DurableStore;
pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
