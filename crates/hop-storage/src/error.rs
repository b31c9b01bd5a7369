/// Result type for durable store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

pub use hop_core::StorageError;
