//! Alias lifecycle orchestration.
//!
//! [`AliasService`] composes the alias generator, a cache store, a durable
//! store and an access authority into the create, resolve and delete
//! operations.

pub mod config;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use error::ShortenerError;
pub use service::{AliasService, Created};
