//! Core types and traits for the hop URL shortener.
//!
//! This crate holds the alias type and the narrow contracts the alias
//! service is composed from: the non-authoritative [`CacheStore`], the
//! authoritative [`DurableStore`], and the external [`AccessAuthority`].

pub mod alias;
pub mod authority;
pub mod cache;
pub mod error;
pub mod store;

pub use alias::{Alias, RESERVED_ALIASES};
pub use authority::AccessAuthority;
pub use cache::{CacheOutcome, CacheStore};
pub use error::{AuthorityError, CacheError, CoreError, StorageError};
pub use store::{DurableStore, RecordId, UrlRecord, UserId};
