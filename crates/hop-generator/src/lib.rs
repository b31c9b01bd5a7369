//! Alias generation for hop.
//!
//! A [`Generator`] draws candidate aliases without touching storage. The
//! [`AliasGenerator`] pairs one with an [`ExistenceProbe`] and keeps drawing
//! until a candidate is free or its time budget runs out.

pub mod error;
pub mod generator;
pub mod probe;
pub mod random;

pub use error::GenerateError;
pub use generator::{AliasGenerator, GeneratorConfig, DEFAULT_ALIAS_LENGTH, DEFAULT_BUDGET};
pub use probe::{Availability, DurableProbe, ExistenceProbe};
pub use random::RandomGenerator;

use hop_core::Alias;

/// Trait for drawing candidate aliases.
///
/// Implementations are pure generators that don't interact with storage, so
/// a candidate may already be taken; uniqueness is the probe's job.
pub trait Generator: Send + Sync + 'static {
    /// Draws one candidate of exactly `length` characters.
    fn generate(&self, length: usize) -> Alias;
}
