use hop_generator::{GeneratorConfig, DEFAULT_ALIAS_LENGTH, DEFAULT_BUDGET};
use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Settings for one [`AliasService`](crate::AliasService), built once at
/// startup.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceConfig {
    /// Length of generated aliases.
    #[builder(default = DEFAULT_ALIAS_LENGTH)]
    pub alias_length: usize,
    /// Wall-clock budget for a single alias generation.
    #[builder(default = DEFAULT_BUDGET)]
    pub generation_budget: Duration,
    /// Upper bound for each individual store or authority call.
    #[builder(default = DEFAULT_STORE_TIMEOUT)]
    pub store_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ServiceConfig {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::builder()
            .length(self.alias_length)
            .budget(self.generation_budget)
            .build()
    }
}
