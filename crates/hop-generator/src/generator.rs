use crate::error::GenerateError;
use crate::probe::{Availability, ExistenceProbe};
use crate::random::RandomGenerator;
use crate::Generator;
use hop_core::Alias;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_ALIAS_LENGTH: usize = 6;
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, TypedBuilder)]
pub struct GeneratorConfig {
    #[builder(default = DEFAULT_ALIAS_LENGTH)]
    pub length: usize,
    /// Wall-clock limit for one `generate` call, probes included.
    #[builder(default = DEFAULT_BUDGET)]
    pub budget: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws candidates until one is free in the probed authority.
#[derive(Debug, Clone)]
pub struct AliasGenerator<G = RandomGenerator> {
    config: GeneratorConfig,
    source: G,
}

impl AliasGenerator<RandomGenerator> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_source(config, RandomGenerator)
    }
}

impl<G: Generator> AliasGenerator<G> {
    pub fn with_source(config: GeneratorConfig, source: G) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns an alias the probe reported as free.
    ///
    /// Reserved tokens are never returned. A candidate whose probe fails is
    /// skipped. The whole call, including a probe that never answers, is
    /// bounded by the configured budget.
    pub async fn generate<P>(&self, probe: &P) -> Result<Alias, GenerateError>
    where
        P: ExistenceProbe + ?Sized,
    {
        let length = self.config.length;
        if length == 0 {
            return Err(GenerateError::InvalidLength(length));
        }

        let budget = self.config.budget;
        let deadline = Instant::now() + budget;
        let mut attempts: u64 = 0;

        while Instant::now() < deadline {
            let candidate = self.source.generate(length);
            attempts += 1;

            if candidate.is_reserved() {
                debug!(alias = %candidate, "Skipping reserved candidate");
                continue;
            }

            match tokio::time::timeout_at(deadline, probe.probe(&candidate)).await {
                Ok(Availability::Available) => {
                    debug!(alias = %candidate, attempts, "Generated alias");
                    return Ok(candidate);
                }
                Ok(availability) => {
                    debug!(alias = %candidate, ?availability, "Candidate unavailable");
                }
                Err(_) => break,
            }

            // Probes that resolve without suspending would otherwise starve the runtime.
            tokio::task::yield_now().await;
        }

        warn!(?budget, attempts, "Alias generation ran out of time");
        Err(GenerateError::Timeout { budget, attempts })
    }
}
