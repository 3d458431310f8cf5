//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use lz_core::{CrossingConfig, SharedRng};
use lz_crossing::{CapacityGate, DirectionArbiter, OccupancySource, SharedState};

use crate::{NoopObserver, Sim, SimObserver, SimResult, TracingObserver};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                         |
/// |--------------------------|-------------------------------------------------|
/// | `.observer(o)`           | `TracingObserver` if `config.trace`, else `NoopObserver` |
/// | `.occupancy_source(s)`   | the shared state's relaxed occupancy mirror     |
/// | `.transition_log(true)`  | off                                             |
/// | `.rng(r)`                | seeded from `config.seed` (entropy if `None`)   |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(CrossingConfig::default())
///     .observer(Arc::new(TracingObserver))
///     .build()?;
/// let report = sim.run()?;
/// std::process::exit(report.outcome.exit_code().into());
/// ```
pub struct SimBuilder {
    config:         CrossingConfig,
    observer:       Option<Arc<dyn SimObserver>>,
    occupancy:      Option<Arc<dyn OccupancySource>>,
    rng:            Option<SharedRng>,
    transition_log: bool,
}

impl SimBuilder {
    pub fn new(config: CrossingConfig) -> Self {
        Self {
            config,
            observer:       None,
            occupancy:      None,
            rng:            None,
            transition_log: false,
        }
    }

    /// Receive every lizard and cat lifecycle step.
    pub fn observer(mut self, observer: Arc<dyn SimObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace what the cats look at.
    ///
    /// Lizards still use the real driveway; only the cats' readings change.
    pub fn occupancy_source(mut self, source: Arc<dyn OccupancySource>) -> Self {
        self.occupancy = Some(source);
        self
    }

    /// Record every direction change in the arbiter.
    pub fn transition_log(mut self, enabled: bool) -> Self {
        self.transition_log = enabled;
        self
    }

    /// Use a specific random source instead of one built from `config.seed`.
    pub fn rng(mut self, rng: SharedRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the configuration and assemble the shared state.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let arbiter = if self.transition_log {
            DirectionArbiter::with_transition_log(self.config.policy)
        } else {
            DirectionArbiter::new(self.config.policy)
        };
        let shared = Arc::new(SharedState::from_parts(
            CapacityGate::new(self.config.capacity),
            arbiter,
        ));

        let observer: Arc<dyn SimObserver> = match self.observer {
            Some(o) => o,
            None if self.config.trace => Arc::new(TracingObserver),
            None => Arc::new(NoopObserver),
        };
        let occupancy = self
            .occupancy
            .unwrap_or_else(|| Arc::clone(&shared) as Arc<dyn OccupancySource>);
        let rng = self
            .rng
            .unwrap_or_else(|| SharedRng::from_seed_option(self.config.seed));

        Ok(Sim {
            config: Arc::new(self.config),
            shared,
            rng: Arc::new(rng),
            observer,
            occupancy,
        })
    }
}
