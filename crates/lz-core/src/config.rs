//! Simulation configuration.

use std::time::Duration;

use crate::{LzError, LzResult, SimClock};

/// How the driveway treats traffic in opposite directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossingPolicy {
    /// Both directions share the driveway, bounded only by capacity.
    Bidirectional,
    /// One direction at a time; oncoming lizards wait for traffic to drain.
    #[default]
    Unidirectional,
}

/// Top-level simulation configuration.
///
/// `Default` reproduces the constants of the classic assignment: 20 lizards,
/// 2 cats, a 30-second world and a 4-lizard driveway.  The CLI overrides
/// individual fields; tests usually shrink `time_unit`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingConfig {
    /// Number of lizard threads.
    pub lizards: usize,

    /// Number of cat threads.  Zero is allowed (nobody watches).
    pub cats: usize,

    /// Simulated seconds the world runs before the run flag is cleared.
    pub world_end_secs: u64,

    /// Permits in the capacity gate: lizards allowed on the driveway at once.
    pub capacity: usize,

    /// A cat that sees more than this many lizards on the driveway ends the run.
    pub max_lizard_crossing: usize,

    /// Upper bound for a lizard's nap, in simulated seconds.
    pub max_lizard_sleep_secs: u64,

    /// Upper bound for a cat's nap, in simulated seconds.
    pub max_cat_sleep_secs: u64,

    /// Upper bound for a lizard's meal, in simulated seconds.
    pub max_lizard_eat_secs: u64,

    /// Fixed time a single crossing takes, in simulated seconds.
    pub cross_secs: u64,

    /// Direction arbitration policy.
    pub policy: CrossingPolicy,

    /// Treat opposing traffic as a crash even under
    /// [`CrossingPolicy::Bidirectional`].  Without arbitration this
    /// eventually fires; it exists to exercise the violation path.
    pub detect_conflicts: bool,

    /// Emit per-step lifecycle traces.
    pub trace: bool,

    /// RNG seed.  `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Wall-clock length of one simulated second.
    pub time_unit: Duration,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            lizards:               20,
            cats:                  2,
            world_end_secs:        30,
            capacity:              4,
            max_lizard_crossing:   4,
            max_lizard_sleep_secs: 3,
            max_cat_sleep_secs:    3,
            max_lizard_eat_secs:   5,
            cross_secs:            2,
            policy:                CrossingPolicy::Unidirectional,
            detect_conflicts:      false,
            trace:                 false,
            seed:                  None,
            time_unit:             Duration::from_secs(1),
        }
    }
}

impl CrossingConfig {
    /// Reject values the lifecycle cannot run with.
    ///
    /// Every random draw is in `[1, max]`, so each maximum must be positive;
    /// a zero-permit gate or zero threshold would deadlock or abort at once.
    pub fn validate(&self) -> LzResult<()> {
        let checks: [(&'static str, u64); 8] = [
            ("lizards",               self.lizards as u64),
            ("capacity",              self.capacity as u64),
            ("max_lizard_crossing",   self.max_lizard_crossing as u64),
            ("max_lizard_sleep_secs", self.max_lizard_sleep_secs),
            ("max_cat_sleep_secs",    self.max_cat_sleep_secs),
            ("max_lizard_eat_secs",   self.max_lizard_eat_secs),
            ("cross_secs",            self.cross_secs),
            ("world_end_secs",        self.world_end_secs),
        ];
        for (field, got) in checks {
            if got < 1 {
                return Err(LzError::OutOfRange { field, min: 1, got });
            }
        }
        if self.time_unit.is_zero() {
            return Err(LzError::Config("time_unit must be non-zero".into()));
        }
        if u32::try_from(self.lizards).is_err() || u32::try_from(self.cats).is_err() {
            return Err(LzError::Config("too many lizards or cats for u32 ids".into()));
        }
        Ok(())
    }

    /// Whether a lizard that finds oncoming traffic mid-crossing has crashed.
    #[inline]
    pub fn checks_conflicts(&self) -> bool {
        self.policy == CrossingPolicy::Unidirectional || self.detect_conflicts
    }

    /// Construct a `SimClock` for this run's time unit.
    pub fn clock(&self) -> SimClock {
        SimClock::new(self.time_unit)
    }

    /// Longest uncontended sleep → cross → eat → cross cycle, in simulated
    /// seconds.  Used as the shutdown and liveness bound.
    pub fn cycle_bound_secs(&self) -> u64 {
        self.max_lizard_sleep_secs + self.max_lizard_eat_secs + 2 * self.cross_secs
    }
}
