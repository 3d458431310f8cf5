//! Simulation time scale.
//!
//! # Design
//!
//! Every duration in the model (sleeping, eating, crossing, the length of the
//! world) is a whole number of *simulated seconds*.  The mapping to wall-clock
//! time is held in `SimClock`:
//!
//!   wall_time = sim_secs * unit
//!
//! The default unit is one real second, which reproduces the classic
//! assignment timing.  Tests shrink the unit to a few milliseconds so a full
//! 30-second world runs in well under a second of wall time without changing
//! any protocol arithmetic.

use std::thread;
use std::time::Duration;

/// Converts simulated seconds into wall-clock durations and sleeps them.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SimClock {
    /// How much real time one simulated second takes.
    pub unit: Duration,
}

impl SimClock {
    /// One simulated second per real second.
    pub const REAL_TIME: SimClock = SimClock { unit: Duration::from_secs(1) };

    pub fn new(unit: Duration) -> Self {
        Self { unit }
    }

    /// Wall-clock length of `secs` simulated seconds (saturating).
    #[inline]
    pub fn duration(&self, secs: u64) -> Duration {
        let secs = u32::try_from(secs).unwrap_or(u32::MAX);
        self.unit.saturating_mul(secs)
    }

    /// Block the calling thread for `secs` simulated seconds.
    #[inline]
    pub fn sleep(&self, secs: u64) {
        thread::sleep(self.duration(secs));
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::REAL_TIME
    }
}
