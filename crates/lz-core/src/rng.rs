//! The shared pseudo-random source used for every sleep, eat, and nap draw.
//!
//! # Sharing strategy
//!
//! All lizards and cats draw from one `SmallRng` seeded once at start-up.
//! Draws are short and infrequent (a handful per lizard per cycle, each
//! followed by a multi-second sleep), so a `Mutex` around the generator never
//! becomes a point of contention.  Nothing in the protocol depends on the
//! draws being independent across threads, and with many threads the
//! interleaving is not reproducible anyway; a fixed seed only pins down the
//! sequence of values handed out, not who receives them.

use std::sync::{Mutex, PoisonError};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Thread-safe random duration source.
pub struct SharedRng(Mutex<SmallRng>);

impl SharedRng {
    /// Seed deterministically from `seed`.
    pub fn new(seed: u64) -> Self {
        SharedRng(Mutex::new(SmallRng::seed_from_u64(seed)))
    }

    /// Seed from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        SharedRng(Mutex::new(SmallRng::from_entropy()))
    }

    /// `Some(seed)` → deterministic, `None` → entropy.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }

    /// Uniformly distributed whole seconds in `[1, max]`.
    ///
    /// A `max` of zero is treated as one so the result is always positive.
    pub fn secs_up_to(&self, max: u64) -> u64 {
        let max = max.max(1);
        // A panic while holding the lock cannot leave a SmallRng half-updated.
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(1..=max)
    }
}

impl std::fmt::Debug for SharedRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRng").finish_non_exhaustive()
    }
}
