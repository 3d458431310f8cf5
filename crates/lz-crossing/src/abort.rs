//! Safety violations and the signal that carries them to the driver.
//!
//! A violation is never handled where it is detected.  The detecting thread
//! raises it on the shared [`AbortSignal`] and the simulation driver, which
//! is blocked in [`AbortSignal::wait_timeout`] for the length of the world,
//! wakes at once, stops every unit, and reports the *first* violation.  Later
//! violations (another cat noticing the same crowd a moment later) are
//! dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lz_core::{CatId, Direction, LizardId};
use thiserror::Error;

/// A breach of a driveway safety invariant.  Always ends the run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Violation {
    /// A lizard found oncoming traffic while it was crossing.
    #[error(
        "{} {forward} crossing sago -> monkey grass, {backward} crossing monkey grass -> sago \
         (lizard {lizard} going {direction})",
        conflict_headline(.direction)
    )]
    DirectionConflict {
        lizard:    LizardId,
        direction: Direction,
        forward:   usize,
        backward:  usize,
    },

    /// A cat woke up to more lizards on the driveway than allowed.
    #[error(
        "The cats are happy - they have toys. (cat {cat} saw {occupancy} lizards crossing, limit {limit})"
    )]
    Overcrowded {
        cat:       CatId,
        occupancy: usize,
        limit:     usize,
    },
}

fn conflict_headline(direction: &Direction) -> &'static str {
    match direction {
        Direction::Forward => "Crash!  We have a pile-up on the concrete.",
        Direction::Backward => "Oh No!, the lizards have cats all over them.",
    }
}

/// First-violation-wins abort flag with a blocking wait for the driver.
#[derive(Debug, Default)]
pub struct AbortSignal {
    raised: AtomicBool,
    first:  Mutex<Option<Violation>>,
    cv:     Condvar,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Violation>> {
        self.first.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `violation` and wake the driver.
    ///
    /// Returns `true` if this was the first violation of the run.
    pub fn raise(&self, violation: Violation) -> bool {
        let mut first = self.lock();
        if first.is_some() {
            return false;
        }
        tracing::error!(%violation, "safety violation");
        *first = Some(violation);
        self.raised.store(true, Ordering::Release);
        drop(first);
        self.cv.notify_all();
        true
    }

    /// Cheap check for loop heads.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// The first violation raised, if any.
    pub fn violation(&self) -> Option<Violation> {
        self.lock().clone()
    }

    /// Block until a violation is raised or `timeout` elapses.
    ///
    /// Returns the violation, or `None` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Violation> {
        let deadline = Instant::now() + timeout;
        let mut first = self.lock();
        while first.is_none() {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            first = self
                .cv
                .wait_timeout(first, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        first.clone()
    }
}
