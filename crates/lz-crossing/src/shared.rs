//! `SharedState` — everything lizards and cats touch, in one owned object.
//!
//! The driver builds one `SharedState`, wraps it in an `Arc`, and hands a
//! clone to every unit at spawn time.  Nothing is global.

use std::sync::atomic::{AtomicBool, Ordering};

use lz_core::{CrossingPolicy, Direction};

use crate::{AbortSignal, CapacityGate, Claim, DirectionArbiter, OccupancySource, Permit};

/// Shared driveway state for one simulation run.
#[derive(Debug)]
pub struct SharedState {
    pub gate:    CapacityGate,
    pub arbiter: DirectionArbiter,
    pub abort:   AbortSignal,
    running:     AtomicBool,
}

/// A lizard on the driveway: its direction claim plus its gate permit.
///
/// Field order matters: on drop the claim is completed *before* the permit
/// is returned, so a lizard leaves the counts before it frees its slot.
#[must_use = "dropping a Crossing immediately ends the traversal"]
#[derive(Debug)]
pub struct Crossing<'a> {
    claim:   Claim<'a>,
    _permit: Permit<'a>,
}

impl SharedState {
    pub fn new(capacity: usize, policy: CrossingPolicy) -> Self {
        Self::from_parts(CapacityGate::new(capacity), DirectionArbiter::new(policy))
    }

    pub fn from_parts(gate: CapacityGate, arbiter: DirectionArbiter) -> Self {
        Self {
            gate,
            arbiter,
            abort:   AbortSignal::new(),
            running: AtomicBool::new(true),
        }
    }

    /// Cooperative cancellation flag, read at the top of every unit's loop.
    ///
    /// `Relaxed` is enough: a stale `true` costs one extra iteration.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// End of the world: units finish their current iteration and return.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Take a driveway slot, then wait for `direction` to be allowed.
    pub fn enter(&self, direction: Direction) -> Crossing<'_> {
        let permit = self.gate.acquire();
        let claim = self.arbiter.request_entry(direction);
        Crossing { claim, _permit: permit }
    }
}

impl OccupancySource for SharedState {
    fn occupancy(&self) -> usize {
        self.arbiter.occupancy_relaxed()
    }
}

impl Crossing<'_> {
    pub fn direction(&self) -> Direction {
        self.claim.direction()
    }

    /// Leave the driveway now.
    pub fn finish(self) {}
}
