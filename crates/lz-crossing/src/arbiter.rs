//! `DirectionArbiter` — decides when a lizard may start crossing.
//!
//! The arbiter owns the [`CrossingCounters`] behind a mutex and pairs it with
//! a condition variable.  [`request_entry`](DirectionArbiter::request_entry)
//! waits on the entry predicate, re-evaluating it after every wakeup, and
//! returns a [`Claim`].  Dropping (or [`complete`](Claim::complete)-ing) the
//! claim decrements the count; when the active direction drains to zero the
//! driveway reverts to `None` and *every* waiter is woken, since both
//! directions may now be able to go.
//!
//! Under [`CrossingPolicy::Bidirectional`] the predicate is always true and
//! `request_entry` only counts.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use lz_core::{CrossingPolicy, Direction};

use crate::counters::{CrossingCounters, DirectionChange, OccupancyMirror, OccupancySource};

#[derive(Debug, Default)]
struct ArbiterState {
    counters:    CrossingCounters,
    changes:     usize,
    /// Present only when built with [`DirectionArbiter::with_transition_log`].
    log:         Option<Vec<DirectionChange>>,
}

impl ArbiterState {
    fn record(&mut self, change: Option<DirectionChange>) {
        let Some(change) = change else { return };
        self.changes += 1;
        tracing::trace!(from = ?change.from, to = ?change.to, "driveway direction changed");
        if let Some(log) = self.log.as_mut() {
            log.push(change);
        }
    }
}

/// Serializes driveway traffic by direction.
#[derive(Debug)]
pub struct DirectionArbiter {
    policy:  CrossingPolicy,
    state:   Mutex<ArbiterState>,
    drained: Condvar,
    mirror:  OccupancyMirror,
}

/// A lizard's registration as mid-crossing in one direction.
///
/// Completing the claim (explicitly or by drop) is the only way the count
/// goes back down.
#[must_use = "dropping a Claim immediately completes the traversal"]
#[derive(Debug)]
pub struct Claim<'a> {
    arbiter:   &'a DirectionArbiter,
    direction: Direction,
}

impl DirectionArbiter {
    pub fn new(policy: CrossingPolicy) -> Self {
        Self {
            policy,
            state:   Mutex::new(ArbiterState::default()),
            drained: Condvar::new(),
            mirror:  OccupancyMirror::default(),
        }
    }

    /// Like [`new`](Self::new), but every direction change is also appended
    /// to a log readable through [`transitions`](Self::transitions).
    pub fn with_transition_log(policy: CrossingPolicy) -> Self {
        let arbiter = Self::new(policy);
        arbiter.lock().log = Some(Vec::new());
        arbiter
    }

    // Counter updates are single statements with no panicking code between
    // them, so the data behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, ArbiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until `direction` may use the driveway, then count the caller in.
    pub fn request_entry(&self, direction: Direction) -> Claim<'_> {
        let guard = self.lock();
        let mut state = self
            .drained
            .wait_while(guard, |s| !s.counters.may_enter(direction, self.policy))
            .unwrap_or_else(PoisonError::into_inner);
        let change = state.counters.enter(direction, self.policy);
        state.record(change);
        self.mirror.publish(&state.counters);
        Claim { arbiter: self, direction }
    }

    fn complete_traversal(&self, direction: Direction) {
        let mut state = self.lock();
        let change = state.counters.exit(direction);
        let drained = change.is_some();
        state.record(change);
        self.mirror.publish(&state.counters);
        drop(state);
        if drained {
            self.drained.notify_all();
        }
    }

    /// Consistent view of both counts and the claimed direction.
    pub fn snapshot(&self) -> CrossingCounters {
        self.lock().counters
    }

    /// Number of direction changes so far (claims plus drains).
    pub fn transition_count(&self) -> usize {
        self.lock().changes
    }

    /// Recorded direction changes; empty unless built with
    /// [`with_transition_log`](Self::with_transition_log).
    pub fn transitions(&self) -> Vec<DirectionChange> {
        self.lock().log.clone().unwrap_or_default()
    }

    /// Best-effort lizard count read without the lock.
    pub fn occupancy_relaxed(&self) -> usize {
        self.mirror.occupancy()
    }
}

impl OccupancySource for DirectionArbiter {
    fn occupancy(&self) -> usize {
        self.occupancy_relaxed()
    }
}

impl Claim<'_> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Finish the traversal now.
    pub fn complete(self) {
        // Drop does the work.
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.arbiter.complete_traversal(self.direction);
    }
}
