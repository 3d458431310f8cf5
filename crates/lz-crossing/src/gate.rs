//! `CapacityGate` — counting admission control for the driveway.
//!
//! A classic counting semaphore built from a `Mutex` and a `Condvar`.  Each
//! successful [`acquire`](CapacityGate::acquire) hands out a [`Permit`]; the
//! permit goes back to the gate when it is dropped, so every acquire is
//! paired with exactly one release by construction.
//!
//! There is no timeout and no fairness: when the driveway is full, callers
//! block until somebody leaves, and whichever waiter the OS wakes first wins.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct GateState {
    in_use: usize,
    /// Highest `in_use` ever observed; instrumentation for tests and reports.
    peak:   usize,
}

/// Bounded pool of `capacity` driveway permits.
#[derive(Debug)]
pub struct CapacityGate {
    capacity: usize,
    state:    Mutex<GateState>,
    freed:    Condvar,
}

/// One occupied driveway slot.  Released on drop.
#[must_use = "dropping a Permit immediately releases the driveway slot"]
#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a CapacityGate,
}

impl CapacityGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(GateState { in_use: 0, peak: 0 }),
            freed: Condvar::new(),
        }
    }

    // The counts are only touched by whole-statement updates, so a panic in
    // another holder cannot leave them torn.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until a permit is free, then take it.
    pub fn acquire(&self) -> Permit<'_> {
        let guard = self.lock();
        let mut state = self
            .freed
            .wait_while(guard, |s| s.in_use >= self.capacity)
            .unwrap_or_else(PoisonError::into_inner);
        state.in_use += 1;
        state.peak = state.peak.max(state.in_use);
        Permit { gate: self }
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut state = self.lock();
        if state.in_use >= self.capacity {
            return None;
        }
        state.in_use += 1;
        state.peak = state.peak.max(state.in_use);
        Some(Permit { gate: self })
    }

    fn release(&self) {
        let mut state = self.lock();
        debug_assert!(state.in_use > 0, "permit released with none in use");
        state.in_use = state.in_use.saturating_sub(1);
        drop(state);
        self.freed.notify_one();
    }

    /// Total permits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently handed out.
    pub fn in_use(&self) -> usize {
        self.lock().in_use
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.in_use())
    }

    /// Highest number of permits ever out at once.
    pub fn peak(&self) -> usize {
        self.lock().peak
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
