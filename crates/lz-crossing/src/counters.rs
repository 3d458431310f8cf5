//! Per-direction occupancy counts and the direction state machine.
//!
//! `CrossingCounters` is plain data with no locking of its own; the
//! [`DirectionArbiter`][crate::DirectionArbiter] owns the only instance behind
//! its mutex.  Keeping the state machine lock-free here lets it be unit
//! tested without spawning threads.
//!
//! # Direction state machine (unidirectional policy)
//!
//! ```text
//!            enter(F), backward == 0            enter(B), forward == 0
//!   Forward <─────────────────────── None ───────────────────────> Backward
//!      │                              ^  ^                             │
//!      └── exit(F) → forward == 0 ────┘  └──── exit(B) → backward == 0 ┘
//! ```
//!
//! There is no edge between `Forward` and `Backward`.  Under the
//! bidirectional policy `current` stays `None` and only the counts move.

use std::sync::atomic::{AtomicU64, Ordering};

use lz_core::{CrossingPolicy, Direction};

/// Lizards currently mid-crossing, per direction, plus the claimed direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingCounters {
    pub forward:  usize,
    pub backward: usize,
    /// Direction currently holding the driveway; `None` when it is empty
    /// (always `None` under the bidirectional policy).
    pub current:  Option<Direction>,
}

/// One recorded change of `CrossingCounters::current`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionChange {
    pub from: Option<Direction>,
    pub to:   Option<Direction>,
}

impl CrossingCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn count(&self, dir: Direction) -> usize {
        match dir {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
        }
    }

    #[inline]
    fn count_mut(&mut self, dir: Direction) -> &mut usize {
        match dir {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }

    /// Lizards on the driveway in either direction.
    #[inline]
    pub fn total(&self) -> usize {
        self.forward + self.backward
    }

    /// Both directions occupied at once.
    #[inline]
    pub fn is_conflicted(&self) -> bool {
        self.forward > 0 && self.backward > 0
    }

    /// The entry predicate: may a lizard start crossing in `dir` now?
    pub fn may_enter(&self, dir: Direction, policy: CrossingPolicy) -> bool {
        match policy {
            CrossingPolicy::Bidirectional => true,
            CrossingPolicy::Unidirectional => match self.current {
                None => true,
                Some(cur) => cur == dir && self.count(dir.opposite()) == 0,
            },
        }
    }

    /// Record one lizard starting to cross in `dir`.
    ///
    /// The caller must have checked [`may_enter`](Self::may_enter).  Returns
    /// the direction change, if the driveway was idle and is now claimed.
    pub fn enter(&mut self, dir: Direction, policy: CrossingPolicy) -> Option<DirectionChange> {
        debug_assert!(self.may_enter(dir, policy), "enter({dir}) with predicate false: {self:?}");
        *self.count_mut(dir) += 1;
        if policy == CrossingPolicy::Unidirectional && self.current.is_none() {
            self.current = Some(dir);
            return Some(DirectionChange { from: None, to: Some(dir) });
        }
        None
    }

    /// Record one lizard finishing its crossing in `dir`.
    ///
    /// Returns the direction change when this was the last lizard of the
    /// active direction (the driveway reverts to `None`).
    pub fn exit(&mut self, dir: Direction) -> Option<DirectionChange> {
        let count = self.count_mut(dir);
        debug_assert!(*count > 0, "exit({dir}) with no lizard crossing");
        *count = count.saturating_sub(1);
        let drained = *count == 0;
        if drained && self.current == Some(dir) {
            self.current = None;
            return Some(DirectionChange { from: Some(dir), to: None });
        }
        None
    }
}

// ── Relaxed occupancy reads ───────────────────────────────────────────────────

/// Something a cat can glance at to count lizards on the driveway.
///
/// Implementations may answer from a racy, best-effort view: the cat is a
/// heuristic monitor, not a consistency check.
pub trait OccupancySource: Send + Sync {
    fn occupancy(&self) -> usize;
}

/// Lock-free mirror of the two counts, written under the arbiter's lock and
/// read without it.
///
/// Both counts are packed into one word (forward high, backward low) so a
/// reader always sees a pair that really existed at some instant.  Loads are
/// `Relaxed`: the value may already be stale by the time a cat acts on it,
/// which a periodic threshold check tolerates.
#[derive(Debug, Default)]
pub struct OccupancyMirror(AtomicU64);

impl OccupancyMirror {
    pub fn publish(&self, counters: &CrossingCounters) {
        let packed = ((counters.forward as u64) << 32) | (counters.backward as u64 & 0xFFFF_FFFF);
        self.0.store(packed, Ordering::Relaxed);
    }

    /// `(forward, backward)` as of some recent instant.
    pub fn load(&self) -> (usize, usize) {
        let packed = self.0.load(Ordering::Relaxed);
        ((packed >> 32) as usize, (packed & 0xFFFF_FFFF) as usize)
    }
}

impl OccupancySource for OccupancyMirror {
    fn occupancy(&self) -> usize {
        let (forward, backward) = self.load();
        forward + backward
    }
}
