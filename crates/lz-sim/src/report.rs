//! What a finished run hands back to the caller.

use std::time::Duration;

use lz_crossing::Violation;

use crate::{CatSummary, LizardSummary};

/// Process exit code for a run that ended in a safety violation (`-1` as an
/// unsigned byte).
pub const VIOLATION_EXIT_CODE: u8 = 255;

/// How the world ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SimOutcome {
    /// The world ran its full length and every unit stopped cleanly.
    Completed,
    /// A safety invariant broke; the first violation raised.
    Aborted(Violation),
}

impl SimOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SimOutcome::Completed)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            SimOutcome::Completed => None,
            SimOutcome::Aborted(v) => Some(v),
        }
    }

    /// `0` for a completed world, [`VIOLATION_EXIT_CODE`] otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            SimOutcome::Completed => 0,
            SimOutcome::Aborted(_) => VIOLATION_EXIT_CODE,
        }
    }
}

/// Summary of one run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunReport {
    pub outcome:           SimOutcome,
    /// Wall-clock time from first spawn to last join.
    pub elapsed:           Duration,
    /// Indexed by `LizardId`.
    pub lizards:           Vec<LizardSummary>,
    /// Indexed by `CatId`.
    pub cats:              Vec<CatSummary>,
    /// Most gate permits ever out at once.
    pub peak_occupancy:    usize,
    /// Times the driveway's claimed direction changed (claims plus drains).
    pub direction_changes: usize,
}

impl RunReport {
    /// Single crossings completed by all lizards.
    pub fn total_crossings(&self) -> u64 {
        self.lizards.iter().map(|l| l.crossings).sum()
    }

    /// Full round trips completed by all lizards.
    pub fn total_cycles(&self) -> u64 {
        self.lizards.iter().map(|l| l.cycles).sum()
    }
}
