//! The cat patrol: nap, glance at the driveway, pounce if it is crowded.

use std::sync::Arc;

use lz_core::{CatId, CrossingConfig, SharedRng, SimClock};
use lz_crossing::{OccupancySource, SharedState, Violation};

use crate::{CatEvent, SimObserver};

/// Per-cat result handed back through the join handle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CatSummary {
    pub id:      CatId,
    /// Times the cat woke and looked at the driveway.
    pub checks:  u64,
    /// Whether this cat raised the run's violation.
    pub pounced: bool,
}

/// One occupancy watcher.
///
/// The cat reads occupancy through an [`OccupancySource`], normally the
/// shared state's lock-free mirror.  Tests substitute a scripted sequence.
pub struct Cat {
    id:       CatId,
    limit:    usize,
    max_nap:  u64,
    clock:    SimClock,
    shared:   Arc<SharedState>,
    source:   Arc<dyn OccupancySource>,
    rng:      Arc<SharedRng>,
    observer: Arc<dyn SimObserver>,
}

impl Cat {
    pub fn new(
        id:       CatId,
        config:   &CrossingConfig,
        shared:   Arc<SharedState>,
        source:   Arc<dyn OccupancySource>,
        rng:      Arc<SharedRng>,
        observer: Arc<dyn SimObserver>,
    ) -> Self {
        Self {
            id,
            limit:   config.max_lizard_crossing,
            max_nap: config.max_cat_sleep_secs,
            clock:   config.clock(),
            shared,
            source,
            rng,
            observer,
        }
    }

    fn emit(&self, event: CatEvent) {
        self.observer.on_cat(self.id, &event);
    }

    /// The threshold rule on its own: more than `limit` lizards is a crowd.
    pub fn check(&self, occupancy: usize) -> Result<(), Violation> {
        if occupancy > self.limit {
            return Err(Violation::Overcrowded { cat: self.id, occupancy, limit: self.limit });
        }
        Ok(())
    }

    /// Patrol until the world ends, a violation is raised, or this cat
    /// finds a crowd.
    pub fn run(self) -> CatSummary {
        let mut summary = CatSummary { id: self.id, checks: 0, pounced: false };
        self.emit(CatEvent::Alive);

        while self.shared.is_running() && !self.shared.abort.is_raised() {
            let secs = self.rng.secs_up_to(self.max_nap);
            self.emit(CatEvent::Sleeping { secs });
            self.clock.sleep(secs);
            self.emit(CatEvent::Awake);

            let occupancy = self.source.occupancy();
            summary.checks += 1;
            self.emit(CatEvent::Checked { occupancy });

            if let Err(violation) = self.check(occupancy) {
                summary.pounced = self.shared.abort.raise(violation);
                break;
            }
        }

        self.emit(CatEvent::Finished);
        summary
    }
}
