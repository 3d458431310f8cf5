//! The lizard lifecycle.
//!
//! ```text
//! while running:
//!   sleep [1, max_sleep]
//!   cross Forward    ── permit, claim, conflict check, cross_secs, release
//!   eat   [1, max_eat]
//!   cross Backward
//! ```
//!
//! The run flag is only consulted at the top of the loop.  A lizard that has
//! started a round trip finishes it, however long the driveway queue is.

use std::sync::Arc;

use lz_core::{CrossingConfig, Direction, LizardId, SharedRng, SimClock};
use lz_crossing::{SharedState, Violation};

use crate::{LizardEvent, SimObserver};

/// Per-lizard result handed back through the join handle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LizardSummary {
    pub id:        LizardId,
    /// Completed sago → monkey grass → sago round trips.
    pub cycles:    u64,
    /// Completed single crossings (either direction).
    pub crossings: u64,
}

/// One crossing agent.  Built by the driver, consumed by [`Lizard::run`] on
/// its own thread.
pub struct Lizard {
    id:       LizardId,
    config:   Arc<CrossingConfig>,
    clock:    SimClock,
    shared:   Arc<SharedState>,
    rng:      Arc<SharedRng>,
    observer: Arc<dyn SimObserver>,
    summary:  LizardSummary,
}

impl Lizard {
    pub fn new(
        id:       LizardId,
        config:   Arc<CrossingConfig>,
        shared:   Arc<SharedState>,
        rng:      Arc<SharedRng>,
        observer: Arc<dyn SimObserver>,
    ) -> Self {
        Self {
            id,
            clock: config.clock(),
            config,
            shared,
            rng,
            observer,
            summary: LizardSummary { id, cycles: 0, crossings: 0 },
        }
    }

    fn emit(&self, event: LizardEvent) {
        self.observer.on_lizard(self.id, &event);
    }

    /// Live until the world ends or somebody raises a violation.
    pub fn run(mut self) -> LizardSummary {
        self.emit(LizardEvent::Alive);

        while self.shared.is_running() && !self.shared.abort.is_raised() {
            if self.round_trip().is_err() {
                break;
            }
            self.summary.cycles += 1;
        }

        self.emit(LizardEvent::Finished { cycles: self.summary.cycles });
        self.summary
    }

    fn round_trip(&mut self) -> Result<(), Violation> {
        self.sleep_now();
        self.cross(Direction::Forward)?;
        self.eat();
        self.cross(Direction::Backward)
    }

    fn sleep_now(&self) {
        let secs = self.rng.secs_up_to(self.config.max_lizard_sleep_secs);
        self.emit(LizardEvent::Sleeping { secs });
        self.clock.sleep(secs);
        self.emit(LizardEvent::Awake);
    }

    fn eat(&self) {
        let secs = self.rng.secs_up_to(self.config.max_lizard_eat_secs);
        self.emit(LizardEvent::Eating { secs });
        self.clock.sleep(secs);
        self.emit(LizardEvent::DoneEating);
    }

    /// Wait for the driveway, cross it, and leave.
    ///
    /// On a conflict the violation is raised and the lizard steps off the
    /// driveway at once, so its permit and count do not strand anybody
    /// still waiting.
    fn cross(&mut self, direction: Direction) -> Result<(), Violation> {
        self.emit(LizardEvent::Checking(direction));
        let crossing = self.shared.enter(direction);
        self.emit(LizardEvent::Safe(direction));

        let counts = self.shared.arbiter.snapshot();
        self.emit(LizardEvent::Crossing { direction, count: counts.count(direction) });

        if self.config.checks_conflicts() && counts.count(direction.opposite()) > 0 {
            let violation = Violation::DirectionConflict {
                lizard:   self.id,
                direction,
                forward:  counts.forward,
                backward: counts.backward,
            };
            self.shared.abort.raise(violation.clone());
            return Err(violation);
        }

        self.clock.sleep(self.config.cross_secs);
        crossing.finish();
        self.summary.crossings += 1;
        self.emit(LizardEvent::MadeIt(direction));
        Ok(())
    }
}
