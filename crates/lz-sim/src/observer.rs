//! Lifecycle observer trait for tracing and test instrumentation.

use lz_core::{CatId, Direction, LizardId};

/// One step of a lizard's lifecycle, in the order they occur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LizardEvent {
    Alive,
    Sleeping { secs: u64 },
    Awake,
    /// About to wait for a driveway slot and the direction.
    Checking(Direction),
    /// Holds a permit and a claim on `Direction`.
    Safe(Direction),
    /// Started crossing; `count` lizards (itself included) are going its way.
    Crossing { direction: Direction, count: usize },
    /// Left the driveway and returned its permit.
    MadeIt(Direction),
    Eating { secs: u64 },
    DoneEating,
    /// Left its loop after `cycles` full round trips.
    Finished { cycles: u64 },
}

/// One step of a cat's patrol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatEvent {
    Alive,
    Sleeping { secs: u64 },
    Awake,
    /// Glanced at the driveway and counted `occupancy` lizards.
    Checked { occupancy: usize },
    Finished,
}

/// Callbacks invoked by lizard and cat threads as they move through their
/// lifecycles.
///
/// Unlike a single-threaded tick observer, these are called concurrently
/// from every unit's thread, so implementations take `&self` and must be
/// `Send + Sync`.  All methods default to no-ops.
///
/// # Example — crossing counter
///
/// ```rust,ignore
/// struct Crossings(AtomicUsize);
///
/// impl SimObserver for Crossings {
///     fn on_lizard(&self, _id: LizardId, event: &LizardEvent) {
///         if matches!(event, LizardEvent::MadeIt(_)) {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
/// ```
pub trait SimObserver: Send + Sync {
    fn on_lizard(&self, _lizard: LizardId, _event: &LizardEvent) {}

    fn on_cat(&self, _cat: CatId, _event: &CatEvent) {}

    /// Called once by the driver after every unit has been joined.
    fn on_world_end(&self) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every lifecycle step to `tracing` at `DEBUG`, tagged with the
/// unit's id.
pub struct TracingObserver;

impl SimObserver for TracingObserver {
    fn on_lizard(&self, lizard: LizardId, event: &LizardEvent) {
        match event {
            LizardEvent::Alive => tracing::debug!(%lizard, "lizard is alive"),
            LizardEvent::Sleeping { secs } => {
                tracing::debug!(%lizard, "sleeping for {secs} seconds")
            }
            LizardEvent::Awake => tracing::debug!(%lizard, "awake"),
            LizardEvent::Checking(dir) => tracing::debug!(%lizard, "checking {dir}"),
            LizardEvent::Safe(dir) => tracing::debug!(%lizard, "thinks {dir} is safe"),
            LizardEvent::Crossing { direction, count } => {
                tracing::debug!(%lizard, count, "crossing {direction}")
            }
            LizardEvent::MadeIt(dir) => {
                tracing::debug!(%lizard, at = dir.destination(), "made the {dir} crossing")
            }
            LizardEvent::Eating { secs } => tracing::debug!(%lizard, "eating for {secs} seconds"),
            LizardEvent::DoneEating => tracing::debug!(%lizard, "finished eating"),
            LizardEvent::Finished { cycles } => tracing::debug!(%lizard, cycles, "lizard done"),
        }
    }

    fn on_cat(&self, cat: CatId, event: &CatEvent) {
        match event {
            CatEvent::Alive => tracing::debug!(%cat, "cat is alive"),
            CatEvent::Sleeping { secs } => tracing::debug!(%cat, "cat sleeping for {secs} seconds"),
            CatEvent::Awake => tracing::debug!(%cat, "cat awake"),
            CatEvent::Checked { occupancy } => tracing::debug!(%cat, occupancy, "cat checked driveway"),
            CatEvent::Finished => tracing::debug!(%cat, "cat done"),
        }
    }

    fn on_world_end(&self) {
        tracing::debug!("world ended");
    }
}
