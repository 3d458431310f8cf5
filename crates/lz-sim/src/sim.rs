//! The `Sim` driver: spawn every unit, let the world run, stop, join.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use lz_core::{CatId, CrossingConfig, LizardId, SharedRng};
use lz_crossing::{OccupancySource, SharedState};

use crate::{
    Cat, CatSummary, Lizard, LizardSummary, RunReport, SimError, SimObserver, SimOutcome,
    SimResult,
};

// ── UnitHandle ────────────────────────────────────────────────────────────────

/// Join handle for one lizard or cat thread.
pub struct UnitHandle<T> {
    unit:  String,
    inner: JoinHandle<T>,
}

impl<T> UnitHandle<T> {
    /// Thread name, e.g. `lizard-3`.
    pub fn name(&self) -> &str {
        &self.unit
    }

    /// Wait for the unit to leave its loop and take its summary.
    pub fn join(self) -> SimResult<T> {
        self.inner
            .join()
            .map_err(|_| SimError::UnitPanicked { unit: self.unit })
    }
}

/// Join every handle even if some fail; report the first failure.
fn join_all<T>(handles: Vec<UnitHandle<T>>) -> SimResult<Vec<T>> {
    let mut out = Vec::with_capacity(handles.len());
    let mut first_err = None;
    for handle in handles {
        match handle.join() {
            Ok(summary) => out.push(summary),
            Err(e) => {
                tracing::error!(error = %e, "unit failed");
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(out),
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation driver.
///
/// Owns the configuration and the [`SharedState`] every unit receives.
/// [`run`](Self::run) is the whole world in one call; the lower-level
/// [`spawn_lizard`](Self::spawn_lizard) / [`spawn_cat`](Self::spawn_cat) /
/// [`stop`](Self::stop) / [`UnitHandle::join`] let tests drive units one at a
/// time.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub(crate) config:    Arc<CrossingConfig>,
    pub(crate) shared:    Arc<SharedState>,
    pub(crate) rng:       Arc<SharedRng>,
    pub(crate) observer:  Arc<dyn SimObserver>,
    pub(crate) occupancy: Arc<dyn OccupancySource>,
}

impl Sim {
    pub fn config(&self) -> &CrossingConfig {
        &self.config
    }

    /// The driveway state shared with every unit.
    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// Start one lizard on its own thread.
    pub fn spawn_lizard(&self, id: LizardId) -> SimResult<UnitHandle<LizardSummary>> {
        let lizard = Lizard::new(
            id,
            Arc::clone(&self.config),
            Arc::clone(&self.shared),
            Arc::clone(&self.rng),
            Arc::clone(&self.observer),
        );
        spawn_unit(format!("lizard-{id}"), move || lizard.run())
    }

    /// Start one cat on its own thread.
    pub fn spawn_cat(&self, id: CatId) -> SimResult<UnitHandle<CatSummary>> {
        let cat = Cat::new(
            id,
            &self.config,
            Arc::clone(&self.shared),
            Arc::clone(&self.occupancy),
            Arc::clone(&self.rng),
            Arc::clone(&self.observer),
        );
        spawn_unit(format!("cat-{id}"), move || cat.run())
    }

    /// Clear the run flag.  Units notice at the top of their next iteration.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Run the world for `config.world_end_secs`, or until a violation.
    ///
    /// Returns `Ok` with [`SimOutcome::Aborted`] for safety violations;
    /// `Err` is reserved for the driver failing (a thread could not be
    /// spawned or panicked).
    ///
    /// A world ends only once: the run flag and abort signal are left as the
    /// run finished them, so `run` consumes the `Sim`.  Clone
    /// [`shared`](Self::shared) beforehand to inspect the driveway afterwards.
    ///
    /// ```compile_fail
    /// # use lz_core::CrossingConfig;
    /// # use lz_sim::SimBuilder;
    /// let sim = SimBuilder::new(CrossingConfig::default()).build().unwrap();
    /// let _first = sim.run();
    /// let _again = sim.run();
    /// ```
    pub fn run(self) -> SimResult<RunReport> {
        let t0 = Instant::now();
        tracing::info!(
            lizards = self.config.lizards,
            cats    = self.config.cats,
            policy  = ?self.config.policy,
            "world starting"
        );

        let (lizards, cats) = self.spawn_all()?;

        // Sleep out the world, waking early if anybody raises a violation.
        let world = self.config.clock().duration(self.config.world_end_secs);
        if let Some(violation) = self.shared.abort.wait_timeout(world) {
            tracing::info!(%violation, "world ending early");
        }
        self.stop();

        let lizards = join_all(lizards);
        let cats = join_all(cats);
        let (lizards, cats) = (lizards?, cats?);
        self.observer.on_world_end();

        // A violation raised while units were winding down still counts.
        let outcome = match self.shared.abort.violation() {
            Some(v) => SimOutcome::Aborted(v),
            None => SimOutcome::Completed,
        };
        let report = RunReport {
            outcome,
            elapsed:           t0.elapsed(),
            lizards,
            cats,
            peak_occupancy:    self.shared.gate.peak(),
            direction_changes: self.shared.arbiter.transition_count(),
        };
        tracing::info!(
            completed = report.outcome.is_completed(),
            crossings = report.total_crossings(),
            elapsed   = ?report.elapsed,
            "world ended"
        );
        Ok(report)
    }

    #[allow(clippy::type_complexity)]
    fn spawn_all(&self) -> SimResult<(Vec<UnitHandle<LizardSummary>>, Vec<UnitHandle<CatSummary>>)> {
        let mut lizards = Vec::with_capacity(self.config.lizards);
        let mut cats = Vec::with_capacity(self.config.cats);

        for i in 0..self.config.lizards {
            match self.spawn_lizard(LizardId(i as u32)) {
                Ok(h) => lizards.push(h),
                Err(e) => return Err(self.abandon(lizards, cats, e)),
            }
        }
        for i in 0..self.config.cats {
            match self.spawn_cat(CatId(i as u32)) {
                Ok(h) => cats.push(h),
                Err(e) => return Err(self.abandon(lizards, cats, e)),
            }
        }
        Ok((lizards, cats))
    }

    /// Stop and reap whatever was spawned before `err`, then hand `err` back.
    fn abandon(
        &self,
        lizards: Vec<UnitHandle<LizardSummary>>,
        cats:    Vec<UnitHandle<CatSummary>>,
        err:     SimError,
    ) -> SimError {
        tracing::error!(error = %err, "spawn failed; stopping units already running");
        self.stop();
        let _ = join_all(lizards);
        let _ = join_all(cats);
        err
    }
}

fn spawn_unit<T, F>(unit: String, f: F) -> SimResult<UnitHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match thread::Builder::new().name(unit.clone()).spawn(f) {
        Ok(inner) => Ok(UnitHandle { unit, inner }),
        Err(source) => Err(SimError::Spawn { unit, source }),
    }
}
