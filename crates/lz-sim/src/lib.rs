//! `lz-sim` — lizards, cats, and the world driver.
//!
//! # One thread per unit
//!
//! ```text
//! Sim::run
//!   ① spawn N lizard threads and M cat threads (each gets Arc<SharedState>)
//!   ② wait world_end_secs on the abort signal (returns early on violation)
//!   ③ clear the run flag
//!   ④ join every unit; each finishes its current iteration first
//!   ⑤ build a RunReport: Completed, or Aborted(first violation)
//! ```
//!
//! Lizards loop sleep → cross forward → eat → cross back; cats loop
//! nap → count lizards on the driveway → pounce if over the limit.  Every
//! lifecycle step is reported to a [`SimObserver`]; the default
//! [`TracingObserver`] turns them into `tracing` events.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lz_core::CrossingConfig;
//! use lz_sim::SimBuilder;
//!
//! let sim = SimBuilder::new(CrossingConfig::default()).build()?;
//! let report = sim.run()?;
//! assert!(report.outcome.is_completed());
//! ```

pub mod builder;
pub mod cat;
pub mod error;
pub mod lizard;
pub mod observer;
pub mod report;
pub mod sim;


pub use builder::SimBuilder;
pub use cat::{Cat, CatSummary};
pub use error::{SimError, SimResult};
pub use lizard::{Lizard, LizardSummary};
pub use observer::{CatEvent, LizardEvent, NoopObserver, SimObserver, TracingObserver};
pub use report::{RunReport, SimOutcome, VIOLATION_EXIT_CODE};
pub use sim::{Sim, UnitHandle};
