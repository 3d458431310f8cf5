//! `lz-crossing` — the driveway synchronization protocol.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`gate`]      | `CapacityGate` + RAII `Permit` (counting semaphore)             |
//! | [`counters`]  | `CrossingCounters` state machine, `OccupancySource`, relaxed mirror |
//! | [`arbiter`]   | `DirectionArbiter` + RAII `Claim` (condvar predicate wait)      |
//! | [`abort`]     | `Violation`, `AbortSignal` (first violation wins)               |
//! | [`shared`]    | `SharedState`: gate, arbiter, abort signal, run flag            |
//!
//! # Protocol
//!
//! ```text
//! lizard:  gate.acquire() ─► arbiter.request_entry(dir) ─► cross ─► claim drop ─► permit drop
//!                 │                     │                                │
//!            blocks while K       blocks until dir may go        wakes all waiters
//!            permits are out      (unidirectional policy)        when dir drains to 0
//!
//! cat:     arbiter.occupancy_relaxed() > limit ─► abort.raise(Overcrowded)
//! ```
//!
//! A lizard never holds the arbiter's mutex while blocked on the gate, and
//! never holds either lock while sleeping, so the two primitives cannot
//! deadlock against each other.

pub mod abort;
pub mod arbiter;
pub mod counters;
pub mod gate;
pub mod shared;

#[cfg(test)]
mod tests;

pub use abort::{AbortSignal, Violation};
pub use arbiter::{Claim, DirectionArbiter};
pub use counters::{CrossingCounters, DirectionChange, OccupancyMirror, OccupancySource};
pub use gate::{CapacityGate, Permit};
pub use shared::{Crossing, SharedState};
