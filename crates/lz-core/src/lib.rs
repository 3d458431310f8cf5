//! `lz-core` — foundational types for the lizard crossing simulation.
//!
//! This crate is a dependency of every other `lz-*` crate.  It has no `lz-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `LizardId`, `CatId`                                   |
//! | [`direction`]   | `Direction` (the two ways across the driveway)        |
//! | [`time`]        | `SimClock` (simulated seconds → wall-clock time)      |
//! | [`rng`]         | `SharedRng` (one seeded source shared by all units)   |
//! | [`config`]      | `CrossingConfig`, `CrossingPolicy`                    |
//! | [`error`]       | `LzError`, `LzResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod direction;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CrossingConfig, CrossingPolicy};
pub use direction::Direction;
pub use error::{LzError, LzResult};
pub use ids::{CatId, LizardId};
pub use rng::SharedRng;
pub use time::SimClock;
