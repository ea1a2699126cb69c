//! `wh-core`: foundational types for the warehouse multi-agent simulator.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no `wh-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`ids`]       | `AgentId`                                                  |
//! | [`cell`]      | `Cell` (grid coordinate), `WorldPoint` (metres)            |
//! | [`time`]      | `Tick`                                                     |
//! | [`rng`]       | `SimRng` (seeded, forkable)                                |
//! | [`strategy`]  | `GoalStrategyKind`, `ConflictStrategyKind`, `SteppingKind` |
//! | [`config`]    | `SimConfig`                                                |
//! | [`error`]     | `WhError`, `WhResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `SimConfig` from TOML.                    |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod strategy;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Cell, WorldPoint};
pub use config::SimConfig;
pub use error::{WhError, WhResult};
pub use ids::AgentId;
pub use rng::SimRng;
pub use strategy::{ConflictStrategyKind, GoalStrategyKind, SteppingKind};
pub use time::Tick;
