//! `wh-plan`: the shared collision ledger and the space-time pathfinder.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`reservation`] | `ReservationTable`: time-indexed cell and edge locks      |
//! | [`path`]        | `Path`: cells anchored at an absolute departure tick      |
//! | [`planner`]     | `Planner` trait, `PlanQuery`                               |
//! | [`astar`]       | `SpaceTimeAStar`: bounded A* over `(cell, tick)`          |
//! | [`session`]     | `PlanSession`: planner + grid + ledger bundle for callers |
//!
//! # Time model
//!
//! Every reservation and every path cell is keyed by an absolute [`Tick`].
//! A path planned at tick `d` occupies `path[i]` at tick `d + i`, so plans
//! made mid-run never collide with the ledger entries of plans made earlier.
//!
//! Nothing in this crate fails: "no path" is `None`, and the ledger accepts
//! every write.
//!
//! [`Tick`]: wh_core::Tick

pub mod astar;
pub mod path;
pub mod planner;
pub mod reservation;
pub mod session;


pub use astar::SpaceTimeAStar;
pub use path::Path;
pub use planner::{PlanQuery, Planner};
pub use reservation::{ReservationTable, DEFAULT_GOAL_DWELL};
pub use session::PlanSession;
