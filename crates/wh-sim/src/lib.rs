//! `wh-sim`: the world and its tick loop.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`world`]      | `World<P>`: state, `step`, `run`, summary                 |
//! | [`sequential`] | Sequential stepping protocol                               |
//! | [`two_phase`]  | Two-phase (intent / resolve / commit / update) protocol    |
//! | [`builder`]    | `WorldBuilder`: validation and agent spawning             |
//! | [`setup`]      | `warehouse`: config → floor + goals + world in one call   |
//! | [`observer`]   | `SimObserver` trait, `NoopObserver`                        |
//! | [`report`]     | `TickReport`, `WorldSummary`, `BlockReason`                |
//! | [`error`]      | `SimError`, `SimResult<T>`                                 |
//!
//! # Safety invariant
//!
//! Whichever protocol runs, after every tick no two agents share a cell and
//! no two agents have swapped cells.  Both protocols check a move against
//! three things before committing it:
//!
//! ```text
//! 1. cell lock     target is not reserved by another agent for the next tick
//! 2. edge lock     the reverse traversal is not booked for the next tick
//! 3. occupancy     no other agent is physically on the target and staying
//! ```
//!
//! The ledger checks (1, 2) keep agents on their planned schedules; the
//! occupancy check (3) holds even when an agent has fallen behind its
//! schedule after waiting.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Computes two-phase intents on Rayon's thread pool.     |
//! | `serde`    | Derives `Serialize`/`Deserialize` on reports.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_core::SimConfig;
//! use wh_sim::{warehouse, NoopObserver};
//!
//! let config = SimConfig::default();
//! let (mut world, mut goals) = warehouse(&config)?;
//! let summary = world.run(&mut goals, &mut NoopObserver);
//! println!("{summary:?}");
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod sequential;
pub mod setup;
pub mod two_phase;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::WorldBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{BlockReason, TickReport, WorldSummary};
pub use setup::warehouse;
pub use world::World;
