//! `wh-task`: destination assignment.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`source`]   | `GoalSource` trait: the capability the world consumes       |
//! | [`strategy`] | `GoalStrategy`: random / spread / high-density parameters   |
//! | [`manager`]  | `TaskManager`: claimed-goal set + sampling                  |
//! | [`error`]    | `TaskError`, `TaskResult<T>`                                 |
//!
//! # Fallbacks
//!
//! Goal selection never fails.  Every strategy samples under a fixed attempt
//! budget and degrades along a defined chain:
//!
//! ```text
//! high_density ──(no valid candidate)──▶ random
//! spread ───────(no spaced candidate)──▶ random
//! random ───────(no valid candidate)───▶ start cell (unclaimed)
//! ```
//!
//! A goal equal to the requester's own cell means "nothing to do".

pub mod error;
pub mod manager;
pub mod source;
pub mod strategy;


pub use error::{TaskError, TaskResult};
pub use manager::TaskManager;
pub use source::GoalSource;
pub use strategy::GoalStrategy;
