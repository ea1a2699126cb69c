//! `wh-conflict`: what a blocked agent does next.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`action`]   | `ResolutionAction` (`Wait`, `Replan`, `Idle`)            |
//! | [`resolver`] | `ConflictResolver`, `ConflictState`                      |
//!
//! The resolver is purely reactive: the stepping protocols call
//! [`ConflictResolver::resolve`] once per blocked agent per tick and carry
//! out the returned action themselves.  It never looks at the grid or the
//! reservation ledger.
//!
//! # Per-agent state machine
//!
//! ```text
//! resolve(agent):
//!   cooldown > 0            → cooldown -= 1; Wait
//!   wait_then_replan:
//!     retries < max_retries → retries += 1; Wait
//!     otherwise             → retries = 0; cooldown = cooldown_ticks; Replan
//!   always_wait             → Wait
//!   always_replan           → Replan
//!   idle_on_block           → Idle
//! ```
//!
//! [`ConflictResolver::reset`] clears both counters after a successful move
//! or replan.

pub mod action;
pub mod resolver;


pub use action::ResolutionAction;
pub use resolver::{ConflictResolver, ConflictState};
pub use wh_core::ConflictStrategyKind as ConflictStrategy;
