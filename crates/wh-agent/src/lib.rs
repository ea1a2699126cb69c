//! `wh-agent`: one robot following its committed path.
//!
//! # Crate layout
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`state`] | `AgentState`, `UpdateOutcome`                     |
//! | [`agent`] | `Agent`: position, path cursor, goal, task count |
//!
//! # Lifecycle
//!
//! ```text
//!   new(path) ──▶ MOVING ◀──────── advance() ─────────┐
//!                   │  block()                         │
//!                   ├──────────────────────▶ WAITING ──┘
//!                   │ path end / abandon()
//!                   ▼
//!                 IDLE, awaiting ── update(): release, get_goal, plan ──▶ MOVING
//! ```
//!
//! The agent never reads the reservation ledger on its own.  The stepping
//! protocol decides whether a move is allowed and calls [`Agent::advance`]
//! or [`Agent::block`]; planning goes through the borrowed
//! [`PlanSession`](wh_plan::PlanSession).

pub mod agent;
pub mod state;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use state::{AgentState, UpdateOutcome};
