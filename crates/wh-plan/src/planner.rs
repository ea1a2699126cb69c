//! Planner trait and query type.
//!
//! # Pluggability
//!
//! The stepping protocols and the agent update hook call planning through
//! the [`Planner`] trait, so a different search (a coupled solver, a cached
//! router) can be dropped in without touching the world.  The default
//! [`SpaceTimeAStar`](crate::SpaceTimeAStar) is decoupled, one agent at a
//! time, against whatever the ledger holds when it is called.

use wh_core::{AgentId, Cell, Tick};
use wh_grid::Grid;

use crate::{Path, ReservationTable};

/// One planning request.
///
/// `depart` anchors the result in absolute time and `owner` decides which
/// existing reservations count as "someone else's".  [`PlanQuery::new`]
/// plans anonymously from tick 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlanQuery {
    pub start:  Cell,
    pub goal:   Cell,
    pub depart: Tick,
    pub owner:  AgentId,
}

impl PlanQuery {
    pub fn new(start: Cell, goal: Cell) -> Self {
        Self { start, goal, depart: Tick::ZERO, owner: AgentId::INVALID }
    }

    pub fn departing(mut self, depart: Tick) -> Self {
        self.depart = depart;
        self
    }

    pub fn owned_by(mut self, owner: AgentId) -> Self {
        self.owner = owner;
        self
    }
}

/// Pluggable path search.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a single planner can be shared
/// by the world and read from Rayon workers.
pub trait Planner: Send + Sync {
    /// Find a collision-free path for `query` against the current ledger.
    ///
    /// `None` means "currently unreachable": callers retry later.  Never
    /// writes to `table`.
    fn plan(&self, grid: &Grid, table: &ReservationTable, query: &PlanQuery) -> Option<Path>;

    /// [`plan`](Self::plan), then commit the result to `table` (cells,
    /// edges, start cell, and a `dwell`-tick goal lease).
    fn plan_and_reserve(
        &self,
        grid:  &Grid,
        table: &mut ReservationTable,
        query: &PlanQuery,
        dwell: u64,
    ) -> Option<Path> {
        let path = self.plan(grid, table, query)?;
        table.commit_path(&path, query.owner, dwell);
        Some(path)
    }
}

impl<P: Planner + ?Sized> Planner for &P {
    fn plan(&self, grid: &Grid, table: &ReservationTable, query: &PlanQuery) -> Option<Path> {
        (**self).plan(grid, table, query)
    }
}
