//! A planning context borrowed for the duration of one tick.

use wh_core::{AgentId, Cell, Tick};
use wh_grid::Grid;

use crate::{Path, PlanQuery, Planner, ReservationTable};

/// Everything a mid-run replan needs: the planner, the floor, the shared
/// ledger (mutably, so the result can be committed), the departure tick,
/// and the goal lease length.
///
/// The world builds one of these per tick and lends it to the stepping
/// protocol and to each agent's update hook in turn.
pub struct PlanSession<'a, P: Planner + ?Sized> {
    pub planner: &'a P,
    pub grid:    &'a Grid,
    pub table:   &'a mut ReservationTable,
    /// Tick at which newly planned paths start.
    pub depart:  Tick,
    /// Goal lease length passed to `reserve_goal_forever`.
    pub dwell:   u64,
}

impl<'a, P: Planner + ?Sized> PlanSession<'a, P> {
    pub fn new(
        planner: &'a P,
        grid:    &'a Grid,
        table:   &'a mut ReservationTable,
        depart:  Tick,
        dwell:   u64,
    ) -> Self {
        Self { planner, grid, table, depart, dwell }
    }

    /// Plan `start → goal` for `owner` departing at `self.depart` and
    /// commit it on success.
    pub fn plan_and_reserve(&mut self, owner: AgentId, start: Cell, goal: Cell) -> Option<Path> {
        let query = PlanQuery::new(start, goal).departing(self.depart).owned_by(owner);
        let path = self.planner.plan_and_reserve(self.grid, self.table, &query, self.dwell);
        match &path {
            Some(p) => tracing::debug!(agent = %owner, from = %start, to = %goal, len = p.len(), tick = %self.depart, "planned path"),
            None    => tracing::debug!(agent = %owner, from = %start, to = %goal, tick = %self.depart, "no path"),
        }
        path
    }

    /// Plan without committing anything.
    pub fn plan(&self, owner: AgentId, start: Cell, goal: Cell) -> Option<Path> {
        let query = PlanQuery::new(start, goal).departing(self.depart).owned_by(owner);
        self.planner.plan(self.grid, &*self.table, &query)
    }
}
