//! Sequential stepping: one agent at a time, in id order.
//!
//! ```text
//! for agent in ascending AgentId:
//!   if it has a next cell:
//!     check ledger + occupancy against the state committed so far
//!     ok      → commit cell/edge lock, advance, reset resolver
//!     blocked → resolve inline (wait / replan / idle)
//!   run the agent's update hook (arrival, reassignment)
//! ```
//!
//! Each agent sees everything committed by lower ids earlier in the same
//! tick, so lower ids win ties implicitly.  The order is what makes the
//! read-then-write on the ledger safe; this protocol must not be
//! parallelized.

use wh_plan::{PlanSession, Planner};
use wh_task::GoalSource;

use crate::world::{check_occupancy, check_reservations, commit_move, occupancy_index, resolve_blocked};
use crate::{TickReport, World};

impl<P: Planner> World<P> {
    pub(crate) fn step_sequential<G: GoalSource + ?Sized>(&mut self, goals: &mut G) -> TickReport {
        let arrive = self.tick.next();
        let dwell = self.config.goal_dwell_ticks;
        let mut report = TickReport::new(arrive);
        let mut occupancy = occupancy_index(&self.agents);

        let World { agents, table, planner, grid, resolver, .. } = &mut *self;
        let (planner, grid) = (&*planner, &*grid);

        for agent in agents.iter_mut() {
            if let Some(to) = agent.next_cell() {
                let from = agent.current_position();
                let verdict = check_reservations(table, agent.id, from, to, arrive)
                    .and_then(|()| check_occupancy(&occupancy, agent.id, to));
                match verdict {
                    Ok(()) => {
                        commit_move(table, &mut occupancy, agent, from, to, arrive);
                        resolver.reset(agent.id);
                        report.moved += 1;
                    }
                    Err(reason) => {
                        let mut session = PlanSession::new(planner, grid, table, arrive, dwell);
                        resolve_blocked(agent, reason, resolver, goals, &mut session, &mut report);
                    }
                }
            }

            let mut session = PlanSession::new(planner, grid, table, arrive, dwell);
            report.record_update(agent.update(goals, &mut session));
        }

        self.tick = arrive;
        report
    }
}
