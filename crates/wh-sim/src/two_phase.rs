//! Two-phase stepping: every agent declares, then the world decides.
//!
//! ```text
//! ① Intent   every agent with a next cell declares (from, to); nothing is
//!             written (parallel with the `parallel` feature)
//! ② Resolve  group intents by target cell; the lowest id wins each cell,
//!             every other claimant is blocked and goes through the resolver
//! ③ Commit   winners in ascending id: jump check, ledger re-check, then
//!             occupancy; a winner whose target is still occupied is deferred
//!             and retried while the pass makes progress, so a follower can
//!             move into a cell its leader vacated later in the same pass
//! ④ Update   every agent runs its update hook, in id order
//! ```
//!
//! All ledger writes happen in ③ and ④ (and in replans from ②), strictly in
//! ascending id order, so the result does not depend on how ① was scheduled.

use std::collections::BTreeMap;

use wh_agent::Agent;
use wh_core::{AgentId, Cell};
use wh_plan::{PlanSession, Planner};
use wh_task::GoalSource;

use crate::world::{check_occupancy, check_reservations, commit_move, occupancy_index, resolve_blocked};
use crate::{BlockReason, TickReport, World};

/// One agent's declared move.
#[derive(Copy, Clone, Debug)]
struct Intent {
    agent: AgentId,
    from:  Cell,
    to:    Cell,
}

fn intent_of(agent: &Agent) -> Option<Intent> {
    agent.next_cell().map(|to| Intent { agent: agent.id, from: agent.current_position(), to })
}

/// Phase ①.  Intents come back in ascending id order either way.
fn collect_intents(agents: &[Agent]) -> Vec<Intent> {
    #[cfg(not(feature = "parallel"))]
    {
        agents.iter().filter_map(intent_of).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        agents.par_iter().filter_map(intent_of).collect()
    }
}

impl<P: Planner> World<P> {
    pub(crate) fn step_two_phase<G: GoalSource + ?Sized>(&mut self, goals: &mut G) -> TickReport {
        let arrive = self.tick.next();
        let dwell = self.config.goal_dwell_ticks;
        let mut report = TickReport::new(arrive);

        // ── ① Intent ──────────────────────────────────────────────────────
        let intents = collect_intents(&self.agents);

        let World { agents, table, planner, grid, resolver, .. } = &mut *self;
        let (planner, grid) = (&*planner, &*grid);

        // ── ② Resolve ─────────────────────────────────────────────────────
        let mut by_target: BTreeMap<Cell, Vec<Intent>> = BTreeMap::new();
        for intent in intents {
            by_target.entry(intent.to).or_default().push(intent);
        }

        let mut approved: Vec<Intent> = Vec::with_capacity(by_target.len());
        let mut losers: Vec<(Intent, BlockReason)> = Vec::new();
        for claimants in by_target.into_values() {
            // Claimants were pushed in ascending id order.
            let winner = claimants[0];
            approved.push(winner);
            for &loser in &claimants[1..] {
                losers.push((loser, BlockReason::Contested { winner: winner.agent }));
            }
        }
        losers.sort_by_key(|(i, _)| i.agent);
        for (loser, reason) in losers {
            let agent = &mut agents[loser.agent.index()];
            let mut session = PlanSession::new(planner, grid, table, arrive, dwell);
            resolve_blocked(agent, reason, resolver, goals, &mut session, &mut report);
        }

        // ── ③ Commit ──────────────────────────────────────────────────────
        approved.sort_by_key(|i| i.agent);
        let mut occupancy = occupancy_index(agents);
        let mut rejected: Vec<(Intent, BlockReason)> = Vec::new();
        let mut pending = approved;
        loop {
            let mut progress = false;
            let mut deferred: Vec<(Intent, BlockReason)> = Vec::new();

            for intent in pending {
                let Intent { agent: id, from, to } = intent;
                if from.manhattan(to) > 1 {
                    tracing::warn!(agent = %id, tick = %arrive, %from, %to, "JUMP DETECTED");
                    rejected.push((intent, BlockReason::Jump));
                    continue;
                }
                if let Err(reason) = check_reservations(table, id, from, to, arrive) {
                    rejected.push((intent, reason));
                    continue;
                }
                if let Err(reason) = check_occupancy(&occupancy, id, to) {
                    deferred.push((intent, reason));
                    continue;
                }
                commit_move(table, &mut occupancy, &mut agents[id.index()], from, to, arrive);
                resolver.reset(id);
                report.moved += 1;
                progress = true;
            }

            if deferred.is_empty() {
                break;
            }
            if !progress {
                rejected.extend(deferred);
                break;
            }
            pending = deferred.into_iter().map(|(i, _)| i).collect();
        }

        rejected.sort_by_key(|(i, _)| i.agent);
        for (intent, reason) in rejected {
            let agent = &mut agents[intent.agent.index()];
            let mut session = PlanSession::new(planner, grid, table, arrive, dwell);
            resolve_blocked(agent, reason, resolver, goals, &mut session, &mut report);
        }

        // ── ④ Update ──────────────────────────────────────────────────────
        for agent in agents.iter_mut() {
            let mut session = PlanSession::new(planner, grid, table, arrive, dwell);
            report.record_update(agent.update(goals, &mut session));
        }

        self.tick = arrive;
        report
    }
}
