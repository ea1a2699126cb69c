//! The `World` struct, its public API, and the move checks shared by both
//! stepping protocols.

use rustc_hash::FxHashMap;

use wh_agent::Agent;
use wh_conflict::{ConflictResolver, ResolutionAction};
use wh_core::{AgentId, Cell, SimConfig, SteppingKind, Tick};
use wh_grid::Grid;
use wh_plan::{PlanSession, Planner, ReservationTable, SpaceTimeAStar};
use wh_task::GoalSource;

use crate::{BlockReason, SimObserver, TickReport, WorldSummary};

// ── World ─────────────────────────────────────────────────────────────────────

/// All simulation state: the floor, the shared ledger, the planner, the
/// resolver, and the agents, plus the tick counter.
///
/// The goal source is *not* owned by the world; it is lent to every
/// [`step`](Self::step) so the caller decides which implementation to use.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<P: Planner = SpaceTimeAStar> {
    pub config: SimConfig,

    pub(crate) grid:     Grid,
    pub(crate) table:    ReservationTable,
    pub(crate) planner:  P,
    pub(crate) resolver: ConflictResolver,

    /// Indexed by `AgentId`.
    pub(crate) agents: Vec<Agent>,

    pub(crate) stepping: SteppingKind,
    pub(crate) tick:     Tick,
}

impl<P: Planner> World<P> {
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn table(&self) -> &ReservationTable {
        &self.table
    }

    #[inline]
    pub fn planner(&self) -> &P {
        &self.planner
    }

    #[inline]
    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    /// Mutable access for mid-run [`reconfigure`](ConflictResolver::reconfigure).
    #[inline]
    pub fn resolver_mut(&mut self) -> &mut ConflictResolver {
        &mut self.resolver
    }

    #[inline]
    pub fn stepping(&self) -> SteppingKind {
        self.stepping
    }

    /// Every agent's current cell, in id order.
    pub fn positions(&self) -> Vec<(AgentId, Cell)> {
        self.agents.iter().map(|a| (a.id, a.current_position())).collect()
    }

    /// Current tick and per-agent completed-task counts.  Pure: calling it
    /// twice without a step in between yields identical summaries.
    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            tick:            self.tick,
            completed_tasks: self.agents.iter().map(|a| (a.id, a.completed_tasks())).collect(),
        }
    }

    #[inline]
    pub fn get_summary(&self) -> WorldSummary {
        self.summary()
    }

    /// Drop ledger entries older than the current tick.  Never called by
    /// the world itself.
    pub fn prune_reservations(&mut self) -> usize {
        self.table.prune_before(self.tick)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance every agent by one tick under the configured protocol.
    pub fn step<G: GoalSource + ?Sized>(&mut self, goals: &mut G) -> TickReport {
        let report = match self.stepping {
            SteppingKind::Sequential => self.step_sequential(goals),
            SteppingKind::TwoPhase   => self.step_two_phase(goals),
        };
        tracing::trace!(
            tick = %report.tick,
            moved = report.moved,
            blocked = report.blocked,
            replanned = report.replanned,
            idled = report.idled,
            reassigned = report.reassigned,
            "tick complete"
        );
        report
    }

    /// Run until `config.max_ticks` is reached.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<G, O>(&mut self, goals: &mut G, observer: &mut O) -> WorldSummary
    where
        G: GoalSource + ?Sized,
        O: SimObserver + ?Sized,
    {
        let end = Tick(self.config.max_ticks);
        self.emit_initial_frame(observer);
        while self.tick < end {
            self.tick_once(goals, observer);
        }
        observer.on_sim_end(self.tick);
        self.summary()
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `max_ticks`).  Does not call `on_sim_end`.
    pub fn run_ticks<G, O>(&mut self, n: u64, goals: &mut G, observer: &mut O) -> WorldSummary
    where
        G: GoalSource + ?Sized,
        O: SimObserver + ?Sized,
    {
        if n > 0 {
            self.emit_initial_frame(observer);
        }
        for _ in 0..n {
            self.tick_once(goals, observer);
        }
        self.summary()
    }

    fn emit_initial_frame<O: SimObserver + ?Sized>(&self, observer: &mut O) {
        if self.tick == Tick::ZERO {
            observer.on_frame(self.tick, &self.agents);
        }
    }

    fn tick_once<G, O>(&mut self, goals: &mut G, observer: &mut O)
    where
        G: GoalSource + ?Sized,
        O: SimObserver + ?Sized,
    {
        observer.on_tick_start(self.tick);
        let report = self.step(goals);
        observer.on_tick_end(self.tick, &report);
        observer.on_frame(self.tick, &self.agents);
    }
}

// ── Move checks shared by both protocols ──────────────────────────────────────

/// `cell → agent` index of where every agent physically is.
pub(crate) fn occupancy_index(agents: &[Agent]) -> FxHashMap<Cell, AgentId> {
    agents.iter().map(|a| (a.current_position(), a.id)).collect()
}

/// Ledger checks for `agent` moving `from → to`, arriving at `arrive`.
pub(crate) fn check_reservations(
    table:  &ReservationTable,
    agent:  AgentId,
    from:   Cell,
    to:     Cell,
    arrive: Tick,
) -> Result<(), BlockReason> {
    if let Some(owner) = table.owner_at(to, arrive).filter(|&o| o != agent) {
        return Err(BlockReason::Reserved { owner });
    }
    if let Some(owner) = table.edge_owner(to, from, arrive).filter(|&o| o != agent) {
        return Err(BlockReason::Swap { owner });
    }
    Ok(())
}

/// Occupancy check: is another agent standing on `to`?
#[inline]
pub(crate) fn check_occupancy(
    occupancy: &FxHashMap<Cell, AgentId>,
    agent:     AgentId,
    to:        Cell,
) -> Result<(), BlockReason> {
    match occupancy.get(&to) {
        Some(&other) if other != agent => Err(BlockReason::Occupied { agent: other }),
        _ => Ok(()),
    }
}

/// Book the move in the ledger, update the occupancy index, and advance
/// the agent.
pub(crate) fn commit_move(
    table:     &mut ReservationTable,
    occupancy: &mut FxHashMap<Cell, AgentId>,
    agent:     &mut Agent,
    from:      Cell,
    to:        Cell,
    arrive:    Tick,
) {
    table.reserve_cell(to, arrive, agent.id);
    table.reserve_edge(from, to, arrive, agent.id);
    if occupancy.get(&from) == Some(&agent.id) {
        occupancy.remove(&from);
    }
    occupancy.insert(to, agent.id);
    agent.advance();
    tracing::debug!(agent = %agent.id, tick = %arrive, %from, %to, "MOVE");
}

/// Refuse `agent`'s move this tick and carry out the resolver's answer.
///
/// The agent's current cell is held for the arrival tick unless someone
/// else already owns it.  A replan departs at the arrival tick, so a
/// replanned agent still stands still this tick.
pub(crate) fn resolve_blocked<G, P>(
    agent:    &mut Agent,
    reason:   BlockReason,
    resolver: &mut ConflictResolver,
    goals:    &mut G,
    session:  &mut PlanSession<'_, P>,
    report:   &mut TickReport,
) where
    G: GoalSource + ?Sized,
    P: Planner + ?Sized,
{
    let here = session.depart;
    let cell = agent.current_position();
    agent.block();
    report.blocked += 1;
    if !session.table.is_cell_reserved(cell, here) {
        session.table.reserve_cell(cell, here, agent.id);
    }

    let action = resolver.resolve(agent.id);
    tracing::debug!(agent = %agent.id, tick = %here, %cell, %reason, %action, "BLOCKED");

    match action {
        ResolutionAction::Wait => {}
        ResolutionAction::Replan => {
            if agent.replan(goals, session) {
                resolver.reset(agent.id);
                report.replanned += 1;
                tracing::info!(agent = %agent.id, tick = %here, goal = ?agent.goal(), "RESOLVE replanned path");
            } else {
                tracing::info!(agent = %agent.id, tick = %here, "RESOLVE replan failed, waiting");
            }
        }
        ResolutionAction::Idle => {
            agent.abandon();
            report.idled += 1;
            tracing::info!(agent = %agent.id, tick = %here, "RESOLVE idled due to conflict");
        }
    }
}
