//! Fluent builder for constructing a [`World`].

use rustc_hash::FxHashSet;

use wh_agent::Agent;
use wh_conflict::ConflictResolver;
use wh_core::{AgentId, Cell, SimConfig, Tick};
use wh_grid::Grid;
use wh_plan::{PlanSession, Planner, ReservationTable, SpaceTimeAStar};
use wh_task::GoalSource;

use crate::{SimError, SimResult, World};

/// Draws per agent when looking for a free, unused start cell.
pub const SPAWN_ATTEMPTS: usize = 1_000;

/// Fluent builder for [`World<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: agent count, strategies, planner limits, seed, …
/// - [`Grid`]: the floor (e.g. from [`Grid::with_layout`])
/// - a goal source, lent to [`build`](Self::build)
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                              |
/// |-----------------|------------------------------------------------------|
/// | `.resolver(r)`  | `ConflictResolver::from_config(&config)`             |
/// | `.agents(v)`    | `config.agent_count` agents spawned from the goals   |
/// | `.table(t)`     | Empty `ReservationTable`                             |
///
/// Agents passed with `.agents(v)` are taken as-is: their paths are *not*
/// committed to the ledger, so pass a matching `.table(t)` if they should
/// be.
///
/// # Example
///
/// ```rust,ignore
/// let mut rng = SimRng::new(config.seed);
/// let grid = Grid::with_layout(&config, &mut rng.child(1))?;
/// let mut goals = TaskManager::from_config(&config, rng.child(2))?;
/// let mut world = WorldBuilder::new(config, grid).build(&mut goals)?;
/// world.run(&mut goals, &mut NoopObserver);
/// ```
pub struct WorldBuilder<P: Planner = SpaceTimeAStar> {
    config:   SimConfig,
    grid:     Grid,
    planner:  P,
    resolver: Option<ConflictResolver>,
    agents:   Option<Vec<Agent>>,
    table:    Option<ReservationTable>,
}

impl WorldBuilder<SpaceTimeAStar> {
    /// Builder using space-time A* with the config's horizon and budget.
    pub fn new(config: SimConfig, grid: Grid) -> Self {
        let planner = SpaceTimeAStar::from_config(&config);
        Self::with_planner(config, grid, planner)
    }
}

impl<P: Planner> WorldBuilder<P> {
    pub fn with_planner(config: SimConfig, grid: Grid, planner: P) -> Self {
        Self {
            config,
            grid,
            planner,
            resolver: None,
            agents:   None,
            table:    None,
        }
    }

    pub fn resolver(mut self, resolver: ConflictResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Supply the agents directly (must be length `agent_count`, with
    /// `agents[i].id == AgentId(i)` and distinct positions).
    pub fn agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = Some(agents);
        self
    }

    pub fn table(mut self, table: ReservationTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Validate inputs, spawn agents if none were supplied, and return a
    /// ready-to-run [`World`] at tick 0.
    pub fn build<G: GoalSource + ?Sized>(self, goals: &mut G) -> SimResult<World<P>> {
        self.config.validate()?;

        let mut table = self.table.unwrap_or_default();
        let resolver = self.resolver.unwrap_or_else(|| ConflictResolver::from_config(&self.config));

        let agents = match self.agents {
            Some(agents) => {
                validate_agents(&agents, self.config.agent_count)?;
                agents
            }
            None => spawn_agents(&self.config, &self.grid, &self.planner, &mut table, goals)?,
        };

        tracing::info!(
            agents = agents.len(),
            width = self.grid.width(),
            height = self.grid.height(),
            stepping = %self.config.stepping,
            goal_strategy = %self.config.goal_strategy,
            conflict_strategy = %self.config.conflict_strategy,
            seed = self.config.seed,
            "world ready"
        );

        Ok(World {
            stepping: self.config.stepping,
            config:   self.config,
            grid:     self.grid,
            table,
            planner:  self.planner,
            resolver,
            agents,
            tick:     Tick::ZERO,
        })
    }
}

fn validate_agents(agents: &[Agent], expected: usize) -> SimResult<()> {
    if agents.len() != expected {
        return Err(SimError::AgentCountMismatch {
            expected,
            got:  agents.len(),
            what: "agents",
        });
    }
    let mut seen = FxHashSet::default();
    for (i, agent) in agents.iter().enumerate() {
        if agent.id.index() != i {
            return Err(SimError::Config(format!("agent at index {i} has id {}", agent.id)));
        }
        if !seen.insert(agent.current_position()) {
            return Err(SimError::Config(format!(
                "{} starts on {} which another agent already occupies",
                agent.id,
                agent.current_position()
            )));
        }
    }
    Ok(())
}

/// Place `config.agent_count` agents on distinct free cells, give each a
/// goal, and commit its initial path departing at tick 0.
///
/// Starts are drawn from the goal source (so they respect its strategy and
/// never coincide with a goal already handed out) and released once the
/// agent's path is committed.
fn spawn_agents<G, P>(
    config:  &SimConfig,
    grid:    &Grid,
    planner: &P,
    table:   &mut ReservationTable,
    goals:   &mut G,
) -> SimResult<Vec<Agent>>
where
    G: GoalSource + ?Sized,
    P: Planner,
{
    let mut used: FxHashSet<Cell> = FxHashSet::default();
    let mut agents = Vec::with_capacity(config.agent_count);

    for i in 0..config.agent_count {
        let id = AgentId::try_from(i).map_err(|_| SimError::Config(format!("agent index {i} out of range")))?;
        let start = draw_start(grid, goals, &used)
            .ok_or(SimError::NoStartCell { agent: id, attempts: SPAWN_ATTEMPTS })?;
        used.insert(start);
        table.reserve_cell(start, Tick::ZERO, id);

        let mut session = PlanSession::new(planner, grid, table, Tick::ZERO, config.goal_dwell_ticks);
        let goal = goals.get_goal(grid, start);
        let agent = if goal == start {
            Agent::new(id, start, None, None)
        } else {
            match session.plan_and_reserve(id, start, goal) {
                Some(path) => Agent::new(id, start, Some(goal), Some(path)),
                None => {
                    goals.release_goal(goal);
                    Agent::new(id, start, None, None)
                }
            }
        };
        goals.release_goal(start);

        tracing::debug!(agent = %id, %start, goal = ?agent.goal(), state = %agent.state(), "spawned");
        agents.push(agent);
    }
    Ok(agents)
}

fn draw_start<G: GoalSource + ?Sized>(grid: &Grid, goals: &mut G, used: &FxHashSet<Cell>) -> Option<Cell> {
    let origin = Cell::new(0, 0);
    for _ in 0..SPAWN_ATTEMPTS {
        let cell = goals.get_goal(grid, origin);
        if grid.is_free(cell) && !used.contains(&cell) {
            return Some(cell);
        }
        goals.release_goal(cell);
    }
    None
}
