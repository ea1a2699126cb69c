//! Integration tests for wh-sim.

use std::collections::HashSet;

use wh_agent::{Agent, AgentState};
use wh_conflict::{ConflictResolver, ConflictState};
use wh_core::{AgentId, Cell, ConflictStrategyKind, SimConfig, SteppingKind, Tick};
use wh_grid::Grid;
use wh_plan::{Path, ReservationTable};
use wh_task::GoalSource;

use crate::{warehouse, NoopObserver, SimError, SimObserver, TickReport, World, WorldBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A 15 m × 10 m floor at 0.5 m (30 × 20 cells) with a handful of pallets.
fn small_config(agents: usize, stepping: SteppingKind, seed: u64) -> SimConfig {
    SimConfig {
        warehouse_width_m:  15.0,
        warehouse_height_m: 10.0,
        pallet_count:       6,
        agent_count:        agents,
        max_ticks:          60,
        stepping,
        seed,
        ..SimConfig::default()
    }
}

/// Goal source that never has anything to hand out.
struct NoGoals;

impl GoalSource for NoGoals {
    fn get_goal(&mut self, _grid: &Grid, start: Cell) -> Cell {
        start
    }

    fn release_goal(&mut self, _cell: Cell) {}
}

fn c(x: i32, y: i32) -> Cell {
    Cell::new(x, y)
}

/// An agent already following `cells` from tick 0.
fn scripted(id: u32, cells: &[(i32, i32)]) -> Agent {
    let cells: Vec<Cell> = cells.iter().copied().map(Cell::from).collect();
    let goal = *cells.last().unwrap();
    let path = Path::new(cells, Tick::ZERO).unwrap();
    Agent::new(AgentId(id), path.start(), Some(goal), Some(path))
}

/// 10 × 10 open floor, agents taken as given, nothing in the ledger.
fn scripted_world(agents: Vec<Agent>, stepping: SteppingKind, conflict: ConflictStrategyKind) -> World {
    let config = SimConfig {
        agent_count: agents.len(),
        stepping,
        conflict_strategy: conflict,
        ..SimConfig::default()
    };
    let grid = Grid::with_size(10, 10, 1.0).unwrap();
    WorldBuilder::new(config, grid).agents(agents).build(&mut NoGoals).unwrap()
}

/// Goal source holding a single cell; hands it out once, then has nothing.
struct OneGoal(Option<Cell>);

impl GoalSource for OneGoal {
    fn get_goal(&mut self, _grid: &Grid, start: Cell) -> Cell {
        self.0.take().unwrap_or(start)
    }

    fn release_goal(&mut self, _cell: Cell) {}
}

/// Agent 0 heads `(4,5) → (5,5)` while the ledger already gives `(5,5)` at
/// tick 1 to agent 1, which idles at `(8,8)`.
fn ledger_blocked_world(stepping: SteppingKind, resolver: ConflictResolver) -> World {
    let agents = vec![
        scripted(0, &[(4, 5), (5, 5), (6, 5)]),
        Agent::new(AgentId(1), c(8, 8), None, None),
    ];
    let mut table = ReservationTable::new();
    table.reserve_cell(c(5, 5), Tick(1), AgentId(1));
    table.reserve_cell(c(8, 8), Tick(0), AgentId(1));

    let config = SimConfig { agent_count: agents.len(), stepping, ..SimConfig::default() };
    let grid = Grid::with_size(10, 10, 1.0).unwrap();
    WorldBuilder::new(config, grid)
        .agents(agents)
        .table(table)
        .resolver(resolver)
        .build(&mut NoGoals)
        .unwrap()
}

fn position(world: &World, id: u32) -> Cell {
    world.agent(AgentId(id)).unwrap().current_position()
}

const BOTH: [SteppingKind; 2] = [SteppingKind::Sequential, SteppingKind::TwoPhase];

/// Records every frame and flags collisions, swaps and jumps.
#[derive(Default)]
struct Audit {
    last:       Option<Vec<Cell>>,
    frames:     usize,
    ticks:      usize,
    ended:      Vec<Tick>,
    violations: Vec<String>,
}

impl SimObserver for Audit {
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {
        self.ticks += 1;
    }

    fn on_frame(&mut self, tick: Tick, agents: &[Agent]) {
        self.frames += 1;
        let now: Vec<Cell> = agents.iter().map(|a| a.current_position()).collect();

        let distinct: HashSet<Cell> = now.iter().copied().collect();
        if distinct.len() != now.len() {
            self.violations.push(format!("{tick}: two agents share a cell: {now:?}"));
        }

        if let Some(prev) = &self.last {
            for i in 0..now.len() {
                if prev[i].manhattan(now[i]) > 1 {
                    self.violations.push(format!("{tick}: agent {i} jumped {} -> {}", prev[i], now[i]));
                }
                for j in (i + 1)..now.len() {
                    if now[i] != prev[i] && now[i] == prev[j] && now[j] == prev[i] {
                        self.violations.push(format!("{tick}: agents {i} and {j} swapped"));
                    }
                }
            }
        }
        self.last = Some(now);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended.push(final_tick);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn agent_count_mismatch_errors() {
        let config = SimConfig { agent_count: 3, ..SimConfig::default() };
        let grid = Grid::with_size(10, 10, 1.0).unwrap();
        let agents = vec![scripted(0, &[(1, 1)]), scripted(1, &[(2, 2)])];
        let err = WorldBuilder::new(config, grid).agents(agents).build(&mut NoGoals).err().unwrap();
        assert!(matches!(err, SimError::AgentCountMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn shared_start_cell_errors() {
        let config = SimConfig { agent_count: 2, ..SimConfig::default() };
        let grid = Grid::with_size(10, 10, 1.0).unwrap();
        let agents = vec![scripted(0, &[(1, 1)]), scripted(1, &[(1, 1)])];
        let err = WorldBuilder::new(config, grid).agents(agents).build(&mut NoGoals).err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn out_of_order_ids_error() {
        let config = SimConfig { agent_count: 2, ..SimConfig::default() };
        let grid = Grid::with_size(10, 10, 1.0).unwrap();
        let agents = vec![scripted(1, &[(1, 1)]), scripted(0, &[(2, 2)])];
        let err = WorldBuilder::new(config, grid).agents(agents).build(&mut NoGoals).err().unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig { resolution_m: 0.0, ..SimConfig::default() };
        assert!(matches!(warehouse(&config).err().unwrap(), SimError::Core(_)));
    }

    #[test]
    fn no_free_cell_for_starts() {
        // A 3 × 3 floor has 9 cells; ask for far more agents than fit.
        let config = SimConfig { agent_count: 20, ..SimConfig::default() };
        let grid = Grid::with_size(3, 3, 1.0).unwrap();
        let mut goals = wh_task::TaskManager::from_config(&config, wh_core::SimRng::new(1)).unwrap();
        let err = WorldBuilder::new(config, grid).build(&mut goals).err().unwrap();
        assert!(matches!(err, SimError::NoStartCell { .. }));
    }

    #[test]
    fn spawned_agents_are_distinct_and_reserved() {
        let config = small_config(6, SteppingKind::Sequential, 7);
        let (world, goals) = warehouse(&config).unwrap();
        assert_eq!(world.agents().len(), 6);
        assert_eq!(world.tick(), Tick::ZERO);

        let starts: HashSet<Cell> = world.agents().iter().map(|a| a.current_position()).collect();
        assert_eq!(starts.len(), 6);

        for agent in world.agents() {
            let start = agent.current_position();
            assert!(world.grid().is_free(start));
            assert_eq!(world.table().owner_at(start, Tick::ZERO), Some(agent.id));
            if let Some(goal) = agent.goal() {
                assert!(goals.is_claimed(goal));
                assert_eq!(agent.state(), AgentState::Moving);
                assert_eq!(agent.path().unwrap().goal(), goal);
            }
        }

        // Start claims are released once spawning is done; only goals stay.
        let with_goal = world.agents().iter().filter(|a| a.goal().is_some()).count();
        assert_eq!(goals.claimed().len(), with_goal);
    }
}

// ── Stepping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stepping_tests {
    use super::*;

    #[test]
    fn lower_id_wins_contested_cell() {
        for stepping in BOTH {
            let mut world = scripted_world(
                vec![scripted(0, &[(4, 5), (5, 5)]), scripted(1, &[(6, 5), (5, 5)])],
                stepping,
                ConflictStrategyKind::WaitThenReplan,
            );
            let report = world.step(&mut NoGoals);

            assert_eq!(report.tick, Tick(1), "{stepping}");
            assert_eq!(report.moved, 1, "{stepping}");
            assert_eq!(report.blocked, 1, "{stepping}");
            assert_eq!(position(&world, 0), c(5, 5), "{stepping}");
            assert_eq!(position(&world, 1), c(6, 5), "{stepping}");
            assert_eq!(world.agent(AgentId(1)).unwrap().state(), AgentState::Waiting);
            assert_eq!(world.resolver().state(AgentId(1)).unwrap().retries, 1);
        }
    }

    #[test]
    fn head_on_swap_is_refused() {
        for stepping in BOTH {
            let mut world = scripted_world(
                vec![scripted(0, &[(4, 5), (5, 5)]), scripted(1, &[(5, 5), (4, 5)])],
                stepping,
                ConflictStrategyKind::AlwaysWait,
            );
            let report = world.step(&mut NoGoals);
            assert_eq!(report.moved, 0, "{stepping}");
            assert_eq!(report.blocked, 2, "{stepping}");
            assert_eq!(position(&world, 0), c(4, 5));
            assert_eq!(position(&world, 1), c(5, 5));
        }
    }

    #[test]
    fn follower_moves_into_vacated_cell() {
        for stepping in BOTH {
            let mut world = scripted_world(
                vec![scripted(0, &[(5, 5), (6, 5)]), scripted(1, &[(4, 5), (5, 5)])],
                stepping,
                ConflictStrategyKind::AlwaysWait,
            );
            assert_eq!(world.step(&mut NoGoals).moved, 2, "{stepping}");
            assert_eq!(position(&world, 0), c(6, 5));
            assert_eq!(position(&world, 1), c(5, 5));
        }
    }

    #[test]
    fn two_phase_lets_lower_id_follow_higher_id() {
        // Agent 0 trails agent 1.  Sequential checks agent 0 before agent 1
        // has left; two-phase retries it after agent 1 commits.
        let agents = || vec![scripted(0, &[(4, 5), (5, 5)]), scripted(1, &[(5, 5), (6, 5)])];

        let mut seq = scripted_world(agents(), SteppingKind::Sequential, ConflictStrategyKind::AlwaysWait);
        assert_eq!(seq.step(&mut NoGoals).moved, 1);
        assert_eq!(position(&seq, 0), c(4, 5));

        let mut two = scripted_world(agents(), SteppingKind::TwoPhase, ConflictStrategyKind::AlwaysWait);
        assert_eq!(two.step(&mut NoGoals).moved, 2);
        assert_eq!(position(&two, 0), c(5, 5));
        assert_eq!(position(&two, 1), c(6, 5));
    }

    #[test]
    fn rotation_cycle_stays_put_under_two_phase() {
        let mut world = scripted_world(
            vec![
                scripted(0, &[(4, 4), (5, 4)]),
                scripted(1, &[(5, 4), (5, 5)]),
                scripted(2, &[(5, 5), (4, 5)]),
                scripted(3, &[(4, 5), (4, 4)]),
            ],
            SteppingKind::TwoPhase,
            ConflictStrategyKind::AlwaysWait,
        );
        let report = world.step(&mut NoGoals);
        assert_eq!(report.moved, 0);
        assert_eq!(report.blocked, 4);
    }

    #[test]
    fn idle_on_block_abandons_path() {
        for stepping in BOTH {
            let mut world = scripted_world(
                vec![scripted(0, &[(4, 5), (5, 5)]), scripted(1, &[(5, 5), (4, 5)])],
                stepping,
                ConflictStrategyKind::IdleOnBlock,
            );
            let report = world.step(&mut NoGoals);
            assert_eq!(report.idled, 2, "{stepping}");
            for agent in world.agents() {
                assert_eq!(agent.state(), AgentState::Idle);
                assert!(agent.path().is_none());
                assert!(agent.is_awaiting_reassignment());
            }
        }
    }

    #[test]
    fn arrival_frees_agent_for_reassignment() {
        let mut world = scripted_world(
            vec![scripted(0, &[(1, 1), (2, 1), (3, 1)])],
            SteppingKind::Sequential,
            ConflictStrategyKind::WaitThenReplan,
        );
        world.step(&mut NoGoals);
        assert_eq!(world.agents()[0].state(), AgentState::Moving);
        world.step(&mut NoGoals);
        let agent = &world.agents()[0];
        assert_eq!(agent.current_position(), c(3, 1));
        assert_eq!(agent.state(), AgentState::Idle);
        assert!(agent.is_awaiting_reassignment());
        assert_eq!(world.tick(), Tick(2));
    }

    #[test]
    fn reserved_target_triggers_replan() {
        for stepping in BOTH {
            let resolver = ConflictResolver::new(ConflictStrategyKind::AlwaysReplan, 3, 2);
            let mut world = ledger_blocked_world(stepping, resolver);
            let report = world.step(&mut OneGoal(Some(c(0, 0))));

            assert_eq!(report.moved, 0, "{stepping}");
            assert_eq!(report.blocked, 1, "{stepping}");
            assert_eq!(report.replanned, 1, "{stepping}");

            let agent = world.agent(AgentId(0)).unwrap();
            assert_eq!(agent.current_position(), c(4, 5), "{stepping}");
            assert_eq!(agent.goal(), Some(c(0, 0)), "{stepping}");
            assert_eq!(agent.state(), AgentState::Moving, "{stepping}");
            let path = agent.path().unwrap();
            assert_eq!(path.start(), c(4, 5));
            assert_eq!(path.goal(), c(0, 0));
            // Replans depart at the tick the world just reached.
            assert_eq!(path.depart(), Tick(1));

            assert_eq!(world.resolver().state(AgentId(0)), Some(ConflictState::default()), "{stepping}");
            assert_eq!(world.table().owner_at(c(5, 5), Tick(1)), Some(AgentId(1)));
        }
    }

    #[test]
    fn successful_replan_clears_cooldown() {
        for stepping in BOTH {
            // No retries: the first block replans and arms a 2-tick cooldown.
            let resolver = ConflictResolver::new(ConflictStrategyKind::WaitThenReplan, 0, 2);
            let mut world = ledger_blocked_world(stepping, resolver);
            let report = world.step(&mut OneGoal(Some(c(0, 0))));

            assert_eq!(report.replanned, 1, "{stepping}");
            assert_eq!(world.resolver().state(AgentId(0)), Some(ConflictState::default()), "{stepping}");
        }
    }

    #[test]
    fn failed_replan_keeps_old_path_and_waits() {
        for stepping in BOTH {
            let resolver = ConflictResolver::new(ConflictStrategyKind::AlwaysReplan, 3, 2);
            let mut world = ledger_blocked_world(stepping, resolver);
            let report = world.step(&mut NoGoals);

            assert_eq!(report.blocked, 1, "{stepping}");
            assert_eq!(report.replanned, 0, "{stepping}");
            let agent = world.agent(AgentId(0)).unwrap();
            assert_eq!(agent.current_position(), c(4, 5));
            assert_eq!(agent.goal(), Some(c(6, 5)));
            assert_eq!(agent.state(), AgentState::Waiting);
            assert_eq!(agent.next_cell(), Some(c(5, 5)));
        }
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn summary_is_pure() {
        let (mut world, mut goals) = warehouse(&small_config(4, SteppingKind::Sequential, 3)).unwrap();
        assert_eq!(world.summary(), world.get_summary());
        world.run_ticks(5, &mut goals, &mut NoopObserver);
        let a = world.summary();
        let b = world.summary();
        assert_eq!(a, b);
        assert_eq!(a.tick, Tick(5));
        assert_eq!(a.completed_tasks.len(), 4);
    }

    #[test]
    fn run_calls_observer_hooks() {
        let config = small_config(3, SteppingKind::TwoPhase, 11);
        let (mut world, mut goals) = warehouse(&config).unwrap();
        let mut audit = Audit::default();
        let summary = world.run(&mut goals, &mut audit);

        assert_eq!(summary.tick, Tick(config.max_ticks));
        assert_eq!(audit.ticks as u64, config.max_ticks);
        assert_eq!(audit.frames as u64, config.max_ticks + 1);
        assert_eq!(audit.ended, vec![Tick(config.max_ticks)]);
    }

    #[test]
    fn same_seed_same_run() {
        for stepping in BOTH {
            let config = small_config(5, stepping, 99);
            let (mut a, mut ga) = warehouse(&config).unwrap();
            let (mut b, mut gb) = warehouse(&config).unwrap();
            assert_eq!(a.run(&mut ga, &mut NoopObserver), b.run(&mut gb, &mut NoopObserver));
            assert_eq!(a.positions(), b.positions());
        }
    }

    #[test]
    fn agents_complete_tasks() {
        let config = SimConfig { max_ticks: 200, ..small_config(4, SteppingKind::Sequential, 5) };
        let (mut world, mut goals) = warehouse(&config).unwrap();
        let summary = world.run(&mut goals, &mut NoopObserver);
        assert!(summary.total_completed() > 0);
    }

    #[test]
    fn prune_drops_past_entries() {
        let (mut world, mut goals) = warehouse(&small_config(4, SteppingKind::Sequential, 8)).unwrap();
        world.run_ticks(10, &mut goals, &mut NoopObserver);
        let before = world.table().cell_count();
        let removed = world.prune_reservations();
        assert!(removed > 0);
        assert!(world.table().cell_count() < before);
        assert!(world.table().owner_at(world.positions()[0].1, Tick(9)).is_none());
    }

    #[test]
    fn resolver_can_be_reconfigured_mid_run() {
        let (mut world, mut goals) = warehouse(&small_config(4, SteppingKind::Sequential, 12)).unwrap();
        world.run_ticks(5, &mut goals, &mut NoopObserver);
        world.resolver_mut().reconfigure(Some(ConflictStrategyKind::AlwaysReplan), None, Some(0));
        assert_eq!(world.resolver().strategy(), ConflictStrategyKind::AlwaysReplan);
        world.run_ticks(5, &mut goals, &mut NoopObserver);
        assert_eq!(world.tick(), Tick(10));
    }
}

// ── Collision freedom ─────────────────────────────────────────────────────────

#[cfg(test)]
mod safety_props {
    use super::*;
    use proptest::prelude::*;

    fn stepping_strategy() -> impl Strategy<Value = SteppingKind> {
        prop_oneof![Just(SteppingKind::Sequential), Just(SteppingKind::TwoPhase)]
    }

    fn conflict_strategy() -> impl Strategy<Value = ConflictStrategyKind> {
        prop_oneof![
            Just(ConflictStrategyKind::WaitThenReplan),
            Just(ConflictStrategyKind::AlwaysWait),
            Just(ConflictStrategyKind::AlwaysReplan),
            Just(ConflictStrategyKind::IdleOnBlock),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// No two agents ever share a cell, swap, or move more than one cell.
        #[test]
        fn prop_no_collisions(
            seed in 0u64..10_000,
            agents in 1usize..10,
            stepping in stepping_strategy(),
            conflict in conflict_strategy(),
        ) {
            let config = SimConfig {
                conflict_strategy: conflict,
                ..small_config(agents, stepping, seed)
            };
            let (mut world, mut goals) = warehouse(&config).unwrap();
            let mut audit = Audit::default();
            world.run(&mut goals, &mut audit);
            prop_assert!(audit.violations.is_empty(), "{:?}", audit.violations);
        }
    }
}
