//! Unit tests for wh-agent.

#[cfg(test)]
mod helpers {
    use std::collections::VecDeque;

    use wh_core::Cell;
    use wh_grid::Grid;
    use wh_task::GoalSource;

    /// Hands out goals from a fixed script and records releases.  An empty
    /// script answers with the start cell.
    #[derive(Default)]
    pub struct ScriptedGoals {
        pub script:   VecDeque<Cell>,
        pub released: Vec<Cell>,
    }

    impl ScriptedGoals {
        pub fn new(goals: &[(i32, i32)]) -> Self {
            Self { script: goals.iter().map(|&g| Cell::from(g)).collect(), released: vec![] }
        }
    }

    impl GoalSource for ScriptedGoals {
        fn get_goal(&mut self, _grid: &Grid, start: Cell) -> Cell {
            self.script.pop_front().unwrap_or(start)
        }

        fn release_goal(&mut self, cell: Cell) {
            self.released.push(cell);
        }
    }

    pub fn open(w: usize, h: usize) -> Grid {
        Grid::with_size(w, h, 1.0).unwrap()
    }
}

#[cfg(test)]
mod transitions {
    use wh_core::{AgentId, Cell, Tick};
    use wh_plan::Path;

    use crate::{Agent, AgentState};

    fn line() -> Path {
        Path::new(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)], Tick::ZERO).unwrap()
    }

    #[test]
    fn constructed_moving_with_a_path() {
        let a = Agent::new(AgentId(0), Cell::new(0, 0), Some(Cell::new(2, 0)), Some(line()));
        assert_eq!(a.state(), AgentState::Moving);
        assert!(!a.is_awaiting_reassignment());
        assert_eq!(a.next_cell(), Some(Cell::new(1, 0)));
        assert_eq!(a.remaining_steps(), 2);
    }

    #[test]
    fn constructed_idle_without_a_path() {
        let a = Agent::new(AgentId(1), Cell::new(3, 3), None, None);
        assert_eq!(a.state(), AgentState::Idle);
        assert!(a.is_awaiting_reassignment());
        assert_eq!(a.next_cell(), None);
        assert_eq!(a.remaining_steps(), 0);
    }

    #[test]
    fn block_then_advance() {
        let mut a = Agent::new(AgentId(0), Cell::new(0, 0), Some(Cell::new(2, 0)), Some(line()));
        a.block();
        assert_eq!(a.state(), AgentState::Waiting);
        assert_eq!(a.current_position(), Cell::new(0, 0));
        assert_eq!(a.next_cell(), Some(Cell::new(1, 0)));

        assert_eq!(a.advance(), Some(Cell::new(1, 0)));
        assert_eq!(a.state(), AgentState::Moving);
        assert_eq!(a.cursor(), 1);
        assert_eq!(a.advance(), Some(Cell::new(2, 0)));
        assert_eq!(a.advance(), None);
        assert_eq!(a.remaining_steps(), 0);
    }

    #[test]
    fn abandon_goes_idle() {
        let mut a = Agent::new(AgentId(0), Cell::new(0, 0), Some(Cell::new(2, 0)), Some(line()));
        a.advance();
        a.abandon();
        assert_eq!(a.state(), AgentState::Idle);
        assert!(a.is_awaiting_reassignment());
        assert!(a.path().is_none());
        assert_eq!(a.current_position(), Cell::new(1, 0));
        assert_eq!(a.goal(), Some(Cell::new(2, 0)));
        a.block();
        assert_eq!(a.state(), AgentState::Idle);
    }
}

#[cfg(test)]
mod update {
    use wh_core::{AgentId, Cell, Tick};
    use wh_plan::{Path, PlanSession, ReservationTable, SpaceTimeAStar};

    use super::helpers::{open, ScriptedGoals};
    use crate::{Agent, AgentState, UpdateOutcome};

    fn arrived_agent() -> Agent {
        let path = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0)], Tick::ZERO).unwrap();
        let mut a = Agent::new(AgentId(4), Cell::new(0, 0), Some(Cell::new(1, 0)), Some(path));
        a.advance();
        a
    }

    #[test]
    fn moving_agent_is_left_alone() {
        let g = open(5, 5);
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(1), 50);
        let path = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0)], Tick::ZERO).unwrap();
        let mut a = Agent::new(AgentId(0), Cell::new(0, 0), Some(Cell::new(1, 0)), Some(path));
        let mut goals = ScriptedGoals::new(&[(4, 4)]);
        assert_eq!(a.update(&mut goals, &mut s), UpdateOutcome::Unchanged);
        assert_eq!(goals.script.len(), 1);
    }

    #[test]
    fn arrival_then_reassignment_credits_a_task() {
        let g = open(5, 5);
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(1), 50);
        let mut goals = ScriptedGoals::new(&[(4, 0)]);

        let mut a = arrived_agent();
        assert_eq!(a.update(&mut goals, &mut s), UpdateOutcome::Reassigned);
        assert_eq!(goals.released, vec![Cell::new(1, 0)]);
        assert_eq!(a.completed_tasks(), 1);
        assert_eq!(a.state(), AgentState::Moving);
        assert_eq!(a.goal(), Some(Cell::new(4, 0)));
        let path = a.path().unwrap();
        assert_eq!(path.depart(), Tick(1));
        assert_eq!(path.start(), Cell::new(1, 0));
        assert_eq!(t.owner_at(Cell::new(4, 0), Tick(4)), Some(AgentId(4)));
    }

    #[test]
    fn fallback_goal_stays_idle_without_credit() {
        let g = open(5, 5);
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(1), 50);
        let mut goals = ScriptedGoals::default();

        let mut a = arrived_agent();
        assert_eq!(a.update(&mut goals, &mut s), UpdateOutcome::NoGoal);
        assert_eq!(a.state(), AgentState::Idle);
        assert!(a.is_awaiting_reassignment());
        assert_eq!(a.completed_tasks(), 0);
        assert_eq!(a.goal(), None);

        // The next attempt releases nothing: no claim is held.
        goals.script.push_back(Cell::new(3, 3));
        assert_eq!(a.update(&mut goals, &mut s), UpdateOutcome::Reassigned);
        assert_eq!(goals.released, vec![Cell::new(1, 0)]);
        assert_eq!(a.completed_tasks(), 1);
    }

    #[test]
    fn unreachable_goal_is_released() {
        let mut g = open(5, 5);
        for y in 0..5 {
            g.block(Cell::new(2, y));
        }
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(1), 50);
        let mut goals = ScriptedGoals::new(&[(4, 4)]);

        let mut a = arrived_agent();
        assert_eq!(a.update(&mut goals, &mut s), UpdateOutcome::NoPath);
        assert_eq!(goals.released, vec![Cell::new(1, 0), Cell::new(4, 4)]);
        assert_eq!(a.state(), AgentState::Idle);
        assert!(a.is_awaiting_reassignment());
        assert_eq!(s.table.cell_count(), 0);
    }

    #[test]
    fn abandoned_task_is_not_credited() {
        let g = open(5, 5);
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(0), 50);
        let mut goals = ScriptedGoals::new(&[(0, 4)]);

        let path = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0)], Tick::ZERO).unwrap();
        let mut a = Agent::new(AgentId(0), Cell::new(0, 0), Some(Cell::new(1, 0)), Some(path));
        a.abandon();
        assert_eq!(a.update(&mut goals, &mut s), UpdateOutcome::Reassigned);
        assert_eq!(a.completed_tasks(), 0);
        assert_eq!(goals.released, vec![Cell::new(1, 0)]);
    }
}

#[cfg(test)]
mod replan {
    use wh_core::{AgentId, Cell, Tick};
    use wh_plan::{Path, PlanSession, ReservationTable, SpaceTimeAStar};

    use super::helpers::{open, ScriptedGoals};
    use crate::{Agent, AgentState};

    fn agent() -> Agent {
        let path = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)], Tick::ZERO).unwrap();
        Agent::new(AgentId(2), Cell::new(0, 0), Some(Cell::new(2, 0)), Some(path))
    }

    #[test]
    fn success_swaps_goal_and_path() {
        let g = open(5, 5);
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(3), 50);
        let mut goals = ScriptedGoals::new(&[(0, 3)]);

        let mut a = agent();
        a.block();
        assert!(a.replan(&mut goals, &mut s));
        assert_eq!(goals.released, vec![Cell::new(2, 0)]);
        assert_eq!(a.goal(), Some(Cell::new(0, 3)));
        assert_eq!(a.state(), AgentState::Moving);
        assert_eq!(a.cursor(), 0);
        assert_eq!(a.path().map(|p| p.depart()), Some(Tick(3)));
        assert_eq!(a.completed_tasks(), 0);
    }

    #[test]
    fn failure_keeps_old_path_and_releases_new_claim() {
        let mut g = open(5, 5);
        g.block(Cell::new(4, 4));
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(3), 50);
        let mut goals = ScriptedGoals::new(&[(4, 4)]);

        let mut a = agent();
        assert!(!a.replan(&mut goals, &mut s));
        assert_eq!(goals.released, vec![Cell::new(4, 4)]);
        assert_eq!(a.goal(), Some(Cell::new(2, 0)));
        assert_eq!(a.next_cell(), Some(Cell::new(1, 0)));
    }

    #[test]
    fn no_goal_changes_nothing() {
        let g = open(5, 5);
        let mut t = ReservationTable::new();
        let planner = SpaceTimeAStar::default();
        let mut s = PlanSession::new(&planner, &g, &mut t, Tick(3), 50);
        let mut goals = ScriptedGoals::default();

        let mut a = agent();
        assert!(!a.replan(&mut goals, &mut s));
        assert!(goals.released.is_empty());
        assert_eq!(a.goal(), Some(Cell::new(2, 0)));
    }
}
