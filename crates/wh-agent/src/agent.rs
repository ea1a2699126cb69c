//! The `Agent` state machine.

use wh_core::{AgentId, Cell};
use wh_plan::{Path, PlanSession, Planner};
use wh_task::GoalSource;

use crate::{AgentState, UpdateOutcome};

/// A single robot.
///
/// `cursor` indexes the agent's current cell within `path`; the next cell
/// it will try to enter is `path[cursor + 1]`.  `goal` is the destination
/// the agent holds a claim on in the goal source, `None` when it holds none.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,
    position:        Cell,
    goal:            Option<Cell>,
    path:            Option<Path>,
    cursor:          usize,
    state:           AgentState,
    completed_tasks: u32,
    awaiting:        bool,
    /// Reached its last goal; the next successful reassignment credits a task.
    arrived:         bool,
}

impl Agent {
    /// An agent at `position`.  With a path it starts `Moving`; without one
    /// it starts `Idle` and awaits reassignment on its first update.
    pub fn new(id: AgentId, position: Cell, goal: Option<Cell>, path: Option<Path>) -> Self {
        let mut agent = Self {
            id,
            position,
            goal,
            path:            None,
            cursor:          0,
            state:           AgentState::Idle,
            completed_tasks: 0,
            awaiting:        true,
            arrived:         false,
        };
        if let Some(p) = path {
            agent.set_path(p);
        }
        agent
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn current_position(&self) -> Cell {
        self.position
    }

    #[inline]
    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    #[inline]
    pub fn completed_tasks(&self) -> u32 {
        self.completed_tasks
    }

    #[inline]
    pub fn is_awaiting_reassignment(&self) -> bool {
        self.awaiting
    }

    /// The cell this agent wants to enter next, if it is following a path
    /// with steps left.
    pub fn next_cell(&self) -> Option<Cell> {
        if !self.state.is_active() {
            return None;
        }
        self.path.as_ref().and_then(|p| p.get(self.cursor + 1))
    }

    pub fn remaining_steps(&self) -> usize {
        self.path.as_ref().map_or(0, |p| p.len() - 1 - self.cursor.min(p.len() - 1))
    }

    // ── Transitions driven by the stepping protocol ───────────────────────

    /// Step onto the next cell of the path.  Returns the new position, or
    /// `None` if there is no next cell.
    pub fn advance(&mut self) -> Option<Cell> {
        let next = self.next_cell()?;
        self.position = next;
        self.cursor += 1;
        self.state = AgentState::Moving;
        Some(next)
    }

    /// Mark the agent blocked for this tick.
    pub fn block(&mut self) {
        if self.state.is_active() {
            self.state = AgentState::Waiting;
        }
    }

    /// Drop the current path and wait for reassignment.  The claimed goal
    /// is kept so the next update can release it; no task is credited.
    pub fn abandon(&mut self) {
        self.path = None;
        self.cursor = 0;
        self.state = AgentState::Idle;
        self.awaiting = true;
        self.arrived = false;
    }

    /// Start following `path` towards `goal`.  The path must begin at the
    /// agent's current cell.
    pub fn adopt_path(&mut self, goal: Cell, path: Path) {
        debug_assert_eq!(path.start(), self.position, "path must start at the agent's cell");
        self.goal = Some(goal);
        self.set_path(path);
    }

    fn set_path(&mut self, path: Path) {
        self.path = Some(path);
        self.cursor = 0;
        self.state = AgentState::Moving;
        self.awaiting = false;
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Per-tick hook, run after the movement phase.
    ///
    /// An agent that has reached the end of its path becomes idle and
    /// awaits reassignment.  An idle agent awaiting reassignment releases
    /// its old goal, draws a new one, and plans to it.  A new goal equal to
    /// the agent's own cell means there is nothing to do; the agent stays
    /// idle and tries again next tick.
    pub fn update<G, P>(&mut self, goals: &mut G, session: &mut PlanSession<'_, P>) -> UpdateOutcome
    where
        G: GoalSource + ?Sized,
        P: Planner + ?Sized,
    {
        if self.state.is_active() && self.remaining_steps() == 0 {
            self.path = None;
            self.cursor = 0;
            self.state = AgentState::Idle;
            self.awaiting = true;
            self.arrived = true;
        }

        if self.state != AgentState::Idle || !self.awaiting {
            return UpdateOutcome::Unchanged;
        }

        if let Some(old) = self.goal.take() {
            goals.release_goal(old);
        }
        let start = self.position;
        let target = goals.get_goal(session.grid, start);
        if target == start {
            return UpdateOutcome::NoGoal;
        }

        match session.plan_and_reserve(self.id, start, target) {
            Some(path) => {
                if self.arrived {
                    self.completed_tasks += 1;
                    self.arrived = false;
                }
                tracing::info!(
                    agent = %self.id,
                    tick = %session.depart,
                    from = %start,
                    to = %target,
                    completed = self.completed_tasks,
                    "reassigned"
                );
                self.adopt_path(target, path);
                UpdateOutcome::Reassigned
            }
            None => {
                goals.release_goal(target);
                UpdateOutcome::NoPath
            }
        }
    }

    /// Swap the current task for a fresh goal and path from the current
    /// cell, keeping the old path if that fails.
    ///
    /// On success the abandoned goal is released.  On failure the freshly
    /// claimed goal is released instead.  Returns `true` on success.
    pub fn replan<G, P>(&mut self, goals: &mut G, session: &mut PlanSession<'_, P>) -> bool
    where
        G: GoalSource + ?Sized,
        P: Planner + ?Sized,
    {
        let start = self.position;
        let target = goals.get_goal(session.grid, start);
        if target == start {
            return false;
        }
        match session.plan_and_reserve(self.id, start, target) {
            Some(path) => {
                if let Some(old) = self.goal {
                    goals.release_goal(old);
                }
                self.adopt_path(target, path);
                true
            }
            None => {
                goals.release_goal(target);
                false
            }
        }
    }
}
