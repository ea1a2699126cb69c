//! Per-tick counters, the run summary, and block reasons.

use std::collections::BTreeMap;
use std::fmt;

use wh_agent::UpdateOutcome;
use wh_core::{AgentId, Tick};

/// What happened during one step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// The tick the world reached with this step.
    pub tick:       Tick,
    /// Agents that advanced one cell.
    pub moved:      usize,
    /// Agents that wanted to move and were refused.
    pub blocked:    usize,
    /// Blocked agents that switched to a new goal and path.
    pub replanned:  usize,
    /// Blocked agents that abandoned their path.
    pub idled:      usize,
    /// Idle agents that picked up a new task.
    pub reassigned: usize,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    pub(crate) fn record_update(&mut self, outcome: UpdateOutcome) {
        if outcome == UpdateOutcome::Reassigned {
            self.reassigned += 1;
        }
    }
}

/// `{ tick, completed_tasks }` at the current point of the run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSummary {
    pub tick:            Tick,
    pub completed_tasks: BTreeMap<AgentId, u32>,
}

impl WorldSummary {
    pub fn total_completed(&self) -> u64 {
        self.completed_tasks.values().map(|&n| u64::from(n)).sum()
    }
}

/// Why a move was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockReason {
    /// Target cell is reserved by `owner` for the arrival tick.
    Reserved { owner: AgentId },
    /// `owner` booked the reverse traversal for the arrival tick.
    Swap { owner: AgentId },
    /// `agent` is on the target and not leaving this tick.
    Occupied { agent: AgentId },
    /// `winner` has the lower id among agents heading for the same cell.
    Contested { winner: AgentId },
    /// The move spans more than one cell.
    Jump,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Reserved { owner }   => write!(f, "cell reserved by {owner}"),
            BlockReason::Swap { owner }       => write!(f, "edge conflict with {owner}"),
            BlockReason::Occupied { agent }   => write!(f, "occupied by {agent}"),
            BlockReason::Contested { winner } => write!(f, "contested, won by {winner}"),
            BlockReason::Jump                 => f.write_str("jump detected"),
        }
    }
}
