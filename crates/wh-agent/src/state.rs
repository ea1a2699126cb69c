use std::fmt;

/// Lifecycle state of an agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// No active path.
    Idle,
    /// Following its path.
    Moving,
    /// Blocked this tick; the cursor did not advance.
    Waiting,
}

impl AgentState {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Idle    => "IDLE",
            AgentState::Moving  => "MOVING",
            AgentState::Waiting => "WAITING",
        }
    }

    /// `true` for states that follow a path.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, AgentState::Moving | AgentState::Waiting)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What [`Agent::update`](crate::Agent::update) did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing to reassign: still on its path, or idle without waiting for
    /// a new task.
    Unchanged,
    /// Picked up a new goal and a committed path.
    Reassigned,
    /// The goal source had nothing to offer; still idle.
    NoGoal,
    /// A goal was drawn but no path to it exists right now; still idle.
    NoPath,
}
