use std::fmt;

/// The resolver's answer for one blocked tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionAction {
    /// Stay put this tick and try the same move next tick.
    Wait,
    /// Pick a new goal and plan a fresh path from the current cell.
    Replan,
    /// Abandon the path and become idle, awaiting reassignment.
    Idle,
}

impl ResolutionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionAction::Wait   => "WAIT",
            ResolutionAction::Replan => "REPLAN",
            ResolutionAction::Idle   => "IDLE",
        }
    }
}

impl fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
