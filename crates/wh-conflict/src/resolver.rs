//! The conflict resolver and its per-agent counters.

use rustc_hash::FxHashMap;

use wh_core::{AgentId, ConflictStrategyKind, SimConfig};

use crate::ResolutionAction;

/// Retry and cooldown counters for one agent.  Created on first contact.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConflictState {
    pub retries:            u32,
    pub cooldown_remaining: u32,
}

#[derive(Clone, Debug)]
pub struct ConflictResolver {
    strategy:    ConflictStrategyKind,
    max_retries: u32,
    cooldown:    u32,
    states:      FxHashMap<AgentId, ConflictState>,
}

impl ConflictResolver {
    pub fn new(strategy: ConflictStrategyKind, max_retries: u32, cooldown: u32) -> Self {
        Self { strategy, max_retries, cooldown, states: FxHashMap::default() }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.conflict_strategy, config.max_retries, config.cooldown_ticks)
    }

    #[inline]
    pub fn strategy(&self) -> ConflictStrategyKind {
        self.strategy
    }

    #[inline]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[inline]
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Decide what `agent` does about being blocked this tick.
    ///
    /// An armed cooldown always wins over the strategy.
    pub fn resolve(&mut self, agent: AgentId) -> ResolutionAction {
        let state = self.states.entry(agent).or_default();

        if state.cooldown_remaining > 0 {
            state.cooldown_remaining -= 1;
            return ResolutionAction::Wait;
        }

        match self.strategy {
            ConflictStrategyKind::WaitThenReplan => {
                if state.retries < self.max_retries {
                    state.retries += 1;
                    ResolutionAction::Wait
                } else {
                    state.retries = 0;
                    state.cooldown_remaining = self.cooldown;
                    ResolutionAction::Replan
                }
            }
            ConflictStrategyKind::AlwaysWait   => ResolutionAction::Wait,
            ConflictStrategyKind::AlwaysReplan => ResolutionAction::Replan,
            ConflictStrategyKind::IdleOnBlock  => ResolutionAction::Idle,
        }
    }

    /// Clear `agent`'s counters.  Agents never seen are left untracked.
    pub fn reset(&mut self, agent: AgentId) {
        if let Some(state) = self.states.get_mut(&agent) {
            *state = ConflictState::default();
        }
    }

    /// Counters for `agent`, if it has ever been blocked.
    pub fn state(&self, agent: AgentId) -> Option<ConflictState> {
        self.states.get(&agent).copied()
    }

    /// Change strategy and thresholds mid-run.  `None` keeps the current
    /// value.  Existing per-agent counters are kept.
    pub fn reconfigure(
        &mut self,
        strategy:    Option<ConflictStrategyKind>,
        max_retries: Option<u32>,
        cooldown:    Option<u32>,
    ) {
        if let Some(s) = strategy {
            self.strategy = s;
        }
        if let Some(r) = max_retries {
            self.max_retries = r;
        }
        if let Some(c) = cooldown {
            self.cooldown = c;
        }
    }
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}
