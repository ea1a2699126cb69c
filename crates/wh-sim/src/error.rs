use thiserror::Error;

use wh_core::{AgentId, WhError};
use wh_grid::GridError;
use wh_task::TaskError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("no free start cell for {agent} after {attempts} attempts")]
    NoStartCell { agent: AgentId, attempts: usize },

    #[error(transparent)]
    Core(#[from] WhError),

    #[error("floor layout error: {0}")]
    Grid(#[from] GridError),

    #[error("goal assignment error: {0}")]
    Task(#[from] TaskError),
}

pub type SimResult<T> = Result<T, SimError>;
