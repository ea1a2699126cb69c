//! Setup-time error type.
//!
//! Nothing in here is raised while the simulation is stepping: blocked moves,
//! unreachable goals, and exhausted sampling budgets are ordinary return
//! values in the crates that produce them.  `WhError` covers the conditions
//! that must fail fast while the world is being constructed.

use thiserror::Error;

/// The top-level error type for `wh-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum WhError {
    #[error("unknown {kind} '{name}'")]
    UnknownStrategy { kind: &'static str, name: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for setup code in all `wh-*` crates.
pub type WhResult<T> = Result<T, WhError>;
