//! Goal-selection strategies and their tuning.

use wh_core::{GoalStrategyKind, SimConfig};

use crate::{TaskError, TaskResult};

/// A goal-selection rule, chosen once when the task manager is built.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum GoalStrategy {
    /// Any free, unclaimed cell other than the start.
    #[default]
    Random,

    /// Like `Random`, but at Manhattan distance strictly greater than
    /// `min_distance_cells` from every claimed goal.
    Spread { min_distance_cells: u32 },

    /// The valid candidate with the most blocked cells in the
    /// `(2·neighborhood + 1)²` window around it.  Sampling stops early once
    /// a candidate reaches `density_threshold`.
    HighDensity { neighborhood: i32, density_threshold: u32 },
}

impl GoalStrategy {
    pub const DEFAULT_MIN_DISTANCE_M: f32 = 10.0;
    pub const DEFAULT_NEIGHBORHOOD: i32 = 5;
    pub const DEFAULT_DENSITY_THRESHOLD: u32 = 10;

    /// Random samples tried by `Random` and `Spread`.
    pub const SAMPLE_ATTEMPTS: usize = 1_000;
    /// Random samples tried by `HighDensity`.
    pub const DENSITY_SAMPLE_ATTEMPTS: usize = 3_000;

    /// Build the strategy named by `kind` with parameters from `config`.
    ///
    /// The spread distance is converted from metres to whole cells.
    pub fn from_config(kind: GoalStrategyKind, config: &SimConfig) -> TaskResult<Self> {
        Ok(match kind {
            GoalStrategyKind::Random => GoalStrategy::Random,
            GoalStrategyKind::Spread => {
                let m = config.spread_min_distance_m;
                if !(m >= 0.0) {
                    return Err(TaskError::InvalidParameter(format!(
                        "spread_min_distance_m must be non-negative, got {m}"
                    )));
                }
                config.validate()?;
                GoalStrategy::Spread { min_distance_cells: config.cells_for(m) as u32 }
            }
            GoalStrategyKind::HighDensity => GoalStrategy::HighDensity {
                neighborhood:      Self::DEFAULT_NEIGHBORHOOD,
                density_threshold: Self::DEFAULT_DENSITY_THRESHOLD,
            },
        })
    }

    pub fn kind(&self) -> GoalStrategyKind {
        match self {
            GoalStrategy::Random             => GoalStrategyKind::Random,
            GoalStrategy::Spread { .. }      => GoalStrategyKind::Spread,
            GoalStrategy::HighDensity { .. } => GoalStrategyKind::HighDensity,
        }
    }
}
