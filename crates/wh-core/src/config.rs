//! Top-level simulation configuration.
//!
//! Defaults reproduce the reference warehouse: a 50 m × 30 m floor at 0.5 m
//! per cell (100 × 60 cells), 4 m × 2 m shelves, 80 pallets of 2 m × 1.5 m,
//! and 10 agents.  The driver binary loads overrides from a TOML file (with
//! the `serde` feature) and then from command-line flags.

use crate::{ConflictStrategyKind, GoalStrategyKind, SteppingKind, WhError, WhResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Floor width in metres.
    pub warehouse_width_m: f32,
    /// Floor height in metres.
    pub warehouse_height_m: f32,
    /// Metres per grid cell.
    pub resolution_m: f32,

    /// Shelf footprint `[width, height]` in metres.
    pub shelf_size_m: [f32; 2],
    /// Pallet footprint `[width, height]` in metres.
    pub pallet_size_m: [f32; 2],
    /// Number of pallets to attempt to place.  Unplaceable ones are omitted.
    pub pallet_count: usize,

    pub agent_count: usize,

    /// Ticks to simulate in `World::run`.
    pub max_ticks: u64,

    /// How long an arrived agent keeps its goal cell reserved.
    pub goal_dwell_ticks: u64,

    pub goal_strategy: GoalStrategyKind,
    /// Minimum spacing between spread goals, in metres.
    pub spread_min_distance_m: f32,

    pub conflict_strategy: ConflictStrategyKind,
    /// Blocked ticks tolerated by `wait_then_replan` before it replans.
    pub max_retries: u32,
    /// Forced wait after a replan.
    pub cooldown_ticks: u32,

    pub stepping: SteppingKind,

    /// Longest path (in ticks, waits included) the planner will consider.
    pub planner_horizon_ticks: u64,
    /// Upper bound on A* pops per query.
    pub planner_max_expansions: usize,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            warehouse_width_m:      50.0,
            warehouse_height_m:     30.0,
            resolution_m:           0.5,
            shelf_size_m:           [4.0, 2.0],
            pallet_size_m:          [2.0, 1.5],
            pallet_count:           80,
            agent_count:            10,
            max_ticks:              1_000,
            goal_dwell_ticks:       50,
            goal_strategy:          GoalStrategyKind::Random,
            spread_min_distance_m:  10.0,
            conflict_strategy:      ConflictStrategyKind::WaitThenReplan,
            max_retries:            3,
            cooldown_ticks:         2,
            stepping:               SteppingKind::Sequential,
            planner_horizon_ticks:  300,
            planner_max_expansions: 100_000,
            seed:                   42,
        }
    }
}

impl SimConfig {
    /// Whole cells spanned by `metres` (truncating).
    #[inline]
    pub fn cells_for(&self, metres: f32) -> usize {
        (metres / self.resolution_m) as usize
    }

    #[inline]
    pub fn grid_width(&self) -> usize {
        self.cells_for(self.warehouse_width_m)
    }

    #[inline]
    pub fn grid_height(&self) -> usize {
        self.cells_for(self.warehouse_height_m)
    }

    /// Reject configurations the simulator cannot run.
    pub fn validate(&self) -> WhResult<()> {
        if !(self.resolution_m > 0.0) {
            return Err(WhError::Config(format!(
                "resolution_m must be positive, got {}",
                self.resolution_m
            )));
        }
        if self.grid_width() == 0 || self.grid_height() == 0 {
            return Err(WhError::Config(format!(
                "warehouse {} m x {} m is smaller than one cell",
                self.warehouse_width_m, self.warehouse_height_m
            )));
        }
        if self.planner_horizon_ticks == 0 {
            return Err(WhError::Config("planner_horizon_ticks must be at least 1".into()));
        }
        if self.planner_max_expansions == 0 {
            return Err(WhError::Config("planner_max_expansions must be at least 1".into()));
        }
        Ok(())
    }
}
