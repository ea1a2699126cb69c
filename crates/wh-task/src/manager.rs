//! `TaskManager`: the default [`GoalSource`].

use rustc_hash::FxHashSet;

use wh_core::{Cell, SimConfig, SimRng};
use wh_grid::Grid;

use crate::{GoalSource, GoalStrategy, TaskResult};

/// Samples destination cells under a [`GoalStrategy`] and tracks which cells
/// are currently claimed.
///
/// The claimed set only shrinks through [`release_goal`](GoalSource::release_goal),
/// so `Spread` spaces new goals against every outstanding claim, including
/// goals of agents that have arrived but not yet been reassigned.
pub struct TaskManager {
    strategy: GoalStrategy,
    rng:      SimRng,
    claimed:  FxHashSet<Cell>,
}

impl TaskManager {
    pub fn new(strategy: GoalStrategy, rng: SimRng) -> Self {
        Self { strategy, rng, claimed: FxHashSet::default() }
    }

    /// Build with the strategy named in `config.goal_strategy`.
    pub fn from_config(config: &SimConfig, rng: SimRng) -> TaskResult<Self> {
        Ok(Self::new(GoalStrategy::from_config(config.goal_strategy, config)?, rng))
    }

    #[inline]
    pub fn strategy(&self) -> GoalStrategy {
        self.strategy
    }

    #[inline]
    pub fn claimed(&self) -> &FxHashSet<Cell> {
        &self.claimed
    }

    #[inline]
    pub fn is_claimed(&self, cell: Cell) -> bool {
        self.claimed.contains(&cell)
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    fn sample(&mut self, grid: &Grid) -> Cell {
        let x = self.rng.gen_range(0..grid.width() as i32);
        let y = self.rng.gen_range(0..grid.height() as i32);
        Cell::new(x, y)
    }

    #[inline]
    fn is_valid(&self, grid: &Grid, candidate: Cell, start: Cell) -> bool {
        grid.is_free(candidate) && candidate != start && !self.claimed.contains(&candidate)
    }

    fn random_goal(&mut self, grid: &Grid, start: Cell) -> Cell {
        for _ in 0..GoalStrategy::SAMPLE_ATTEMPTS {
            let candidate = self.sample(grid);
            if self.is_valid(grid, candidate, start) {
                self.claimed.insert(candidate);
                return candidate;
            }
        }
        tracing::debug!(%start, "no random goal found; staying put");
        start
    }

    fn spread_goal(&mut self, grid: &Grid, start: Cell, min_distance: u32) -> Cell {
        for _ in 0..GoalStrategy::SAMPLE_ATTEMPTS {
            let candidate = self.sample(grid);
            if !self.is_valid(grid, candidate, start) {
                continue;
            }
            if self.claimed.iter().all(|&g| candidate.manhattan(g) > min_distance) {
                self.claimed.insert(candidate);
                return candidate;
            }
        }
        tracing::debug!(%start, min_distance, "no spread goal found; falling back to random");
        self.random_goal(grid, start)
    }

    fn high_density_goal(&mut self, grid: &Grid, start: Cell, neighborhood: i32, threshold: u32) -> Cell {
        let mut best: Option<(u32, Cell)> = None;
        for _ in 0..GoalStrategy::DENSITY_SAMPLE_ATTEMPTS {
            let candidate = self.sample(grid);
            if !self.is_valid(grid, candidate, start) {
                continue;
            }
            let density = grid.occupied_in_window(candidate, neighborhood);
            if best.is_none_or(|(d, _)| density > d) {
                best = Some((density, candidate));
            }
            if density >= threshold {
                break;
            }
        }
        match best {
            Some((_, cell)) => {
                self.claimed.insert(cell);
                cell
            }
            None => {
                tracing::debug!(%start, "no high-density goal found; falling back to random");
                self.random_goal(grid, start)
            }
        }
    }
}

impl GoalSource for TaskManager {
    fn get_goal(&mut self, grid: &Grid, start: Cell) -> Cell {
        match self.strategy {
            GoalStrategy::Random => self.random_goal(grid, start),
            GoalStrategy::Spread { min_distance_cells } => self.spread_goal(grid, start, min_distance_cells),
            GoalStrategy::HighDensity { neighborhood, density_threshold } => {
                self.high_density_goal(grid, start, neighborhood, density_threshold)
            }
        }
    }

    fn release_goal(&mut self, cell: Cell) {
        self.claimed.remove(&cell);
    }
}
