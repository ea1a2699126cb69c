//! One-call construction of the default warehouse.

use wh_core::{SimConfig, SimRng};
use wh_grid::Grid;
use wh_task::TaskManager;

use crate::{SimResult, World, WorldBuilder};

/// RNG stream offsets derived from the master seed.
const LAYOUT_STREAM: u64 = 1;
const GOAL_STREAM:   u64 = 2;

/// Lay out the floor, create the task manager, and spawn the agents, all
/// from `config`.
///
/// The floor and the goal sampler draw from separate child streams of
/// `SimRng::new(config.seed)`, so the same config always yields the same
/// world and the same run.
pub fn warehouse(config: &SimConfig) -> SimResult<(World, TaskManager)> {
    config.validate()?;
    let mut root = SimRng::new(config.seed);
    let mut layout_rng = root.child(LAYOUT_STREAM);
    let goal_rng = root.child(GOAL_STREAM);

    let grid = Grid::with_layout(config, &mut layout_rng)?;
    let mut goals = TaskManager::from_config(config, goal_rng)?;
    let world = WorldBuilder::new(config.clone(), grid).build(&mut goals)?;
    Ok((world, goals))
}
