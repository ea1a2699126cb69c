//! The goal capability consumed by agents and the world.

use wh_core::Cell;
use wh_grid::Grid;

/// Hands out destination cells and takes them back.
///
/// # Contract
///
/// - [`get_goal`](Self::get_goal) never fails.  A returned cell other than
///   `start` is *claimed* and will not be handed out again until released.
///   Returning `start` itself means no goal was found; nothing is claimed.
/// - [`release_goal`](Self::release_goal) on an unclaimed cell is a no-op.
/// - Must be deterministic given its internal RNG state.
pub trait GoalSource {
    fn get_goal(&mut self, grid: &Grid, start: Cell) -> Cell;

    fn release_goal(&mut self, cell: Cell);
}

impl<G: GoalSource + ?Sized> GoalSource for &mut G {
    #[inline]
    fn get_goal(&mut self, grid: &Grid, start: Cell) -> Cell {
        (**self).get_goal(grid, start)
    }

    #[inline]
    fn release_goal(&mut self, cell: Cell) {
        (**self).release_goal(cell)
    }
}
