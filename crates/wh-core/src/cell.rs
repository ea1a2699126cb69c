//! Grid coordinates and their continuous-space counterpart.
//!
//! `Cell` is the canonical unit of space: every agent occupies exactly one
//! cell, and every reservation is keyed by one.  `WorldPoint` only exists at
//! the boundary (layout input, rendering output) and is converted through
//! `Grid::to_world` / `Grid::to_cell`.

use std::fmt;

/// Lattice actions in expansion order: up, down, left, right, wait.
///
/// The last entry is the zero move, so "wait in place" is expanded after all
/// four axis moves.
pub const MOVES: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (0, 1), (0, 0)];

/// An integer grid coordinate `(x, y)`.
///
/// Ordered by `x` then `y`, which gives the two-phase resolver a stable
/// iteration order when it groups intents by contested cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (L1) distance: the planner's heuristic and the unit used by
    /// jump detection.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }

    /// The five cells reachable in one tick (four axis moves, then staying).
    pub fn successors(self) -> impl Iterator<Item = Cell> {
        MOVES.into_iter().map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(i32, i32)> for Cell {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A continuous floor coordinate in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2} m, {:.2} m)", self.x, self.y)
    }
}
