//! Planned routes.

use wh_core::{Cell, Tick};

/// An ordered, non-empty sequence of cells anchored at `depart`:
/// `cells[i]` is the scheduled position at tick `depart + i`.
///
/// A path of length 1 means "already at the goal".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells:  Vec<Cell>,
    depart: Tick,
}

impl Path {
    /// Returns `None` for an empty cell list.
    pub fn new(cells: Vec<Cell>, depart: Tick) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells, depart })
        }
    }

    /// A single-cell path: stay at `cell` from `depart`.
    pub fn stationary(cell: Cell, depart: Tick) -> Self {
        Self { cells: vec![cell], depart }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn depart(&self) -> Tick {
        self.depart
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; paths hold at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `true` if the path never leaves its start.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.cells.len() == 1
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    #[inline]
    pub fn goal(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Tick at which the last cell is reached.
    #[inline]
    pub fn arrival_tick(&self) -> Tick {
        self.depart + (self.cells.len() as u64 - 1)
    }

    /// Scheduled cell at absolute tick `tick`, if the path covers it.
    pub fn cell_at(&self, tick: Tick) -> Option<Cell> {
        if tick < self.depart {
            return None;
        }
        self.get((tick - self.depart) as usize)
    }

    /// `(tick, cell)` for every position on the path.
    pub fn timed_cells(&self) -> impl Iterator<Item = (Tick, Cell)> + '_ {
        let depart = self.depart;
        self.cells.iter().enumerate().map(move |(i, &c)| (depart + i as u64, c))
    }

    /// `(from, to, tick)` for every transition, `tick` being the arrival tick
    /// at `to`.  Waits appear as `from == to`.
    pub fn transitions(&self) -> impl Iterator<Item = (Cell, Cell, Tick)> + '_ {
        let depart = self.depart;
        self.cells
            .windows(2)
            .enumerate()
            .map(move |(i, w)| (w[0], w[1], depart + (i as u64 + 1)))
    }
}
