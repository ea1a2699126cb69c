//! Placed obstacle rectangles.

use std::fmt;

use wh_core::Cell;

/// An axis-aligned rectangle of cells: `x..x+w` by `y..y+h`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x && cell.x < self.x + self.w && cell.y >= self.y && cell.y < self.y + self.h
    }

    pub fn area(&self) -> usize {
        (self.w.max(0) as usize) * (self.h.max(0) as usize)
    }

    /// Every cell covered by the rectangle, column by column.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.x..self.x + self.w).flat_map(move |x| (self.y..self.y + self.h).map(move |y| Cell::new(x, y)))
    }
}

/// What an obstacle region represents.  Only rendering cares; every kind
/// blocks its cells identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum RegionKind {
    Shelf,
    Pallet,
}

impl RegionKind {
    /// Lower-case label, used as the `kind` column by output writers.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionKind::Shelf  => "shelf",
            RegionKind::Pallet => "pallet",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangle placed on the floor, tagged with its category.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleRegion {
    pub kind: RegionKind,
    pub rect: Rect,
}
