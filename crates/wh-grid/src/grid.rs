//! The occupancy grid.
//!
//! # Data layout
//!
//! Cells are stored row-major in a flat `Vec<u8>`: cell `(x, y)` lives at
//! `y * width + x`, `0` meaning free and `1` blocked.  Everything outside
//! `0..width × 0..height` is treated as blocked, so callers never need a
//! separate bounds check before asking whether a cell is free.

use wh_core::{Cell, WorldPoint};

use crate::{GridError, GridResult, ObstacleRegion, Rect};

/// A `width × height` floor of unit cells plus the obstacle regions placed
/// on it.
#[derive(Clone, Debug)]
pub struct Grid {
    width:      usize,
    height:     usize,
    resolution: f32,
    cells:      Vec<u8>,
    regions:    Vec<ObstacleRegion>,
}

impl Grid {
    /// Build an empty floor measuring `width_m × height_m` metres at
    /// `resolution` metres per cell.  Partial cells at the far edges are
    /// dropped.
    pub fn new(width_m: f32, height_m: f32, resolution: f32) -> GridResult<Self> {
        if !(resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }
        let width = (width_m / resolution) as usize;
        let height = (height_m / resolution) as usize;
        Self::with_size(width, height, resolution)
    }

    /// Build an empty floor of exactly `width × height` cells.
    pub fn with_size(width: usize, height: usize, resolution: f32) -> GridResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if !(resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }
        Ok(Self {
            width,
            height,
            resolution,
            cells: vec![0; width * height],
            regions: Vec::new(),
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Metres per cell.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Whole cells spanned by `metres` (truncating).
    #[inline]
    pub fn cells_for(&self, metres: f32) -> usize {
        (metres / self.resolution) as usize
    }

    // ── Occupancy queries ─────────────────────────────────────────────────

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    #[inline]
    fn offset(&self, cell: Cell) -> usize {
        cell.y as usize * self.width + cell.x as usize
    }

    /// `true` if `cell` is inside the floor and not covered by an obstacle.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.cells[self.offset(cell)] == 0
    }

    /// `true` if every cell of `rect` is inside the floor and free.
    pub fn is_rect_free(&self, rect: Rect) -> bool {
        rect.w > 0 && rect.h > 0 && rect.cells().all(|c| self.is_free(c))
    }

    /// Number of blocked cells in the square window of half-width `radius`
    /// centred on `center`, clipped to the floor.
    pub fn occupied_in_window(&self, center: Cell, radius: i32) -> u32 {
        let x0 = (center.x - radius).max(0);
        let x1 = (center.x + radius + 1).min(self.width as i32);
        let y0 = (center.y - radius).max(0);
        let y1 = (center.y + radius + 1).min(self.height as i32);
        let mut count = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                count += u32::from(self.cells[self.offset(Cell::new(x, y))]);
            }
        }
        count
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    pub fn free_count(&self) -> usize {
        self.cells.len() - self.blocked_count()
    }

    /// Obstacle regions in placement order.
    #[inline]
    pub fn regions(&self) -> &[ObstacleRegion] {
        &self.regions
    }

    // ── Mutation (setup only) ─────────────────────────────────────────────

    /// Mark a single cell as blocked.  Out-of-bounds cells are ignored.
    pub fn block(&mut self, cell: Cell) {
        if self.in_bounds(cell) {
            let i = self.offset(cell);
            self.cells[i] = 1;
        }
    }

    /// Mark every in-bounds cell of `rect` as blocked without recording a
    /// region.
    pub fn block_rect(&mut self, rect: Rect) {
        for cell in rect.cells() {
            self.block(cell);
        }
    }

    /// Block `region.rect` and record the region.
    pub(crate) fn add_region(&mut self, region: ObstacleRegion) {
        self.block_rect(region.rect);
        self.regions.push(region);
    }

    // ── Coordinate conversion ─────────────────────────────────────────────

    /// Lower-left corner of `cell` in metres.
    #[inline]
    pub fn to_world(&self, cell: Cell) -> WorldPoint {
        WorldPoint::new(cell.x as f32 * self.resolution, cell.y as f32 * self.resolution)
    }

    /// The cell containing `point` (truncating toward zero).
    #[inline]
    pub fn to_cell(&self, point: WorldPoint) -> Cell {
        Cell::new((point.x / self.resolution) as i32, (point.y / self.resolution) as i32)
    }
}
