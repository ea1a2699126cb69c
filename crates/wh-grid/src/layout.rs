//! Randomized floor layout: shelf bands and scattered pallets.
//!
//! Placement is sampling-based with a fixed attempt budget.  A footprint that
//! cannot be placed within the budget is dropped silently: a sparser floor is
//! still a valid floor.  All draws come from the caller's [`SimRng`], so the
//! same seed always yields the same layout.

use wh_core::{SimConfig, SimRng};

use crate::{Grid, GridResult, ObstacleRegion, Rect, RegionKind};

/// Random placements tried per footprint before giving up.
pub const PLACEMENT_ATTEMPTS: usize = 1_000;

/// Free rows left between consecutive shelf bands, in cells.
const AISLE_WIDTH: usize = 4;

/// First row of the first shelf band.
const FIRST_SHELF_ROW: usize = 2;

impl Grid {
    /// Build the default warehouse floor for `config`: shelves first, then
    /// `config.pallet_count` pallets.
    pub fn with_layout(config: &SimConfig, rng: &mut SimRng) -> GridResult<Grid> {
        config.validate()?;
        let mut grid = Grid::new(config.warehouse_width_m, config.warehouse_height_m, config.resolution_m)?;
        let shelves = grid.place_shelves(rng, config.shelf_size_m);
        let pallets = grid.place_pallets(rng, config.pallet_count, config.pallet_size_m);
        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            shelves,
            pallets,
            requested_pallets = config.pallet_count,
            "laid out warehouse floor"
        );
        Ok(grid)
    }

    /// Try up to [`PLACEMENT_ATTEMPTS`] random positions for a `w × h` cell
    /// footprint, keeping a one-cell margin from the floor edge.  On success
    /// the cells are blocked, the region recorded, and returned.
    pub fn place_region(
        &mut self,
        rng:  &mut SimRng,
        kind: RegionKind,
        w:    usize,
        h:    usize,
    ) -> Option<ObstacleRegion> {
        if w == 0 || h == 0 {
            return None;
        }
        let max_x = self.width().checked_sub(w + 1)?;
        let max_y = self.height().checked_sub(h + 1)?;
        if max_x < 1 || max_y < 1 {
            return None;
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = rng.gen_range(1..=max_x);
            let y = rng.gen_range(1..=max_y);
            let rect = Rect::new(x as i32, y as i32, w as i32, h as i32);
            if self.is_rect_free(rect) {
                let region = ObstacleRegion { kind, rect };
                self.add_region(region);
                return Some(region);
            }
        }
        None
    }

    /// Lay out shelf bands: starting at row 2 and every `shelf_h + 4` rows,
    /// try 3–5 random horizontal positions and keep the ones that fit.
    ///
    /// Returns the number of shelves placed.
    pub fn place_shelves(&mut self, rng: &mut SimRng, size_m: [f32; 2]) -> usize {
        let gw = self.cells_for(size_m[0]);
        let gh = self.cells_for(size_m[1]);
        if gw == 0 || gh == 0 {
            return 0;
        }
        let Some(max_x) = self.width().checked_sub(gw + 1).filter(|&m| m >= 1) else {
            return 0;
        };
        let last_row = self.height().saturating_sub(gh + 2);

        let mut placed = 0;
        for row in (FIRST_SHELF_ROW..last_row).step_by(gh + AISLE_WIDTH) {
            let attempts = rng.gen_range(3..=5);
            for _ in 0..attempts {
                let x = rng.gen_range(1..=max_x);
                let rect = Rect::new(x as i32, row as i32, gw as i32, gh as i32);
                if self.is_rect_free(rect) {
                    self.add_region(ObstacleRegion { kind: RegionKind::Shelf, rect });
                    placed += 1;
                }
            }
        }
        placed
    }

    /// Place up to `count` pallets of `size_m` metres.  Returns how many fit.
    pub fn place_pallets(&mut self, rng: &mut SimRng, count: usize, size_m: [f32; 2]) -> usize {
        let gw = self.cells_for(size_m[0]);
        let gh = self.cells_for(size_m[1]);
        (0..count)
            .filter(|_| self.place_region(rng, RegionKind::Pallet, gw, gh).is_some())
            .count()
    }
}
