//! `wh-grid`: the static warehouse floor.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`grid`]   | `Grid`: occupancy matrix, bounds, coordinate conversion      |
//! | [`region`] | `Rect`, `RegionKind`, `ObstacleRegion`                        |
//! | [`layout`] | Randomized shelf / pallet placement and `Grid::with_layout`   |
//! | [`error`]  | `GridError`, `GridResult<T>`                                  |
//!
//! The grid is mutated only while the floor is laid out.  Once the world is
//! built it is shared read-only by the planner, the task manager, and the
//! stepping protocols.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on region types.           |

pub mod error;
pub mod grid;
pub mod layout;
pub mod region;


pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use region::{ObstacleRegion, Rect, RegionKind};
