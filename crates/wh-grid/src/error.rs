//! Grid error type.

use thiserror::Error;

use wh_core::WhError;

/// Errors produced while constructing a floor.  Failing to place an obstacle
/// is not one of them; unplaceable obstacles are simply omitted.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("resolution must be positive, got {0}")]
    InvalidResolution(f32),

    #[error(transparent)]
    Config(#[from] WhError),
}

pub type GridResult<T> = Result<T, GridError>;
