//! The `OutputWriter` trait implemented by all backend writers.

use crate::{FrameRow, ObstacleRow, OutputResult, TickReportRow};

/// A destination for recorded runs.
///
/// [`RecordingObserver`][crate::RecordingObserver] stores write errors
/// instead of propagating them; retrieve them with `take_error`.
pub trait OutputWriter {
    /// Write the static obstacle list.  Called once, before the first frame.
    fn write_obstacles(&mut self, rows: &[ObstacleRow]) -> OutputResult<()>;

    /// Write every agent's row for one tick.
    fn write_frame(&mut self, rows: &[FrameRow]) -> OutputResult<()>;

    fn write_tick_report(&mut self, row: &TickReportRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
