//! `RecordingObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use rustc_hash::FxHashMap;

use wh_agent::Agent;
use wh_core::{AgentId, Cell, Tick};
use wh_grid::Grid;
use wh_sim::{SimObserver, TickReport};

use crate::row::{FrameRow, ObstacleRow, TickReportRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records frames and tick reports to any
/// [`OutputWriter`] backend, and audits every frame for agents sharing a
/// cell.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `world.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct RecordingObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
    overlaps:   u64,
}

impl<W: OutputWriter> RecordingObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None, overlaps: 0 }
    }

    /// Write the floor's obstacle list.  Call once before running.
    pub fn record_floor(&mut self, grid: &Grid) -> OutputResult<()> {
        let rows: Vec<ObstacleRow> = grid.regions().iter().map(|r| ObstacleRow::new(r, grid)).collect();
        self.writer.write_obstacles(&rows)
    }

    /// Take the stored write error (if any) after `world.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Cells found holding more than one agent, summed over all frames.
    pub fn overlap_count(&self) -> u64 {
        self.overlaps
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn audit(&mut self, tick: Tick, agents: &[Agent]) {
        let mut by_cell: FxHashMap<Cell, Vec<AgentId>> = FxHashMap::default();
        for agent in agents {
            by_cell.entry(agent.current_position()).or_default().push(agent.id);
        }
        for (cell, ids) in by_cell {
            if ids.len() > 1 {
                self.overlaps += 1;
                tracing::warn!(%tick, %cell, agents = ?ids, "OVERLAP");
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for RecordingObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, report: &TickReport) {
        let result = self.writer.write_tick_report(&TickReportRow::from(report));
        self.store_err(result);
    }

    fn on_frame(&mut self, tick: Tick, agents: &[Agent]) {
        self.audit(tick, agents);
        if agents.is_empty() {
            return;
        }
        let rows: Vec<FrameRow> = agents.iter().map(|a| FrameRow::new(tick, a)).collect();
        let result = self.writer.write_frame(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
