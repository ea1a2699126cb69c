//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `obstacles.csv`
//! - `frames.csv`
//! - `tick_reports.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{FrameRow, ObstacleRow, OutputResult, TickReportRow};

pub struct CsvWriter {
    obstacles: Writer<File>,
    frames:    Writer<File>,
    reports:   Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` (which must exist) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut obstacles = Writer::from_path(dir.join("obstacles.csv"))?;
        obstacles.write_record(["kind", "x", "y", "width", "height", "x_m", "y_m", "width_m", "height_m"])?;

        let mut frames = Writer::from_path(dir.join("frames.csv"))?;
        frames.write_record(["tick", "agent_id", "x", "y", "state", "goal_x", "goal_y", "completed_tasks"])?;

        let mut reports = Writer::from_path(dir.join("tick_reports.csv"))?;
        reports.write_record(["tick", "moved", "blocked", "replanned", "idled", "reassigned"])?;

        Ok(Self { obstacles, frames, reports, finished: false })
    }
}

fn opt(v: Option<i32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_obstacles(&mut self, rows: &[ObstacleRow]) -> OutputResult<()> {
        for row in rows {
            self.obstacles.write_record(&[
                row.kind.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.width.to_string(),
                row.height.to_string(),
                row.x_m.to_string(),
                row.y_m.to_string(),
                row.width_m.to_string(),
                row.height_m.to_string(),
            ])?;
        }
        self.obstacles.flush()?;
        Ok(())
    }

    fn write_frame(&mut self, rows: &[FrameRow]) -> OutputResult<()> {
        for row in rows {
            self.frames.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.state.to_string(),
                opt(row.goal_x),
                opt(row.goal_y),
                row.completed_tasks.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_report(&mut self, row: &TickReportRow) -> OutputResult<()> {
        self.reports.write_record(&[
            row.tick.to_string(),
            row.moved.to_string(),
            row.blocked.to_string(),
            row.replanned.to_string(),
            row.idled.to_string(),
            row.reassigned.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.obstacles.flush()?;
        self.frames.flush()?;
        self.reports.flush()?;
        Ok(())
    }
}
