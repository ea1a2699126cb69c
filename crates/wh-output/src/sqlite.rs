//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` in the configured output directory with
//! three tables: `obstacles`, `frames` and `tick_reports`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{FrameRow, ObstacleRow, OutputResult, TickReportRow};

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS obstacles (
                 kind     TEXT    NOT NULL,
                 x        INTEGER NOT NULL,
                 y        INTEGER NOT NULL,
                 width    INTEGER NOT NULL,
                 height   INTEGER NOT NULL,
                 x_m      REAL    NOT NULL,
                 y_m      REAL    NOT NULL,
                 width_m  REAL    NOT NULL,
                 height_m REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS frames (
                 tick            INTEGER NOT NULL,
                 agent_id        INTEGER NOT NULL,
                 x               INTEGER NOT NULL,
                 y               INTEGER NOT NULL,
                 state           TEXT    NOT NULL,
                 goal_x          INTEGER,
                 goal_y          INTEGER,
                 completed_tasks INTEGER NOT NULL,
                 PRIMARY KEY (tick, agent_id)
             );
             CREATE TABLE IF NOT EXISTS tick_reports (
                 tick       INTEGER PRIMARY KEY,
                 moved      INTEGER NOT NULL,
                 blocked    INTEGER NOT NULL,
                 replanned  INTEGER NOT NULL,
                 idled      INTEGER NOT NULL,
                 reassigned INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_obstacles(&mut self, rows: &[ObstacleRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO obstacles \
                 (kind, x, y, width, height, x_m, y_m, width_m, height_m) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.kind, row.x, row.y, row.width, row.height,
                    row.x_m, row.y_m, row.width_m, row.height_m,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_frame(&mut self, rows: &[FrameRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO frames \
                 (tick, agent_id, x, y, state, goal_x, goal_y, completed_tasks) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.agent_id,
                    row.x,
                    row.y,
                    row.state,
                    row.goal_x,
                    row.goal_y,
                    row.completed_tasks,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_report(&mut self, row: &TickReportRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_reports (tick, moved, blocked, replanned, idled, reassigned) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.tick as i64,
                row.moved as i64,
                row.blocked as i64,
                row.replanned as i64,
                row.idled as i64,
                row.reassigned as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
