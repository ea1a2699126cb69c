//! `wh-output`: recording sinks for warehouse runs.
//!
//! A run is recorded as three streams: the static obstacle list (written
//! once), one frame row per agent per tick, and one [`TickReport`] row per
//! step.  That is everything a renderer needs to replay the run.
//!
//! | Feature   | Backend | Files created                                         |
//! |-----------|---------|-------------------------------------------------------|
//! | *(none)*  | CSV     | `obstacles.csv`, `frames.csv`, `tick_reports.csv`     |
//! | `sqlite`  | SQLite  | `output.db`                                           |
//!
//! Both backends implement [`OutputWriter`] and are driven by
//! [`RecordingObserver`], which implements `wh_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wh_output::{CsvWriter, RecordingObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut rec = RecordingObserver::new(writer);
//! rec.record_floor(world.grid())?;
//! world.run(&mut goals, &mut rec);
//! if let Some(e) = rec.take_error() { eprintln!("output error: {e}"); }
//! ```
//!
//! [`TickReport`]: wh_sim::TickReport

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RecordingObserver;
pub use row::{FrameRow, ObstacleRow, TickReportRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
