//! `wt-output` — run output writers for the wifi telemetry workspace.
//!
//! Two kinds of sink:
//!
//! - [`SnapshotWriter`]: one per run, fed by [`RunOutputObserver`] as
//!   snapshot ticks fire.
//! - [`SummaryWriter`]: one per sweep, fed by the orchestrator with each
//!   run's summary, per-flow rows and latency samples, in sweep order.
//!
//! Backends are behind Cargo features:
//!
//! | Feature   | Backend  | Files created                                              |
//! |-----------|----------|------------------------------------------------------------|
//! | *(none)*  | CSV      | `snapshots_<key>.csv`, `summary.csv`, `flows.csv`, `latency.csv` |
//! | `sqlite`  | SQLite   | `output.db`                                                |
//! | `parquet` | Parquet  | `snapshots_<key>.parquet`                                  |
//!
//! [`write_flow_dump`] writes a run's whole flow table as JSON.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wt_output::{CsvSnapshotWriter, RunOutputObserver};
//!
//! let writer = CsvSnapshotWriter::new(Path::new("./output"), &config.key)?;
//! let mut obs = RunOutputObserver::new(writer, false);
//! run.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod backend;
pub mod csv;
pub mod error;
pub mod flowdump;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use backend::OutputBackend;
pub use crate::csv::{CsvSnapshotWriter, CsvSummaryWriter, snapshot_file_name};
pub use error::{OutputError, OutputResult};
pub use flowdump::{flow_dump_file_name, write_flow_dump};
pub use observer::RunOutputObserver;
pub use row::{FlowSummaryRow, LatencyRow, RunStatus, RunSummary, SnapshotRow};
pub use writer::{DiscardSnapshots, SnapshotWriter, SummaryWriter};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteSnapshotWriter, SqliteSummaryWriter};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetSnapshotWriter;
