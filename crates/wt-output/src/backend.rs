//! Backend selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::writer::{SnapshotWriter, SummaryWriter};
use crate::{CsvSnapshotWriter, CsvSummaryWriter, OutputError, OutputResult};

/// Where run output goes.
///
/// | Backend   | Snapshots                  | Summaries, flows           | Latency       |
/// |-----------|----------------------------|----------------------------|---------------|
/// | `csv`     | `snapshots_<key>.csv`      | `summary.csv`, `flows.csv` | `latency.csv` |
/// | `sqlite`  | `output.db` · `snapshots`  | `output.db`                | `latency.csv` |
/// | `parquet` | `snapshots_<key>.parquet`  | `summary.csv`, `flows.csv` | `latency.csv` |
///
/// `sqlite` and `parquet` need the matching Cargo feature; opening a
/// backend that was not compiled in fails with
/// [`OutputError::BackendDisabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputBackend {
    #[default]
    Csv,
    Sqlite,
    Parquet,
}

impl OutputBackend {
    pub fn name(self) -> &'static str {
        match self {
            OutputBackend::Csv     => "csv",
            OutputBackend::Sqlite  => "sqlite",
            OutputBackend::Parquet => "parquet",
        }
    }

    /// Open the snapshot writer for the run keyed `key`.
    pub fn open_snapshots(self, dir: &Path, key: &str) -> OutputResult<Box<dyn SnapshotWriter + Send>> {
        match self {
            OutputBackend::Csv => Ok(Box::new(CsvSnapshotWriter::new(dir, key)?)),
            #[cfg(feature = "sqlite")]
            OutputBackend::Sqlite => Ok(Box::new(crate::SqliteSnapshotWriter::new(dir, key)?)),
            #[cfg(feature = "parquet")]
            OutputBackend::Parquet => Ok(Box::new(crate::ParquetSnapshotWriter::new(dir, key)?)),
            #[allow(unreachable_patterns)]
            other => Err(OutputError::BackendDisabled(other.name())),
        }
    }

    /// Open the sweep-level writer.
    pub fn open_summary(self, dir: &Path) -> OutputResult<Box<dyn SummaryWriter + Send>> {
        match self {
            OutputBackend::Csv | OutputBackend::Parquet => {
                self.check_enabled()?;
                Ok(Box::new(CsvSummaryWriter::new(dir)?))
            }
            #[cfg(feature = "sqlite")]
            OutputBackend::Sqlite => Ok(Box::new(crate::SqliteSummaryWriter::new(dir)?)),
            #[allow(unreachable_patterns)]
            other => Err(OutputError::BackendDisabled(other.name())),
        }
    }

    fn check_enabled(self) -> OutputResult<()> {
        let enabled = match self {
            OutputBackend::Csv     => true,
            OutputBackend::Sqlite  => cfg!(feature = "sqlite"),
            OutputBackend::Parquet => cfg!(feature = "parquet"),
        };
        if enabled { Ok(()) } else { Err(OutputError::BackendDisabled(self.name())) }
    }
}

impl fmt::Display for OutputBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv"     => Ok(OutputBackend::Csv),
            "sqlite"  => Ok(OutputBackend::Sqlite),
            "parquet" => Ok(OutputBackend::Parquet),
            other     => Err(format!("unknown output backend `{other}` (csv, sqlite, parquet)")),
        }
    }
}
