//! CSV output backend.
//!
//! Per run, in the output directory:
//! - `snapshots_<key>.csv` (truncated when the run starts)
//!
//! Per sweep, appended to across runs and sweeps, header written once:
//! - `summary.csv`
//! - `flows.csv`
//! - `latency.csv`

use std::fs::{File, OpenOptions};
use std::path::Path;

use csv::{Writer, WriterBuilder};

use wt_core::fmt_metric;

use crate::writer::{SnapshotWriter, SummaryWriter};
use crate::{FlowSummaryRow, LatencyRow, OutputResult, RunSummary, SnapshotRow};

pub const SNAPSHOT_HEADER: [&str; 14] = [
    "time_s", "client_id", "ap", "signal_dbm", "queue_delay_ms", "ap_station_count",
    "ap_queue_depth", "ap_throughput_mbps", "ap_utilization", "delay_ms", "jitter_ms",
    "loss_rate", "band_ghz", "channel_width_mhz",
];

pub const SUMMARY_HEADER: [&str; 8] = [
    "config_key", "packet_size", "channel_width_mhz", "band_ghz", "flows", "bandwidth_mbps",
    "drop_rate", "status",
];

pub const FLOWS_HEADER: [&str; 11] = [
    "config_key", "flow_id", "source", "destination", "tx_packets", "rx_packets",
    "lost_packets", "bandwidth_mbps", "drop_rate", "mean_delay_ms", "mean_jitter_ms",
];

pub const LATENCY_HEADER: [&str; 5] = ["time_s", "delay_s", "channel_width_mhz", "packet_size", "band"];

/// File name of a run's snapshot table.
pub fn snapshot_file_name(key: &str, extension: &str) -> String {
    format!("snapshots_{key}.{extension}")
}

/// Open `path` for appending; write `header` only if the file is empty.
pub(crate) fn append_with_header(path: &Path, header: &[&str]) -> OutputResult<Writer<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let fresh = file.metadata()?.len() == 0;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if fresh {
        writer.write_record(header)?;
        writer.flush()?;
    }
    Ok(writer)
}

pub(crate) fn write_latency_rows(writer: &mut Writer<File>, rows: &[LatencyRow]) -> OutputResult<()> {
    for row in rows {
        writer.write_record(&[
            row.time_s.to_string(),
            row.delay_s.to_string(),
            row.channel_width_mhz.to_string(),
            row.packet_size.to_string(),
            format!("b{}", row.band_ghz),
        ])?;
    }
    Ok(())
}

// ── Per-run snapshots ─────────────────────────────────────────────────────────

/// Writes one run's snapshot records to `snapshots_<key>.csv`.
pub struct CsvSnapshotWriter {
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvSnapshotWriter {
    /// Create (or truncate) the run's snapshot file in `dir` and write the
    /// header row.
    pub fn new(dir: &Path, key: &str) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join(snapshot_file_name(key, "csv")))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;
        Ok(Self { snapshots, finished: false })
    }
}

impl SnapshotWriter for CsvSnapshotWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.time_s.to_string(),
                row.client_id.to_string(),
                row.ap.clone(),
                fmt_metric(row.signal_dbm),
                fmt_metric(row.queue_delay_ms),
                row.ap_station_count.to_string(),
                row.ap_queue_depth.to_string(),
                fmt_metric(row.ap_throughput_mbps),
                fmt_metric(row.ap_utilization),
                fmt_metric(row.delay_ms),
                fmt_metric(row.jitter_ms),
                fmt_metric(row.loss_rate),
                row.band_ghz.to_string(),
                row.channel_width_mhz.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        Ok(())
    }
}

// ── Sweep-level tables ────────────────────────────────────────────────────────

/// Appends summaries, per-flow rows and latency samples to CSV files
/// shared by every run.
pub struct CsvSummaryWriter {
    summary:  Writer<File>,
    flows:    Writer<File>,
    latency:  Writer<File>,
    finished: bool,
}

impl CsvSummaryWriter {
    /// Open (or create) the three files in `dir`.  Existing content is kept;
    /// headers are only written to empty files.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            summary:  append_with_header(&dir.join("summary.csv"), &SUMMARY_HEADER)?,
            flows:    append_with_header(&dir.join("flows.csv"), &FLOWS_HEADER)?,
            latency:  append_with_header(&dir.join("latency.csv"), &LATENCY_HEADER)?,
            finished: false,
        })
    }
}

impl SummaryWriter for CsvSummaryWriter {
    fn write_summary(&mut self, row: &RunSummary) -> OutputResult<()> {
        self.summary.write_record(&[
            row.config_key.clone(),
            row.packet_size.to_string(),
            row.channel_width_mhz.to_string(),
            row.band_ghz.to_string(),
            row.flows.to_string(),
            fmt_metric(row.bandwidth_mbps),
            fmt_metric(row.drop_rate),
            row.status.to_string(),
        ])?;
        self.summary.flush()?;
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.flows.write_record(&[
                row.config_key.clone(),
                row.flow_id.to_string(),
                row.source.to_string(),
                row.destination.to_string(),
                row.tx_packets.to_string(),
                row.rx_packets.to_string(),
                row.lost_packets.to_string(),
                fmt_metric(row.bandwidth_mbps),
                fmt_metric(row.drop_rate),
                fmt_metric(row.mean_delay_ms),
                fmt_metric(row.mean_jitter_ms),
            ])?;
        }
        Ok(())
    }

    fn write_latency(&mut self, rows: &[LatencyRow]) -> OutputResult<()> {
        write_latency_rows(&mut self.latency, rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summary.flush()?;
        self.flows.flush()?;
        self.latency.flush()?;
        Ok(())
    }
}
