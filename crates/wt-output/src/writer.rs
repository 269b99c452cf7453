//! The writer traits implemented by all backends.

use crate::{FlowSummaryRow, LatencyRow, OutputResult, RunSummary, SnapshotRow};

/// Per-run snapshot sink.  One instance per run; runs never share one.
pub trait SnapshotWriter {
    /// Write one tick's records.
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: SnapshotWriter + ?Sized> SnapshotWriter for Box<W> {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        (**self).write_snapshots(rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Sweep-level sink.  Rows accumulate across runs in the order written.
pub trait SummaryWriter {
    fn write_summary(&mut self, row: &RunSummary) -> OutputResult<()>;

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()>;

    fn write_latency(&mut self, rows: &[LatencyRow]) -> OutputResult<()>;

    /// Flush all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: SummaryWriter + ?Sized> SummaryWriter for Box<W> {
    fn write_summary(&mut self, row: &RunSummary) -> OutputResult<()> {
        (**self).write_summary(row)
    }

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()> {
        (**self).write_flows(rows)
    }

    fn write_latency(&mut self, rows: &[LatencyRow]) -> OutputResult<()> {
        (**self).write_latency(rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// A [`SnapshotWriter`] that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSnapshots;

impl SnapshotWriter for DiscardSnapshots {
    fn write_snapshots(&mut self, _rows: &[SnapshotRow]) -> OutputResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
