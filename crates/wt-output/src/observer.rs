//! `RunOutputObserver<W>` — bridges `RunObserver` to a `SnapshotWriter`.

use tracing::{debug, warn};

use wt_core::{ApId, RunConfiguration, SimTime};
use wt_sim::{FlowStatsTable, RunObserver, SnapshotRecord};

use crate::row::{LatencyRow, SnapshotRow};
use crate::writer::SnapshotWriter;
use crate::{OutputError, OutputResult};

/// A [`RunObserver`] that writes snapshot records to any [`SnapshotWriter`]
/// backend and, optionally, collects one [`LatencyRow`] per delivery.
///
/// Errors from the writer are stored internally because `RunObserver`
/// methods have no return value.  After `run.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct RunOutputObserver<W: SnapshotWriter> {
    writer:       W,
    latency:      Option<Vec<LatencyRow>>,
    payload:      u32,
    width_mhz:    u16,
    band_ghz:     u32,
    rows_written: u64,
    last_error:   Option<OutputError>,
}

impl<W: SnapshotWriter> RunOutputObserver<W> {
    /// Create an observer backed by `writer`.  With `record_latency`, every
    /// delivery becomes a latency row retrievable with
    /// [`take_latency`][Self::take_latency].
    pub fn new(writer: W, record_latency: bool) -> Self {
        Self {
            writer,
            latency:      record_latency.then(Vec::new),
            payload:      0,
            width_mhz:    0,
            band_ghz:     0,
            rows_written: 0,
            last_error:   None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Latency rows collected so far, in delivery order.
    pub fn take_latency(&mut self) -> Vec<LatencyRow> {
        self.latency.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Snapshot rows handed to the writer so far.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "snapshot write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: SnapshotWriter> RunObserver for RunOutputObserver<W> {
    fn on_run_start(&mut self, config: &RunConfiguration) {
        self.payload   = config.payload_bytes;
        self.width_mhz = config.width_mhz();
        self.band_ghz  = config.band().ghz();
    }

    fn on_delivery(&mut self, now: SimTime, _ap: ApId, latency: SimTime) {
        if let Some(rows) = self.latency.as_mut() {
            rows.push(LatencyRow {
                time_s:            now.as_secs_f64(),
                delay_s:           latency.as_secs_f64(),
                channel_width_mhz: self.width_mhz,
                packet_size:       self.payload,
                band_ghz:          self.band_ghz,
            });
        }
    }

    fn on_snapshot(&mut self, _now: SimTime, records: &[SnapshotRecord]) {
        if records.is_empty() {
            return;
        }
        let rows: Vec<SnapshotRow> = records.iter().map(SnapshotRow::from).collect();
        self.rows_written += rows.len() as u64;
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);
    }

    fn on_run_end(&mut self, end: SimTime, _flows: &FlowStatsTable) {
        debug!(rows = self.rows_written, t = end.as_secs_f64(), "snapshot output closed");
        let result = self.writer.finish();
        self.store_err(result);
    }
}
