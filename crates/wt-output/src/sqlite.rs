//! SQLite output backend (feature `sqlite`).
//!
//! Everything lands in a single `output.db` in the output directory, with
//! three tables: `snapshots`, `run_summaries` and `flow_summaries`.
//! Undefined metrics are stored as NULL.  Latency samples stay in
//! `latency.csv`.
//!
//! Several runs may hold a connection at once (parallel sweeps); writers
//! wait on the database lock instead of failing.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::csv::LATENCY_HEADER;
use crate::writer::{SnapshotWriter, SummaryWriter};
use crate::{FlowSummaryRow, LatencyRow, OutputResult, RunSummary, SnapshotRow};

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

fn open(dir: &Path) -> OutputResult<Connection> {
    let conn = Connection::open(dir.join("output.db"))?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous  = NORMAL;
         CREATE TABLE IF NOT EXISTS snapshots (
             config_key         TEXT    NOT NULL,
             time_s             REAL    NOT NULL,
             client_id          INTEGER NOT NULL,
             ap                 TEXT    NOT NULL,
             signal_dbm         REAL,
             queue_delay_ms     REAL,
             ap_station_count   INTEGER NOT NULL,
             ap_queue_depth     INTEGER NOT NULL,
             ap_throughput_mbps REAL,
             ap_utilization     REAL,
             delay_ms           REAL,
             jitter_ms          REAL,
             loss_rate          REAL,
             band_ghz           INTEGER NOT NULL,
             channel_width_mhz  INTEGER NOT NULL
         );
         CREATE TABLE IF NOT EXISTS run_summaries (
             config_key        TEXT    NOT NULL,
             packet_size       INTEGER NOT NULL,
             channel_width_mhz INTEGER NOT NULL,
             band_ghz          INTEGER NOT NULL,
             flows             INTEGER NOT NULL,
             bandwidth_mbps    REAL,
             drop_rate         REAL,
             status            TEXT    NOT NULL
         );
         CREATE TABLE IF NOT EXISTS flow_summaries (
             config_key     TEXT    NOT NULL,
             flow_id        INTEGER NOT NULL,
             source         TEXT    NOT NULL,
             destination    TEXT    NOT NULL,
             tx_packets     INTEGER NOT NULL,
             rx_packets     INTEGER NOT NULL,
             lost_packets   INTEGER NOT NULL,
             bandwidth_mbps REAL,
             drop_rate      REAL,
             mean_delay_ms  REAL,
             mean_jitter_ms REAL
         );",
    )?;
    Ok(conn)
}

// ── Per-run snapshots ─────────────────────────────────────────────────────────

/// Writes one run's snapshot records into `output.db`, tagged with the
/// run's key.
pub struct SqliteSnapshotWriter {
    conn: Connection,
    key:  String,
}

impl SqliteSnapshotWriter {
    pub fn new(dir: &Path, key: &str) -> OutputResult<Self> {
        Ok(Self { conn: open(dir)?, key: key.to_owned() })
    }
}

impl SnapshotWriter for SqliteSnapshotWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO snapshots \
                 (config_key, time_s, client_id, ap, signal_dbm, queue_delay_ms, \
                  ap_station_count, ap_queue_depth, ap_throughput_mbps, ap_utilization, \
                  delay_ms, jitter_ms, loss_rate, band_ghz, channel_width_mhz) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    self.key,
                    row.time_s,
                    row.client_id,
                    row.ap,
                    row.signal_dbm,
                    row.queue_delay_ms,
                    row.ap_station_count,
                    row.ap_queue_depth,
                    row.ap_throughput_mbps,
                    row.ap_utilization,
                    row.delay_ms,
                    row.jitter_ms,
                    row.loss_rate,
                    row.band_ghz,
                    row.channel_width_mhz,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Every batch commits on write; nothing is buffered.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

// ── Sweep-level tables ────────────────────────────────────────────────────────

/// Writes run summaries and flow rows into `output.db`; latency samples go
/// to the CSV backend's `latency.csv`.
pub struct SqliteSummaryWriter {
    conn:     Connection,
    latency:  csv::Writer<std::fs::File>,
    finished: bool,
}

impl SqliteSummaryWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            conn:     open(dir)?,
            latency:  crate::csv::append_with_header(&dir.join("latency.csv"), &LATENCY_HEADER)?,
            finished: false,
        })
    }
}

impl SummaryWriter for SqliteSummaryWriter {
    fn write_summary(&mut self, row: &RunSummary) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO run_summaries \
             (config_key, packet_size, channel_width_mhz, band_ghz, flows, \
              bandwidth_mbps, drop_rate, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.config_key,
                row.packet_size,
                row.channel_width_mhz,
                row.band_ghz,
                row.flows,
                row.bandwidth_mbps,
                row.drop_rate,
                row.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn write_flows(&mut self, rows: &[FlowSummaryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO flow_summaries \
                 (config_key, flow_id, source, destination, tx_packets, rx_packets, \
                  lost_packets, bandwidth_mbps, drop_rate, mean_delay_ms, mean_jitter_ms) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.config_key,
                    row.flow_id,
                    row.source.to_string(),
                    row.destination.to_string(),
                    row.tx_packets as i64,
                    row.rx_packets as i64,
                    row.lost_packets as i64,
                    row.bandwidth_mbps,
                    row.drop_rate,
                    row.mean_delay_ms,
                    row.mean_jitter_ms,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_latency(&mut self, rows: &[LatencyRow]) -> OutputResult<()> {
        crate::csv::write_latency_rows(&mut self.latency, rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.latency.flush()?;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
