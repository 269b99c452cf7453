//! Plain data row types written by output backends.
//!
//! Undefined metrics are `None`.  Text backends render them as `nan`;
//! SQLite and Parquet store NULL.

use std::fmt;
use std::net::Ipv4Addr;

use wt_sim::SnapshotRecord;

/// One snapshot record, flattened for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub time_s:             f64,
    pub client_id:          u32,
    /// AP MAC, colon-separated lowercase hex.
    pub ap:                 String,
    pub signal_dbm:         Option<f64>,
    pub queue_delay_ms:     Option<f64>,
    pub ap_station_count:   u32,
    pub ap_queue_depth:     u32,
    pub ap_throughput_mbps: Option<f64>,
    pub ap_utilization:     Option<f64>,
    pub delay_ms:           Option<f64>,
    pub jitter_ms:          Option<f64>,
    pub loss_rate:          Option<f64>,
    pub band_ghz:           u32,
    pub channel_width_mhz:  u16,
}

impl From<&SnapshotRecord> for SnapshotRow {
    fn from(r: &SnapshotRecord) -> Self {
        Self {
            time_s:             r.time.as_secs_f64(),
            client_id:          r.client.0,
            ap:                 r.ap.to_string(),
            signal_dbm:         r.signal_dbm,
            queue_delay_ms:     r.queue_delay_ms,
            ap_station_count:   r.ap_station_count,
            ap_queue_depth:     r.ap_queue_depth,
            ap_throughput_mbps: r.ap_throughput_mbps,
            ap_utilization:     r.ap_utilization,
            delay_ms:           r.delay_ms,
            jitter_ms:          r.jitter_ms,
            loss_rate:          r.loss_rate,
            band_ghz:           r.band.ghz(),
            channel_width_mhz:  r.channel_width_mhz,
        }
    }
}

/// Outcome of a sweep point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Ok     => "ok",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the sweep summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub config_key:        String,
    pub packet_size:       u32,
    pub channel_width_mhz: u16,
    pub band_ghz:          u32,
    /// Flows with any traffic.
    pub flows:             u32,
    /// Σ rx bytes · 8 / (sim time · 1e6).
    pub bandwidth_mbps:    Option<f64>,
    /// Σ lost / Σ tx.
    pub drop_rate:         Option<f64>,
    pub status:            RunStatus,
}

impl RunSummary {
    /// The row recorded for a sweep point that never produced results.
    pub fn failed(config_key: String, packet_size: u32, channel_width_mhz: u16, band_ghz: u32) -> Self {
        Self {
            config_key,
            packet_size,
            channel_width_mhz,
            band_ghz,
            flows:          0,
            bandwidth_mbps: None,
            drop_rate:      None,
            status:         RunStatus::Failed,
        }
    }
}

/// Per-flow statistics of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSummaryRow {
    pub config_key:     String,
    pub flow_id:        u32,
    pub source:         Ipv4Addr,
    pub destination:    Ipv4Addr,
    pub tx_packets:     u64,
    pub rx_packets:     u64,
    pub lost_packets:   u64,
    pub bandwidth_mbps: Option<f64>,
    pub drop_rate:      Option<f64>,
    pub mean_delay_ms:  Option<f64>,
    pub mean_jitter_ms: Option<f64>,
}

/// One application-level reception: when, and how long it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyRow {
    pub time_s:            f64,
    pub delay_s:           f64,
    pub channel_width_mhz: u16,
    pub packet_size:       u32,
    pub band_ghz:          u32,
}
