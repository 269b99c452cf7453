//! `SweepConfig`: the JSON-loadable description of a whole sweep.
//!
//! Every field has a default, so `{}` is a valid config:
//!
//! ```json
//! {
//!   "payload_sizes": [1500, 3000],
//!   "channel_widths": [80, 160],
//!   "bands": [5, 6],
//!   "client_count": 10,
//!   "target_rate_mbps": 200,
//!   "jitter": { "mean_s": 0.01, "std_s": 0.005 },
//!   "timing": { "sim_time_s": 10, "traffic_start": { "at_fixed_time": { "start_s": 1.0 } } },
//!   "output": { "dir": "results", "backend": "csv", "latency": true }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use wt_core::{SimTime, ThroughputSource, TimingConfig, TrafficStart};
use wt_output::OutputBackend;

use crate::configurator::{JitterSpec, RunConfigurator, SweepPoint};
use crate::{SweepError, SweepResult};

/// Axes, fixed run parameters, clock and output settings of one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub payload_sizes:    Vec<u32>,
    pub channel_widths:   Vec<u16>,
    pub bands:            Vec<u32>,
    pub client_count:     u32,
    pub ap_count:         u32,
    pub distance_m:       f64,
    pub target_rate_mbps: f64,
    pub seed:             u64,
    pub jitter:           JitterSpec,
    pub timing:           TimingSpec,
    pub output:           OutputSpec,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            payload_sizes:    (1..=10).map(|k| 1500 * k).collect(),
            channel_widths:   vec![80, 160],
            bands:            vec![5, 6],
            client_count:     10,
            ap_count:         1,
            distance_m:       20.0,
            target_rate_mbps: 200.0,
            seed:             1,
            jitter:           JitterSpec::default(),
            timing:           TimingSpec::default(),
            output:           OutputSpec::default(),
        }
    }
}

impl SweepConfig {
    /// Parse a JSON config.  Missing fields take their defaults.
    pub fn from_json(text: &str) -> SweepResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse the JSON config at `path`.
    pub fn load(path: &Path) -> SweepResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SweepError::ReadConfig { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
    }

    /// Pretty JSON, as accepted by [`from_json`][Self::from_json].
    pub fn to_json(&self) -> SweepResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The cross product payload × width × band, payload outermost, in the
    /// order the axes are declared.
    pub fn points(&self) -> SweepResult<Vec<SweepPoint>> {
        if self.payload_sizes.is_empty() {
            return Err(SweepError::EmptyAxis("payload_sizes"));
        }
        if self.channel_widths.is_empty() {
            return Err(SweepError::EmptyAxis("channel_widths"));
        }
        if self.bands.is_empty() {
            return Err(SweepError::EmptyAxis("bands"));
        }
        let mut points =
            Vec::with_capacity(self.payload_sizes.len() * self.channel_widths.len() * self.bands.len());
        for &payload_bytes in &self.payload_sizes {
            for &width_mhz in &self.channel_widths {
                for &band_ghz in &self.bands {
                    points.push(SweepPoint { payload_bytes, width_mhz, band_ghz });
                }
            }
        }
        Ok(points)
    }

    pub fn configurator(&self) -> RunConfigurator {
        RunConfigurator {
            client_count:     self.client_count,
            ap_count:         self.ap_count,
            distance_m:       self.distance_m,
            target_rate_mbps: self.target_rate_mbps,
            jitter:           self.jitter,
            seed:             self.seed,
        }
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

/// How generators are installed, in config units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficStartSpec {
    #[default]
    OnAssociation,
    AtFixedTime { start_s: f64 },
}

impl From<TrafficStartSpec> for TrafficStart {
    fn from(spec: TrafficStartSpec) -> Self {
        match spec {
            TrafficStartSpec::OnAssociation => TrafficStart::OnAssociation,
            TrafficStartSpec::AtFixedTime { start_s } => {
                TrafficStart::AtFixedTime(SimTime::from_secs_f64(start_s))
            }
        }
    }
}

/// [`TimingConfig`] in seconds and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSpec {
    pub sim_time_s:                f64,
    pub server_start_s:            f64,
    pub snapshot_start_s:          f64,
    pub snapshot_interval_s:       f64,
    pub resolution_delay_ms:       f64,
    pub generator_start_offset_ms: f64,
    pub traffic_start:             TrafficStartSpec,
    pub throughput_source:         ThroughputSource,
}

impl Default for TimingSpec {
    fn default() -> Self {
        Self {
            sim_time_s:                10.0,
            server_start_s:            0.5,
            snapshot_start_s:          1.0,
            snapshot_interval_s:       1.0,
            resolution_delay_ms:       50.0,
            generator_start_offset_ms: 10.0,
            traffic_start:             TrafficStartSpec::OnAssociation,
            throughput_source:         ThroughputSource::ApReceiveCounter,
        }
    }
}

impl TimingSpec {
    pub fn to_timing(&self) -> TimingConfig {
        TimingConfig {
            sim_time:               SimTime::from_secs_f64(self.sim_time_s),
            server_start:           SimTime::from_secs_f64(self.server_start_s),
            snapshot_start:         SimTime::from_secs_f64(self.snapshot_start_s),
            snapshot_interval:      SimTime::from_secs_f64(self.snapshot_interval_s),
            resolution_delay:       SimTime::from_secs_f64(self.resolution_delay_ms / 1e3),
            generator_start_offset: SimTime::from_secs_f64(self.generator_start_offset_ms / 1e3),
            traffic_start:          self.traffic_start.into(),
            throughput_source:      self.throughput_source,
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Where results go and which optional tables are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    pub dir:       PathBuf,
    pub backend:   OutputBackend,
    /// Per-run snapshot tables.
    pub snapshots: bool,
    /// Per-run `flowmon_<key>.json`.
    pub flow_dump: bool,
    /// One `latency.csv` row per delivered packet.
    pub latency:   bool,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            dir:       PathBuf::from("output"),
            backend:   OutputBackend::Csv,
            snapshots: true,
            flow_dump: true,
            latency:   false,
        }
    }
}
