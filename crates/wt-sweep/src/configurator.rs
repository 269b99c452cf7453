//! Run Configurator: one sweep point in, one fully derived
//! [`RunConfiguration`] out.
//!
//! Everything a run needs beyond its three axis values is derived here:
//!
//! | Field                 | Derivation                                              |
//! |-----------------------|---------------------------------------------------------|
//! | `channel`             | `(band, width)` lookup in the channel table             |
//! | `client_interval`     | `client_count · payload · 8 / (rate_mbps · 1e6)` seconds |
//! | `client_start_jitter` | `max(floor, Normal(mean, std))` per client              |
//! | `seed`                | `derive_seed(sweep_seed, [payload, width, band])`       |
//!
//! The configurator keeps no state between calls, so a point's configuration
//! is the same whether it runs first, last, or on another thread.

use serde::{Deserialize, Serialize};

use wt_core::{
    Band, ClientId, ClientRng, ConfigError, ConfigResult, RunConfiguration, SimTime,
    channel_settings, config_key, derive_seed,
};

/// Start-time jitter distribution, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterSpec {
    pub mean_s:  f64,
    pub std_s:   f64,
    /// Lower clamp applied to every draw.  Must be non-negative.
    pub floor_s: f64,
}

impl Default for JitterSpec {
    fn default() -> Self {
        Self { mean_s: 0.0, std_s: 0.0, floor_s: 0.0 }
    }
}

/// One point of the sweep's cross product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPoint {
    pub payload_bytes: u32,
    pub width_mhz:     u16,
    pub band_ghz:      u32,
}

impl SweepPoint {
    /// `ps{payload}_w{width}_b{band}GHz`.  Defined even for points whose
    /// configuration fails, so failed runs can still be reported.
    pub fn key(&self) -> String {
        config_key(self.payload_bytes, self.width_mhz, self.band_ghz)
    }
}

/// Fixed (non-axis) parameters shared by every run of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfigurator {
    pub client_count:     u32,
    pub ap_count:         u32,
    pub distance_m:       f64,
    pub target_rate_mbps: f64,
    pub jitter:           JitterSpec,
    pub seed:             u64,
}

impl RunConfigurator {
    /// Derive the configuration of `point`.
    pub fn configure(&self, point: SweepPoint) -> ConfigResult<RunConfiguration> {
        let band    = Band::from_ghz(point.band_ghz)?;
        let channel = channel_settings(band, point.width_mhz)?;

        if self.ap_count == 0 {
            return Err(ConfigError::NonPositive { what: "AP count", value: 0.0 });
        }
        if !(self.distance_m.is_finite() && self.distance_m >= 0.0) {
            return Err(ConfigError::Invalid(format!("distance {} m", self.distance_m)));
        }

        let client_interval = send_interval(self.client_count, point.payload_bytes, self.target_rate_mbps)?;
        let seed = run_seed(self.seed, point);
        let client_start_jitter = draw_jitter(seed, self.client_count, &self.jitter)?;

        Ok(RunConfiguration {
            key:                 point.key(),
            payload_bytes:       point.payload_bytes,
            channel,
            client_count:        self.client_count,
            ap_count:            self.ap_count,
            distance_m:          self.distance_m,
            target_rate_mbps:    self.target_rate_mbps,
            client_interval,
            client_start_jitter,
            seed,
        })
    }
}

/// Per-client send interval that makes `client_count` clients sending
/// `payload_bytes` each offer `rate_mbps` in aggregate.
pub fn send_interval(client_count: u32, payload_bytes: u32, rate_mbps: f64) -> ConfigResult<SimTime> {
    if client_count == 0 {
        return Err(ConfigError::NonPositive { what: "client count", value: 0.0 });
    }
    if payload_bytes == 0 {
        return Err(ConfigError::NonPositive { what: "payload size", value: 0.0 });
    }
    if !(rate_mbps.is_finite() && rate_mbps > 0.0) {
        return Err(ConfigError::NonPositive { what: "target rate", value: rate_mbps });
    }
    let bits = f64::from(client_count) * f64::from(payload_bytes) * 8.0;
    let secs = bits / (rate_mbps * 1e6);
    let interval = SimTime::from_secs_f64(secs);
    if interval == SimTime::ZERO {
        return Err(ConfigError::NonPositive { what: "send interval", value: secs });
    }
    Ok(interval)
}

/// Seed of the run at `point`: a function of the sweep seed and the axis
/// values only.
pub fn run_seed(sweep_seed: u64, point: SweepPoint) -> u64 {
    derive_seed(
        sweep_seed,
        &[u64::from(point.payload_bytes), u64::from(point.width_mhz), u64::from(point.band_ghz)],
    )
}

/// One jitter value per client, each from that client's own stream.
pub fn draw_jitter(run_seed: u64, client_count: u32, spec: &JitterSpec) -> ConfigResult<Vec<SimTime>> {
    if !(spec.floor_s.is_finite() && spec.floor_s >= 0.0) {
        return Err(ConfigError::Jitter(format!("floor {} s must be non-negative", spec.floor_s)));
    }
    if !(spec.mean_s.is_finite() && spec.std_s.is_finite()) {
        return Err(ConfigError::Jitter(format!("mean {} s, std {} s", spec.mean_s, spec.std_s)));
    }
    (0..client_count)
        .map(|i| {
            let mut rng = ClientRng::new(run_seed, ClientId(i));
            let draw = rng
                .normal(spec.mean_s, spec.std_s)
                .map_err(|e| ConfigError::Jitter(format!("{e} (mean {}, std {})", spec.mean_s, spec.std_s)))?;
            Ok(SimTime::from_secs_f64(draw.max(spec.floor_s)))
        })
        .collect()
}
