//! Per-run configuration handed from the configurator to run setup.

use crate::radio::ChannelSettings;
use crate::{Band, ConfigError, ConfigResult, SimTime};

/// How traffic generators get installed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TrafficStart {
    /// Install each client's generator after its first association, once the
    /// AP's address has been resolved (association → resolution delay →
    /// start offset).
    #[default]
    OnAssociation,
    /// Install every generator at setup, aimed at the first AP, starting at a
    /// fixed instant (plus the client's jitter).
    AtFixedTime(SimTime),
}

/// Where the snapshot joiner takes access-point throughput from.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThroughputSource {
    /// Per-AP application receive counter.
    #[default]
    ApReceiveCounter,
    /// Run-level aggregate over the flow-statistics table.
    FlowCounters,
}

/// Clock parameters shared by every run of a sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    /// Run stop time.  Snapshot ticks and generators never outlive it.
    pub sim_time: SimTime,
    /// When the AP-side receivers start accepting traffic.
    pub server_start: SimTime,
    /// First snapshot tick.
    pub snapshot_start: SimTime,
    /// Snapshot cadence.
    pub snapshot_interval: SimTime,
    /// Association → address-resolution delay.
    pub resolution_delay: SimTime,
    /// Resolution → generator start offset.
    pub generator_start_offset: SimTime,
    pub traffic_start: TrafficStart,
    pub throughput_source: ThroughputSource,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sim_time:               SimTime::from_secs(10),
            server_start:           SimTime::from_millis(500),
            snapshot_start:         SimTime::from_secs(1),
            snapshot_interval:      SimTime::from_secs(1),
            resolution_delay:       SimTime::from_millis(50),
            generator_start_offset: SimTime::from_millis(10),
            traffic_start:          TrafficStart::OnAssociation,
            throughput_source:      ThroughputSource::ApReceiveCounter,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sim_time == SimTime::ZERO {
            return Err(ConfigError::NonPositive { what: "simulation time", value: 0.0 });
        }
        if self.snapshot_interval == SimTime::ZERO {
            return Err(ConfigError::NonPositive { what: "snapshot interval", value: 0.0 });
        }
        Ok(())
    }

    /// Snapshot instants `start, start + interval, …` up to and including
    /// `sim_time`.
    pub fn snapshot_ticks(&self) -> impl Iterator<Item = SimTime> + '_ {
        let interval = self.snapshot_interval.max(SimTime::from_nanos(1));
        std::iter::successors(Some(self.snapshot_start), move |&t| t.checked_add(interval))
            .take_while(move |&t| t <= self.sim_time)
    }
}

/// One point of a sweep with every derived parameter resolved.
///
/// Built by the run configurator; nothing in it depends on any earlier run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfiguration {
    /// `ps{payload}_w{width}_b{band}GHz`: names output files and summary rows.
    pub key:                 String,
    pub payload_bytes:       u32,
    pub channel:             ChannelSettings,
    pub client_count:        u32,
    pub ap_count:            u32,
    pub distance_m:          f64,
    /// Aggregate offered load across all clients.
    pub target_rate_mbps:    f64,
    /// Per-client send interval derived from the target rate.
    pub client_interval:     SimTime,
    /// Start-time jitter, one entry per client.
    pub client_start_jitter: Vec<SimTime>,
    /// Seed this run's jitter was drawn with.
    pub seed:                u64,
}

impl RunConfiguration {
    #[inline]
    pub fn band(&self) -> Band {
        self.channel.band
    }

    #[inline]
    pub fn width_mhz(&self) -> u16 {
        self.channel.width_mhz
    }

    /// Jitter for `client`, zero if the client is out of range.
    pub fn jitter_for(&self, client: crate::ClientId) -> SimTime {
        self.client_start_jitter
            .get(client.index())
            .copied()
            .unwrap_or(SimTime::ZERO)
    }
}

/// Key naming a sweep point: `ps1500_w80_b5GHz`.
pub fn config_key(payload_bytes: u32, width_mhz: u16, band_ghz: u32) -> String {
    format!("ps{payload_bytes}_w{width_mhz}_b{band_ghz}GHz")
}
