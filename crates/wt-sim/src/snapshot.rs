//! The snapshot joiner: one time-aligned record per associated client.

use wt_core::{
    Band, ChannelSettings, ClientId, MacAddr, RunConfiguration, SimTime, ThroughputSource, ratio,
};
use wt_trace::EventStore;

use crate::Medium;

/// One client's view of the network at a snapshot tick.
///
/// Undefined metrics are `None`, never zero.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotRecord {
    pub time:               SimTime,
    pub client:             ClientId,
    pub ap:                 MacAddr,
    pub signal_dbm:         Option<f64>,
    pub queue_delay_ms:     Option<f64>,
    /// Clients associated with the same AP, this one included.
    pub ap_station_count:   u32,
    pub ap_queue_depth:     u32,
    pub ap_throughput_mbps: Option<f64>,
    pub ap_utilization:     Option<f64>,
    /// Run-level mean one-way delay over all active flows.
    pub delay_ms:           Option<f64>,
    pub jitter_ms:          Option<f64>,
    pub loss_rate:          Option<f64>,
    pub band:               Band,
    pub channel_width_mhz:  u16,
}

/// Joins the event store, the AP receive counters and the flow table into
/// [`SnapshotRecord`]s.
#[derive(Copy, Clone, Debug)]
pub struct SnapshotJoiner {
    payload_bytes: u32,
    channel:       ChannelSettings,
    source:        ThroughputSource,
}

impl SnapshotJoiner {
    pub fn new(config: &RunConfiguration, source: ThroughputSource) -> Self {
        Self {
            payload_bytes: config.payload_bytes,
            channel:       config.channel,
            source,
        }
    }

    /// Build the records for tick `now`.
    ///
    /// Recomputes every AP's throughput and utilization in `store` first,
    /// then emits one record per associated client in ascending client id.
    /// Clients sharing an AP share every AP-level field.
    pub fn join<M: Medium + ?Sized>(
        &self,
        now:    SimTime,
        store:  &mut EventStore,
        medium: &M,
    ) -> Vec<SnapshotRecord> {
        let elapsed_s = now.as_secs_f64();
        let flows     = medium.flow_stats().aggregate();
        let capacity  = self.channel.capacity_mbps();

        // ── Per-AP load ───────────────────────────────────────────────────
        for ap in store.aps_mut() {
            let throughput = match self.source {
                ThroughputSource::ApReceiveCounter => medium
                    .ap_received_packets(ap.id)
                    .and_then(|rx| {
                        ratio(rx as f64 * self.payload_bytes as f64 * 8.0, elapsed_s * 1e6)
                    }),
                ThroughputSource::FlowCounters => flows.throughput_mbps(elapsed_s),
            };
            ap.throughput_mbps = throughput;
            ap.utilization     = throughput.and_then(|t| ratio(t, capacity));
        }

        // ── Per-client rows ───────────────────────────────────────────────
        let delay_ms  = flows.mean_delay_ms();
        let jitter_ms = flows.mean_jitter_ms();
        let loss_rate = flows.loss_rate();

        store
            .associated_clients()
            .filter_map(|client| {
                let mac = client.associated_ap?;
                let ap  = store.ap_by_mac(mac);
                Some(SnapshotRecord {
                    time:               now,
                    client:             client.id,
                    ap:                 mac,
                    signal_dbm:         client.last_signal_dbm,
                    queue_delay_ms:     client.last_queue_delay_ms,
                    ap_station_count:   store.station_count(mac),
                    ap_queue_depth:     ap.map_or(0, |a| a.queue_depth),
                    ap_throughput_mbps: ap.and_then(|a| a.throughput_mbps),
                    ap_utilization:     ap.and_then(|a| a.utilization),
                    delay_ms,
                    jitter_ms,
                    loss_rate,
                    band:               self.channel.band,
                    channel_width_mhz:  self.channel.width_mhz,
                })
            })
            .collect()
    }
}
