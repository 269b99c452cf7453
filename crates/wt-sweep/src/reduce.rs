//! Reduce a finished run's flow table to its summary and per-flow rows.

use wt_core::RunConfiguration;
use wt_output::{FlowSummaryRow, RunStatus, RunSummary};
use wt_sim::FlowStatsTable;

/// One summary row for the whole run.
///
/// Bandwidth is `Σ rx_bytes · 8 / (duration · 1e6)` over the full run
/// duration; drop rate is `Σ lost / Σ tx`, undefined when nothing was sent.
pub fn summarize(config: &RunConfiguration, duration_s: f64, flows: &FlowStatsTable) -> RunSummary {
    let agg = flows.aggregate();
    RunSummary {
        config_key:        config.key.clone(),
        packet_size:       config.payload_bytes,
        channel_width_mhz: config.width_mhz(),
        band_ghz:          config.band().ghz(),
        flows:             u32::try_from(agg.flows).unwrap_or(u32::MAX),
        bandwidth_mbps:    agg.throughput_mbps(duration_s),
        drop_rate:         agg.loss_rate(),
        status:            RunStatus::Ok,
    }
}

/// One row per flow in the table, ascending flow id, idle flows included.
pub fn flow_rows(key: &str, duration_s: f64, flows: &FlowStatsTable) -> Vec<FlowSummaryRow> {
    flows
        .iter()
        .map(|r| FlowSummaryRow {
            config_key:     key.to_owned(),
            flow_id:        r.id.0,
            source:         r.key.source,
            destination:    r.key.destination,
            tx_packets:     r.stats.tx_packets,
            rx_packets:     r.stats.rx_packets,
            lost_packets:   r.stats.lost_packets,
            bandwidth_mbps: r.stats.bandwidth_mbps(duration_s),
            drop_rate:      r.stats.drop_rate(),
            mean_delay_ms:  r.stats.mean_delay_ms(),
            mean_jitter_ms: r.stats.mean_jitter_ms(),
        })
        .collect()
}
