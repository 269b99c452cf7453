//! `flowmon_<key>.json` — the run's full flow table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use wt_sim::FlowStatsTable;

use crate::OutputResult;

#[derive(Debug, Serialize)]
struct FlowDump<'a> {
    config_key: &'a str,
    duration_s: f64,
    flows:      Vec<FlowEntry>,
}

#[derive(Debug, Serialize)]
struct FlowEntry {
    flow_id:          u32,
    source:           Ipv4Addr,
    destination:      Ipv4Addr,
    protocol:         u8,
    source_port:      u16,
    destination_port: u16,
    tx_packets:       u64,
    rx_packets:       u64,
    lost_packets:     u64,
    tx_bytes:         u64,
    rx_bytes:         u64,
    delay_sum_s:      f64,
    jitter_sum_s:     f64,
    first_tx_s:       Option<f64>,
    last_rx_s:        Option<f64>,
}

/// File name of a run's flow dump.
pub fn flow_dump_file_name(key: &str) -> String {
    format!("flowmon_{key}.json")
}

/// Write `flows` as pretty JSON to `dir/flowmon_<key>.json`.
pub fn write_flow_dump(
    dir:        &Path,
    key:        &str,
    duration_s: f64,
    flows:      &FlowStatsTable,
) -> OutputResult<PathBuf> {
    let dump = FlowDump {
        config_key: key,
        duration_s,
        flows: flows
            .iter()
            .map(|r| FlowEntry {
                flow_id:          r.id.0,
                source:           r.key.source,
                destination:      r.key.destination,
                protocol:         r.key.protocol,
                source_port:      r.key.source_port,
                destination_port: r.key.destination_port,
                tx_packets:       r.stats.tx_packets,
                rx_packets:       r.stats.rx_packets,
                lost_packets:     r.stats.lost_packets,
                tx_bytes:         r.stats.tx_bytes,
                rx_bytes:         r.stats.rx_bytes,
                delay_sum_s:      r.stats.delay_sum.as_secs_f64(),
                jitter_sum_s:     r.stats.jitter_sum.as_secs_f64(),
                first_tx_s:       r.stats.first_tx.map(|t| t.as_secs_f64()),
                last_rx_s:        r.stats.last_rx.map(|t| t.as_secs_f64()),
            })
            .collect(),
    };

    let path = dir.join(flow_dump_file_name(key));
    let mut file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut file, &dump)?;
    file.flush()?;
    Ok(path)
}
