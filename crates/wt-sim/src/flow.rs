//! Per-flow statistics as exposed by the engine's flow monitor.
//!
//! # Counter semantics
//!
//! `tx_packets` counts every packet a flow's sender handed to the network,
//! lost ones included.  `lost_packets` is the subset of those that never
//! reached the receiver.  Loss and drop rates are therefore `lost / tx`.
//! `delay_sum` and `jitter_sum` accumulate over received packets only;
//! jitter is the absolute delay difference between consecutive receptions,
//! so a flow with `n` receptions contributes `n - 1` jitter samples.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use wt_core::{FlowId, SimTime, ratio};

/// IANA protocol number for UDP.
pub const PROTO_UDP: u8 = 17;

/// Five-tuple identifying a flow.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FlowKey {
    pub source:           Ipv4Addr,
    pub destination:      Ipv4Addr,
    pub protocol:         u8,
    pub source_port:      u16,
    pub destination_port: u16,
}

/// Cumulative counters for one flow.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct FlowStats {
    pub tx_packets:   u64,
    pub rx_packets:   u64,
    pub lost_packets: u64,
    pub tx_bytes:     u64,
    pub rx_bytes:     u64,
    pub delay_sum:    SimTime,
    pub jitter_sum:   SimTime,
    pub first_tx:     Option<SimTime>,
    pub last_rx:      Option<SimTime>,
}

impl FlowStats {
    /// A flow that has sent or received anything.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.tx_packets > 0 || self.rx_packets > 0
    }

    pub fn mean_delay_ms(&self) -> Option<f64> {
        ratio(self.delay_sum.as_millis_f64(), self.rx_packets as f64)
    }

    pub fn mean_jitter_ms(&self) -> Option<f64> {
        if self.rx_packets <= 1 {
            return None;
        }
        ratio(self.jitter_sum.as_millis_f64(), (self.rx_packets - 1) as f64)
    }

    pub fn drop_rate(&self) -> Option<f64> {
        ratio(self.lost_packets as f64, self.tx_packets as f64)
    }

    /// Received bits per second over `duration_s`, in Mbps.
    pub fn bandwidth_mbps(&self, duration_s: f64) -> Option<f64> {
        ratio(self.rx_bytes as f64 * 8.0, duration_s * 1e6)
    }
}

/// One row of the flow table.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FlowRecord {
    pub id:    FlowId,
    pub key:   FlowKey,
    pub stats: FlowStats,
}

/// Every flow the engine has classified, in ascending id order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowStatsTable {
    flows: BTreeMap<FlowId, FlowRecord>,
}

impl FlowStatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `id`, created zeroed with `key` on first use.
    pub fn entry(&mut self, id: FlowId, key: FlowKey) -> &mut FlowStats {
        &mut self
            .flows
            .entry(id)
            .or_insert(FlowRecord { id, key, stats: FlowStats::default() })
            .stats
    }

    /// Replace the record for `record.id`.
    pub fn insert(&mut self, record: FlowRecord) {
        self.flows.insert(record.id, record);
    }

    pub fn get(&self, id: FlowId) -> Option<&FlowRecord> {
        self.flows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowRecord> {
        self.flows.values()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Sum the counters of every active flow.
    pub fn aggregate(&self) -> FlowAggregate {
        self.iter()
            .filter(|r| r.stats.is_active())
            .fold(FlowAggregate::default(), |mut acc, r| {
                let s = &r.stats;
                acc.flows        += 1;
                acc.tx_packets   += s.tx_packets;
                acc.rx_packets   += s.rx_packets;
                acc.lost_packets += s.lost_packets;
                acc.rx_bytes     += s.rx_bytes;
                acc.delay_sum    += s.delay_sum;
                acc.jitter_sum   += s.jitter_sum;
                acc
            })
    }
}

/// Run-level sums over active flows.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct FlowAggregate {
    pub flows:        usize,
    pub tx_packets:   u64,
    pub rx_packets:   u64,
    pub lost_packets: u64,
    pub rx_bytes:     u64,
    pub delay_sum:    SimTime,
    pub jitter_sum:   SimTime,
}

impl FlowAggregate {
    /// Aggregate throughput over `elapsed_s` seconds, in Mbps.
    pub fn throughput_mbps(&self, elapsed_s: f64) -> Option<f64> {
        ratio(self.rx_bytes as f64 * 8.0, elapsed_s * 1e6)
    }

    pub fn mean_delay_ms(&self) -> Option<f64> {
        ratio(self.delay_sum.as_millis_f64(), self.rx_packets as f64)
    }

    pub fn mean_jitter_ms(&self) -> Option<f64> {
        if self.rx_packets <= 1 {
            return None;
        }
        ratio(self.jitter_sum.as_millis_f64(), (self.rx_packets - 1) as f64)
    }

    pub fn loss_rate(&self) -> Option<f64> {
        ratio(self.lost_packets as f64, self.tx_packets as f64)
    }
}
