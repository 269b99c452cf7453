//! `FluidMedium` — a deterministic stand-in for the wireless engine.
//!
//! # Model
//!
//! ```text
//! APs:      node i, x = i * 2 * distance, 10.1.1.(i + 1)
//! Stations: node ap_count + j, on a circle of radius `distance` around
//!           AP (j mod ap_count), address after the APs
//!
//! Associate   → Association + first Signal, then Signal every interval
//! Send        → full FIFO: tx + lost
//!               else Enqueue, backlog + 1, kick the BSS channel
//! BSS channel → round-robin over its stations' FIFOs, one frame at a time:
//!               Dequeue, backlog − 1, busy for airtime → TxDone
//! TxDone      → receiver listening: rx + delay + jitter, Delivered
//!               otherwise lost
//! ```
//!
//! Each BSS reports its total station backlog as the AP queue depth.
//! There is no contention between BSSs, no fading, and no retry.

use std::collections::{BTreeMap, VecDeque};
use std::net::Ipv4Addr;

use tracing::debug;

use wt_core::{
    ApId, ClientId, FlowId, MacAddr, NodeId, PacketId, RunConfiguration, SimTime, TimingConfig,
};
use wt_sim::{FlowKey, FlowStatsTable, GeneratorSpec, Medium, PROTO_UDP, SimError, SimResult};
use wt_trace::{ApContext, ClientContext, Device, NodeRole, Topology, TopologyNode, TraceEvent};

use crate::FluidParams;
use crate::event::{Agenda, Kind};

const BASE_ADDR: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 0);
/// First ephemeral port handed to generators.
const FIRST_SOURCE_PORT: u16 = 49153;

#[derive(Copy, Clone, Debug)]
struct Queued {
    packet:  PacketId,
    sent_at: SimTime,
}

#[derive(Clone, Debug)]
struct Generator {
    spec:       GeneratorSpec,
    flow:       FlowId,
    /// Delay of the previous reception, for jitter.
    last_delay: Option<SimTime>,
}

#[derive(Clone, Debug)]
struct Station {
    ctx:        ClientContext,
    ap:         ApId,
    signal_dbm: f64,
    fifo:       VecDeque<Queued>,
    generator:  Option<Generator>,
}

#[derive(Clone, Debug)]
struct Bss {
    ctx:      ApContext,
    mac:      MacAddr,
    ip:       Ipv4Addr,
    stations: Vec<ClientId>,
    /// Next station the channel serves.
    cursor:   usize,
    busy:     bool,
    backlog:  u32,
    received: u64,
}

/// Deterministic queueing engine over one or more BSSs.
pub struct FluidMedium {
    params:        FluidParams,
    topology:      Topology,
    payload_bytes: u32,
    width_mhz:     u16,
    server_start:  SimTime,
    stop:          SimTime,
    aps:           Vec<Bss>,
    stations:      Vec<Station>,
    agenda:        Agenda,
    flows:         FlowStatsTable,
    next_packet:   u64,
}

impl FluidMedium {
    /// Build the network for `config`: place nodes, assign addresses, and
    /// schedule every station's association.
    pub fn new(config: &RunConfiguration, timing: &TimingConfig, params: FluidParams) -> Self {
        let ap_count     = config.ap_count.max(1);
        let client_count = config.client_count;
        let distance     = config.distance_m;
        let freq_mhz     = config.band().reference_mhz();

        let mut nodes    = Vec::with_capacity((ap_count + client_count) as usize);
        let mut aps      = Vec::with_capacity(ap_count as usize);
        let mut stations = Vec::with_capacity(client_count as usize);

        for i in 0..ap_count {
            let node = NodeId(i);
            let mac  = MacAddr::from_index(u64::from(i) + 1);
            let ip   = address(i);
            nodes.push(TopologyNode {
                node,
                role:    NodeRole::AccessPoint(ApId(i)),
                devices: vec![Device { mac }],
                ipv4:    vec![Ipv4Addr::LOCALHOST, ip],
            });
            aps.push(Bss {
                ctx:      ApContext { ap: ApId(i), node },
                mac,
                ip,
                stations: Vec::new(),
                cursor:   0,
                busy:     false,
                backlog:  0,
                received: 0,
            });
        }

        let mut agenda = Agenda::default();
        for j in 0..client_count {
            let node   = NodeId(ap_count + j);
            let client = ClientId(j);
            let ap     = ApId(j % ap_count);
            nodes.push(TopologyNode {
                node,
                role:    NodeRole::Client(client),
                devices: vec![Device { mac: MacAddr::from_index(u64::from(ap_count + j) + 1) }],
                ipv4:    vec![Ipv4Addr::LOCALHOST, address(ap_count + j)],
            });
            aps[ap.index()].stations.push(client);
            stations.push(Station {
                ctx:        ClientContext { client, node },
                ap,
                signal_dbm: params.signal_dbm(distance, freq_mhz),
                fifo:       VecDeque::new(),
                generator:  None,
            });
            let at = SimTime(params.association_spacing.0.saturating_mul(u64::from(j) + 1));
            agenda.push(at, Kind::Associate { client });
        }

        Self {
            params,
            topology: Topology::new(nodes),
            payload_bytes: config.payload_bytes,
            width_mhz: config.width_mhz(),
            server_start: timing.server_start,
            stop: timing.sim_time,
            aps,
            stations,
            agenda,
            flows: FlowStatsTable::new(),
            next_packet: 0,
        }
    }

    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    // ── Event handlers ────────────────────────────────────────────────────

    fn associate(&mut self, now: SimTime, client: ClientId, out: &mut Vec<TraceEvent>) {
        let st  = &self.stations[client.index()];
        let bss = &self.aps[st.ap.index()];
        out.push(TraceEvent::Association { ctx: st.ctx, ap: bss.mac });
        out.push(TraceEvent::Signal { ctx: st.ctx, dbm: st.signal_dbm });
        self.schedule_signal(now, client);
    }

    fn schedule_signal(&mut self, now: SimTime, client: ClientId) {
        let next = now + self.params.signal_interval;
        if next <= self.stop {
            self.agenda.push(next, Kind::SignalReport { client });
        }
    }

    fn send(&mut self, now: SimTime, client: ClientId, out: &mut Vec<TraceEvent>) {
        let limit   = self.params.queue_limit;
        let payload = self.payload_bytes;
        let st      = &mut self.stations[client.index()];
        let Some(generator) = st.generator.as_ref() else { return };
        let (spec, flow) = (generator.spec, generator.flow);

        let key   = flow_key(&self.topology, spec, client);
        let stats = self.flows.entry(flow, key);
        stats.tx_packets += 1;
        stats.tx_bytes   += u64::from(payload);
        stats.first_tx.get_or_insert(now);

        if st.fifo.len() >= limit {
            stats.lost_packets += 1;
        } else {
            let packet = PacketId(self.next_packet);
            self.next_packet += 1;
            st.fifo.push_back(Queued { packet, sent_at: now });
            out.push(TraceEvent::Enqueue { packet });

            let ap = st.ap;
            self.set_backlog(ap, |b| b + 1, out);
            self.try_transmit(now, ap, out);
        }

        let next = now + spec.interval.max(SimTime::from_nanos(1));
        if next < spec.stop {
            self.agenda.push(next, Kind::Send { client });
        }
    }

    /// Start the next frame on `ap`'s channel if it is idle.
    fn try_transmit(&mut self, now: SimTime, ap: ApId, out: &mut Vec<TraceEvent>) {
        let bss = &mut self.aps[ap.index()];
        if bss.busy || bss.stations.is_empty() {
            return;
        }
        let n = bss.stations.len();
        let next = (0..n)
            .map(|k| (bss.cursor + k) % n)
            .find(|&k| !self.stations[bss.stations[k].index()].fifo.is_empty());
        let Some(k) = next else { return };

        let client = bss.stations[k];
        bss.cursor = (k + 1) % n;
        bss.busy   = true;

        let st = &mut self.stations[client.index()];
        let Some(q) = st.fifo.pop_front() else { return };
        out.push(TraceEvent::Dequeue { ctx: st.ctx, packet: q.packet });
        self.set_backlog(ap, |b| b.saturating_sub(1), out);

        let done = now + self.params.airtime(self.payload_bytes, self.width_mhz);
        self.agenda.push(done, Kind::TxDone { ap, client, packet: q.packet, sent_at: q.sent_at });
    }

    fn tx_done(
        &mut self,
        now:     SimTime,
        ap:      ApId,
        client:  ClientId,
        packet:  PacketId,
        sent_at: SimTime,
        out:     &mut Vec<TraceEvent>,
    ) {
        self.aps[ap.index()].busy = false;
        self.deliver(now, client, packet, sent_at, out);
        self.try_transmit(now, ap, out);
    }

    /// Hand a frame to the receiver its generator targets.
    fn deliver(
        &mut self,
        now:     SimTime,
        client:  ClientId,
        packet:  PacketId,
        sent_at: SimTime,
        out:     &mut Vec<TraceEvent>,
    ) {
        let Some(generator) = self.stations[client.index()].generator.as_mut() else { return };
        let key   = flow_key(&self.topology, generator.spec, client);
        let stats = self.flows.entry(generator.flow, key);

        let receiver = self.aps.iter_mut().find(|b| b.ip == generator.spec.target);
        let listening = now >= self.server_start;
        match receiver {
            Some(bss) if listening => {
                let delay = now.since(sent_at);
                stats.rx_packets += 1;
                stats.rx_bytes   += u64::from(self.payload_bytes);
                stats.delay_sum  += delay;
                if let Some(prev) = generator.last_delay {
                    stats.jitter_sum += if delay >= prev { delay - prev } else { prev - delay };
                }
                stats.last_rx = Some(now);
                generator.last_delay = Some(delay);
                bss.received += 1;
                out.push(TraceEvent::Delivered { ctx: bss.ctx, packet, sent_at });
            }
            _ => stats.lost_packets += 1,
        }
    }

    fn set_backlog(&mut self, ap: ApId, f: impl FnOnce(u32) -> u32, out: &mut Vec<TraceEvent>) {
        let bss = &mut self.aps[ap.index()];
        let old = bss.backlog;
        bss.backlog = f(old);
        if bss.backlog != old {
            out.push(TraceEvent::QueueDepth { ctx: bss.ctx, old, new: bss.backlog });
        }
    }
}

impl Medium for FluidMedium {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn next_event_time(&self) -> Option<SimTime> {
        self.agenda.peek_time()
    }

    fn advance(&mut self, now: SimTime, out: &mut Vec<TraceEvent>) {
        while let Some(ev) = self.agenda.pop_due(now) {
            match ev.kind {
                Kind::Associate { client } => self.associate(now, client, out),
                Kind::SignalReport { client } => {
                    let st = &self.stations[client.index()];
                    out.push(TraceEvent::Signal { ctx: st.ctx, dbm: st.signal_dbm });
                    self.schedule_signal(now, client);
                }
                Kind::Send { client } => self.send(now, client, out),
                Kind::TxDone { ap, client, packet, sent_at } => {
                    self.tx_done(now, ap, client, packet, sent_at, out);
                }
            }
        }
    }

    fn install_generator(&mut self, spec: GeneratorSpec) -> SimResult<()> {
        let Some(st) = self.stations.get_mut(spec.client.index()) else {
            return Err(SimError::Medium(format!("no station for {}", spec.client)));
        };
        if st.generator.is_some() {
            return Err(SimError::Medium(format!("{} already has a generator", spec.client)));
        }
        let flow = FlowId(spec.client.0 + 1);
        st.generator = Some(Generator { spec, flow, last_delay: None });
        if spec.start < spec.stop {
            self.agenda.push(spec.start, Kind::Send { client: spec.client });
        }
        debug!(client = spec.client.0, target = %spec.target, start = %spec.start, "fluid generator armed");
        Ok(())
    }

    fn ap_received_packets(&self, ap: ApId) -> Option<u64> {
        self.aps.get(ap.index()).map(|b| b.received)
    }

    fn flow_stats(&self) -> &FlowStatsTable {
        &self.flows
    }
}

/// `10.1.1.(n + 1)`, continuing into the next octets past 254.
fn address(n: u32) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(BASE_ADDR) + n + 1)
}

fn flow_key(topology: &Topology, spec: GeneratorSpec, client: ClientId) -> FlowKey {
    let source = topology
        .client_node(client)
        .and_then(|n| n.routable_ipv4())
        .unwrap_or(Ipv4Addr::UNSPECIFIED);
    FlowKey {
        source,
        destination:      spec.target,
        protocol:         PROTO_UDP,
        source_port:      FIRST_SOURCE_PORT.wrapping_add(client.0 as u16),
        destination_port: spec.port,
    }
}
