//! The per-run `EventStore`: last-known value per stream per entity.
//!
//! # Ownership
//!
//! One `EventStore` belongs to one run.  It is created from the run's
//! topology at setup, mutated only by the trace handlers and the follow-up
//! transitions (all on the run's single-threaded clock), read by the
//! snapshot joiner, and dropped at teardown.  Nothing in it is global, so
//! runs can execute back to back, or side by side, without a reset step.

use std::collections::BTreeMap;

use wt_core::{ApId, ClientId, MacAddr, NodeId, PacketId, SimTime};

use crate::followup::FollowUpState;
use crate::topology::Topology;

#[cfg(feature = "fx-hash")]
pub(crate) type PendingMap = rustc_hash::FxHashMap<PacketId, SimTime>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type PendingMap = std::collections::HashMap<PacketId, SimTime>;

/// Telemetry held for one client station.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientEntity {
    pub id:   ClientId,
    pub node: NodeId,
    /// MAC of the AP this station is currently associated with.
    pub associated_ap: Option<MacAddr>,
    /// Last signal report.  `Some(NaN)` is possible: reports are stored raw.
    pub last_signal_dbm: Option<f64>,
    /// Last MAC-queue sojourn time, in milliseconds.
    pub last_queue_delay_ms: Option<f64>,
    pub follow_up: FollowUpState,
}

impl ClientEntity {
    pub fn new(id: ClientId, node: NodeId) -> Self {
        Self {
            id,
            node,
            associated_ap:       None,
            last_signal_dbm:     None,
            last_queue_delay_ms: None,
            follow_up:           FollowUpState::Unassociated,
        }
    }
}

/// Telemetry held for one access point.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessPointEntity {
    pub id:          ApId,
    pub node:        NodeId,
    pub mac:         MacAddr,
    pub queue_depth: u32,
    /// Recomputed by every snapshot.
    pub throughput_mbps: Option<f64>,
    /// Recomputed by every snapshot.
    pub utilization: Option<f64>,
}

impl AccessPointEntity {
    pub fn new(id: ApId, node: NodeId, mac: MacAddr) -> Self {
        Self {
            id,
            node,
            mac,
            queue_depth:     0,
            throughput_mbps: None,
            utilization:     None,
        }
    }
}

/// Last-value maps for every stream, plus the pending-enqueue table.
#[derive(Clone, Debug, Default)]
pub struct EventStore {
    pub(crate) clients: BTreeMap<ClientId, ClientEntity>,
    pub(crate) aps:     BTreeMap<ApId, AccessPointEntity>,
    /// Enqueue instant per in-flight packet.  Entries whose dequeue never
    /// arrives stay here until the store is dropped.
    pub(crate) pending: PendingMap,
}

impl EventStore {
    /// Create one entity per client and AP node of `topology`.
    ///
    /// APs without a device are skipped: they have no address a station
    /// could associate with.
    pub fn from_topology(topology: &Topology) -> Self {
        let clients = topology
            .clients()
            .map(|(id, n)| (id, ClientEntity::new(id, n.node)))
            .collect();
        let aps = topology
            .access_points()
            .filter_map(|(id, n)| {
                n.primary_mac().map(|mac| (id, AccessPointEntity::new(id, n.node, mac)))
            })
            .collect();
        Self { clients, aps, pending: PendingMap::default() }
    }

    // ── Clients ───────────────────────────────────────────────────────────

    pub fn client(&self, id: ClientId) -> Option<&ClientEntity> {
        self.clients.get(&id)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut ClientEntity> {
        self.clients.get_mut(&id)
    }

    /// All clients in ascending id order.
    pub fn clients(&self) -> impl Iterator<Item = &ClientEntity> {
        self.clients.values()
    }

    /// Clients with an association, in ascending id order.
    pub fn associated_clients(&self) -> impl Iterator<Item = &ClientEntity> {
        self.clients.values().filter(|c| c.associated_ap.is_some())
    }

    /// Number of clients currently associated with `ap`.
    pub fn station_count(&self, ap: MacAddr) -> u32 {
        self.clients
            .values()
            .filter(|c| c.associated_ap == Some(ap))
            .count() as u32
    }

    // ── Access points ─────────────────────────────────────────────────────

    pub fn ap(&self, id: ApId) -> Option<&AccessPointEntity> {
        self.aps.get(&id)
    }

    pub fn ap_mut(&mut self, id: ApId) -> Option<&mut AccessPointEntity> {
        self.aps.get_mut(&id)
    }

    pub fn aps(&self) -> impl Iterator<Item = &AccessPointEntity> {
        self.aps.values()
    }

    pub fn aps_mut(&mut self) -> impl Iterator<Item = &mut AccessPointEntity> {
        self.aps.values_mut()
    }

    /// The AP entity whose MAC is `mac`.
    pub fn ap_by_mac(&self, mac: MacAddr) -> Option<&AccessPointEntity> {
        self.aps.values().find(|a| a.mac == mac)
    }

    // ── Pending enqueues ──────────────────────────────────────────────────

    /// Number of enqueues still waiting for their dequeue.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_since(&self, packet: PacketId) -> Option<SimTime> {
        self.pending.get(&packet).copied()
    }
}
