//! Unit tests for wt-trace.

#[cfg(test)]
mod fixtures {
    use std::net::Ipv4Addr;

    use wt_core::{ApId, ClientId, MacAddr, NodeId};

    use crate::{Device, NodeRole, Topology, TopologyNode};

    pub const AP_MAC: MacAddr = MacAddr([0, 0, 0, 0, 0, 1]);

    /// One AP (node 0, 10.1.1.1) and `n` clients on nodes 1..=n.
    pub fn topology(n: u32) -> Topology {
        let mut nodes = vec![TopologyNode {
            node:    NodeId(0),
            role:    NodeRole::AccessPoint(ApId(0)),
            devices: vec![Device { mac: AP_MAC }],
            ipv4:    vec![Ipv4Addr::LOCALHOST, Ipv4Addr::new(10, 1, 1, 1)],
        }];
        for i in 0..n {
            nodes.push(TopologyNode {
                node:    NodeId(i + 1),
                role:    NodeRole::Client(ClientId(i)),
                devices: vec![Device { mac: MacAddr::from_index(u64::from(i) + 2) }],
                ipv4:    vec![Ipv4Addr::LOCALHOST, Ipv4Addr::new(10, 1, 1, (i + 2) as u8)],
            });
        }
        Topology::new(nodes)
    }

    pub fn ctx(i: u32) -> crate::ClientContext {
        crate::ClientContext { client: ClientId(i), node: NodeId(i + 1) }
    }
}

#[cfg(test)]
mod queue_delay {
    use wt_core::{ClientId, PacketId, SimTime};

    use super::fixtures::{ctx, topology};
    use crate::EventStore;

    #[test]
    fn dequeue_without_enqueue_is_noop() {
        let mut store = EventStore::from_topology(&topology(1));
        assert_eq!(store.on_dequeue(SimTime::from_millis(3), ctx(0), PacketId(9)), None);
        assert_eq!(store.client(ClientId(0)).unwrap().last_queue_delay_ms, None);
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn unmatched_dequeue_keeps_previous_delay() {
        let mut store = EventStore::from_topology(&topology(1));
        store.on_enqueue(SimTime::from_millis(10), PacketId(1));
        store.on_dequeue(SimTime::from_millis(14), ctx(0), PacketId(1));
        store.on_dequeue(SimTime::from_millis(20), ctx(0), PacketId(1));
        assert_eq!(store.client(ClientId(0)).unwrap().last_queue_delay_ms, Some(4.0));
    }

    #[test]
    fn delay_is_exact_milliseconds() {
        let mut store = EventStore::from_topology(&topology(1));
        store.on_enqueue(SimTime::from_micros(1_000), PacketId(1));
        let d = store.on_dequeue(SimTime::from_micros(3_250), ctx(0), PacketId(1));
        assert_eq!(d, Some(2.25));
        assert_eq!(store.client(ClientId(0)).unwrap().last_queue_delay_ms, Some(2.25));
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn same_instant_dequeue_gives_zero() {
        let mut store = EventStore::from_topology(&topology(1));
        let t = SimTime::from_secs(2);
        store.on_enqueue(t, PacketId(5));
        store.on_dequeue(t, ctx(0), PacketId(5));
        assert_eq!(store.client(ClientId(0)).unwrap().last_queue_delay_ms, Some(0.0));
    }

    #[test]
    fn reused_packet_id_overwrites_enqueue_time() {
        let mut store = EventStore::from_topology(&topology(1));
        store.on_enqueue(SimTime::from_millis(1), PacketId(7));
        store.on_enqueue(SimTime::from_millis(5), PacketId(7));
        assert_eq!(store.pending_len(), 1);
        assert_eq!(store.pending_since(PacketId(7)), Some(SimTime::from_millis(5)));
    }
}

#[cfg(test)]
mod handlers {
    use wt_core::{ApId, ClientId, MacAddr, NodeId, SimTime};

    use super::fixtures::{AP_MAC, ctx, topology};
    use crate::{ApContext, EventStore, FollowUpState, ResolutionRequest, TraceEvent};

    const DELAY: SimTime = SimTime::from_millis(50);

    #[test]
    fn first_association_requests_resolution() {
        let mut store = EventStore::from_topology(&topology(1));
        let now = SimTime::from_millis(120);
        let ev = TraceEvent::Association { ctx: ctx(0), ap: AP_MAC };
        let req = store.apply(now, &ev, DELAY);
        assert_eq!(
            req,
            Some(ResolutionRequest { client: ClientId(0), ap: AP_MAC, at: SimTime::from_millis(170) })
        );
        let c = store.client(ClientId(0)).unwrap();
        assert_eq!(c.associated_ap, Some(AP_MAC));
        assert!(matches!(c.follow_up, FollowUpState::ResolutionPending { .. }));
    }

    #[test]
    fn reassociation_overwrites_without_new_request() {
        let mut store = EventStore::from_topology(&topology(1));
        let other = MacAddr([0, 0, 0, 0, 0, 0x20]);
        store.apply(SimTime::from_millis(1), &TraceEvent::Association { ctx: ctx(0), ap: AP_MAC }, DELAY);
        let req = store.apply(SimTime::from_millis(2), &TraceEvent::Association { ctx: ctx(0), ap: other }, DELAY);
        assert_eq!(req, None);
        assert_eq!(store.client(ClientId(0)).unwrap().associated_ap, Some(other));
        assert_eq!(store.associated_clients().count(), 1);
    }

    #[test]
    fn signal_is_stored_raw() {
        let mut store = EventStore::from_topology(&topology(1));
        store.apply(SimTime::ZERO, &TraceEvent::Signal { ctx: ctx(0), dbm: -250.0 }, DELAY);
        assert_eq!(store.client(ClientId(0)).unwrap().last_signal_dbm, Some(-250.0));
        store.apply(SimTime::ZERO, &TraceEvent::Signal { ctx: ctx(0), dbm: f64::NAN }, DELAY);
        assert!(store.client(ClientId(0)).unwrap().last_signal_dbm.unwrap().is_nan());
    }

    #[test]
    fn events_for_unknown_entities_are_ignored() {
        let mut store = EventStore::from_topology(&topology(1));
        let ghost = crate::ClientContext { client: ClientId(9), node: NodeId(40) };
        assert_eq!(store.apply(SimTime::ZERO, &TraceEvent::Association { ctx: ghost, ap: AP_MAC }, DELAY), None);
        store.on_queue_depth(ApContext { ap: ApId(3), node: NodeId(0) }, 12);
        assert_eq!(store.associated_clients().count(), 0);
        assert_eq!(store.ap(ApId(0)).unwrap().queue_depth, 0);
    }

    #[test]
    fn queue_depth_overwrites() {
        let mut store = EventStore::from_topology(&topology(0));
        let ap = ApContext { ap: ApId(0), node: NodeId(0) };
        store.apply(SimTime::ZERO, &TraceEvent::QueueDepth { ctx: ap, old: 0, new: 4 }, DELAY);
        store.apply(SimTime::ZERO, &TraceEvent::QueueDepth { ctx: ap, old: 4, new: 2 }, DELAY);
        assert_eq!(store.ap(ApId(0)).unwrap().queue_depth, 2);
    }

    #[test]
    fn station_count_follows_associations() {
        let mut store = EventStore::from_topology(&topology(3));
        for i in 0..2 {
            store.apply(SimTime::ZERO, &TraceEvent::Association { ctx: ctx(i), ap: AP_MAC }, DELAY);
        }
        assert_eq!(store.station_count(AP_MAC), 2);
        assert_eq!(store.ap_by_mac(AP_MAC).map(|a| a.id), Some(ApId(0)));
    }
}

#[cfg(test)]
mod followup {
    use std::net::Ipv4Addr;

    use wt_core::{ClientId, SimTime};

    use super::fixtures::{AP_MAC, ctx, topology};
    use crate::{EventStore, FollowUpState, TraceEvent};

    #[test]
    fn pending_to_active() {
        let mut store = EventStore::from_topology(&topology(1));
        store.apply(SimTime::ZERO, &TraceEvent::Association { ctx: ctx(0), ap: AP_MAC }, SimTime::from_millis(50));
        let target = Ipv4Addr::new(10, 1, 1, 1);
        assert!(store.activate(ClientId(0), target, SimTime::from_millis(60)));
        let state = store.client(ClientId(0)).unwrap().follow_up;
        assert_eq!(state, FollowUpState::Active { target, start: SimTime::from_millis(60) });
        assert!(state.is_terminal());
        assert!(!store.activate(ClientId(0), target, SimTime::from_millis(70)));
    }

    #[test]
    fn pending_to_unresolved_is_terminal() {
        let mut store = EventStore::from_topology(&topology(1));
        store.apply(SimTime::ZERO, &TraceEvent::Association { ctx: ctx(0), ap: AP_MAC }, SimTime::ZERO);
        assert!(store.mark_unresolved(ClientId(0)));
        assert_eq!(store.client(ClientId(0)).unwrap().follow_up, FollowUpState::Unresolved { ap: AP_MAC });
        let req = store.apply(SimTime::from_secs(1), &TraceEvent::Association { ctx: ctx(0), ap: AP_MAC }, SimTime::ZERO);
        assert_eq!(req, None);
    }

    #[test]
    fn activate_requires_pending() {
        let mut store = EventStore::from_topology(&topology(1));
        assert!(!store.activate(ClientId(0), Ipv4Addr::new(10, 1, 1, 1), SimTime::ZERO));
        assert!(!store.mark_unresolved(ClientId(0)));
    }

    #[test]
    fn preactivated_client_skips_resolution() {
        let mut store = EventStore::from_topology(&topology(1));
        assert!(store.preactivate(ClientId(0), Ipv4Addr::new(10, 1, 1, 1), SimTime::from_secs(1)));
        let req = store.apply(SimTime::from_millis(5), &TraceEvent::Association { ctx: ctx(0), ap: AP_MAC }, SimTime::from_millis(50));
        assert_eq!(req, None);
        assert_eq!(store.client(ClientId(0)).unwrap().associated_ap, Some(AP_MAC));
    }
}

#[cfg(test)]
mod topology {
    use std::net::Ipv4Addr;

    use wt_core::{ApId, MacAddr, NodeId};

    use super::fixtures::{AP_MAC, topology};
    use crate::{Device, NodeRole, Topology, TopologyNode};

    #[test]
    fn resolves_first_non_loopback() {
        assert_eq!(topology(2).resolve_ipv4(AP_MAC), Some(Ipv4Addr::new(10, 1, 1, 1)));
    }

    #[test]
    fn unknown_mac_does_not_resolve() {
        assert_eq!(topology(2).resolve_ipv4(MacAddr([9; 6])), None);
    }

    #[test]
    fn loopback_only_node_is_skipped() {
        let mac = MacAddr([0, 0, 0, 0, 0, 0x33]);
        let topo = Topology::new(vec![
            TopologyNode {
                node:    NodeId(0),
                role:    NodeRole::AccessPoint(ApId(0)),
                devices: vec![Device { mac }],
                ipv4:    vec![Ipv4Addr::LOCALHOST],
            },
            TopologyNode {
                node:    NodeId(1),
                role:    NodeRole::AccessPoint(ApId(1)),
                devices: vec![Device { mac }],
                ipv4:    vec![Ipv4Addr::new(10, 1, 1, 9)],
            },
        ]);
        assert_eq!(topo.resolve_ipv4(mac), Some(Ipv4Addr::new(10, 1, 1, 9)));
    }

    #[test]
    fn role_iterators() {
        let topo = topology(3);
        assert_eq!(topo.access_points().count(), 1);
        assert_eq!(topo.clients().count(), 3);
        assert_eq!(topo.client_node(wt_core::ClientId(2)).map(|n| n.node), Some(NodeId(3)));
    }
}
