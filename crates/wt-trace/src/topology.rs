//! The engine's node/device/address view used for address resolution.

use std::net::Ipv4Addr;

use wt_core::{ApId, ClientId, MacAddr, NodeId};

/// What a topology node is.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NodeRole {
    AccessPoint(ApId),
    Client(ClientId),
}

/// A network device on a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    pub mac: MacAddr,
}

/// One node: its role, its devices, and the IPv4 addresses bound to it
/// (loopback included, as the engine reports them).
#[derive(Clone, Debug, PartialEq)]
pub struct TopologyNode {
    pub node:    NodeId,
    pub role:    NodeRole,
    pub devices: Vec<Device>,
    pub ipv4:    Vec<Ipv4Addr>,
}

impl TopologyNode {
    /// First address that is not loopback.
    pub fn routable_ipv4(&self) -> Option<Ipv4Addr> {
        self.ipv4.iter().copied().find(|ip| !ip.is_loopback())
    }

    /// MAC of the node's first device.
    pub fn primary_mac(&self) -> Option<MacAddr> {
        self.devices.first().map(|d| d.mac)
    }
}

/// All nodes of a run, in engine order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    nodes: Vec<TopologyNode>,
}

impl Topology {
    pub fn new(nodes: Vec<TopologyNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TopologyNode] {
        &self.nodes
    }

    /// Resolve a MAC to the routable address of the node that owns it.
    ///
    /// Scans every node in order; the first node with a matching device and a
    /// non-loopback address wins.  Nodes that match but have no usable
    /// address are skipped.
    pub fn resolve_ipv4(&self, mac: MacAddr) -> Option<Ipv4Addr> {
        self.nodes
            .iter()
            .filter(|n| n.devices.iter().any(|d| d.mac == mac))
            .find_map(TopologyNode::routable_ipv4)
    }

    pub fn access_points(&self) -> impl Iterator<Item = (ApId, &TopologyNode)> {
        self.nodes.iter().filter_map(|n| match n.role {
            NodeRole::AccessPoint(ap) => Some((ap, n)),
            NodeRole::Client(_) => None,
        })
    }

    pub fn clients(&self) -> impl Iterator<Item = (ClientId, &TopologyNode)> {
        self.nodes.iter().filter_map(|n| match n.role {
            NodeRole::Client(c) => Some((c, n)),
            NodeRole::AccessPoint(_) => None,
        })
    }

    pub fn client_node(&self, client: ClientId) -> Option<&TopologyNode> {
        self.clients().find(|&(c, _)| c == client).map(|(_, n)| n)
    }
}
