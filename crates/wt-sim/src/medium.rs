//! The boundary to the simulation engine.
//!
//! Everything physical (propagation, contention, forwarding, the
//! application sinks) happens behind [`Medium`].  The run only sees the
//! trace events it emits, the counters it exposes, and the one command it
//! accepts: install a traffic generator.

use std::net::Ipv4Addr;

use wt_core::{ApId, ClientId, NodeId, SimTime};
use wt_trace::{Topology, TraceEvent};

use crate::{FlowStatsTable, SimResult};

/// UDP port the AP-side receivers listen on.
pub const SINK_PORT: u16 = 5000;

/// A constant-interval UDP sender to install on a client node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GeneratorSpec {
    pub client:        ClientId,
    pub node:          NodeId,
    pub target:        Ipv4Addr,
    pub port:          u16,
    pub payload_bytes: u32,
    pub interval:      SimTime,
    /// First send.
    pub start:         SimTime,
    /// No sends at or after this instant.
    pub stop:          SimTime,
}

/// A simulation engine driven by a [`Run`][crate::Run].
///
/// The run owns the clock: it asks for the engine's next pending instant,
/// decides what fires first, and then calls [`advance`][Medium::advance]
/// for exactly that instant.  An engine must never report an instant
/// earlier than one it has already been advanced to.
pub trait Medium {
    /// Nodes, devices and addresses of the modelled network.
    fn topology(&self) -> &Topology;

    /// The earliest instant at which the engine has internal work, if any.
    fn next_event_time(&self) -> Option<SimTime>;

    /// Process everything the engine has scheduled at `now`, appending the
    /// trace events it emits to `out` in emission order.
    fn advance(&mut self, now: SimTime, out: &mut Vec<TraceEvent>);

    /// Install a traffic generator.
    fn install_generator(&mut self, spec: GeneratorSpec) -> SimResult<()>;

    /// Packets accepted so far by the receiver on `ap`, or `None` if the AP
    /// has no receiver.
    fn ap_received_packets(&self, ap: ApId) -> Option<u64>;

    /// The engine's flow table as of the current instant.
    fn flow_stats(&self) -> &FlowStatsTable;
}
