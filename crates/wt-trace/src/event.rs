//! Typed trace contexts and the events the engine emits.
//!
//! The engine identifies the firing entity with a typed context instead of a
//! configuration path, so no handler ever has to parse an id out of a string.

use wt_core::{ApId, ClientId, MacAddr, NodeId, PacketId, SimTime};

/// Identifies the client station an event fired on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ClientContext {
    pub client: ClientId,
    pub node:   NodeId,
}

/// Identifies the access point an event fired on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ApContext {
    pub ap:   ApId,
    pub node: NodeId,
}

/// One event delivered by the engine's event bus.
///
/// Event time is not carried in the payload: handlers receive the clock's
/// current instant alongside the event.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// The station bound itself to the AP with MAC `ap`.
    Association { ctx: ClientContext, ap: MacAddr },

    /// A received-signal report, in dBm.  Stored without validation.
    Signal { ctx: ClientContext, dbm: f64 },

    /// A payload entered a station's MAC queue.
    Enqueue { packet: PacketId },

    /// A payload left the MAC queue of the station in `ctx`.
    Dequeue { ctx: ClientContext, packet: PacketId },

    /// The AP's transmit queue depth changed from `old` to `new`.
    QueueDepth { ctx: ApContext, old: u32, new: u32 },

    /// The AP's receiver accepted a payload stamped `sent_at` by its sender.
    Delivered { ctx: ApContext, packet: PacketId, sent_at: SimTime },
}

impl TraceEvent {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEvent::Association { .. } => "association",
            TraceEvent::Signal { .. }      => "signal",
            TraceEvent::Enqueue { .. }     => "enqueue",
            TraceEvent::Dequeue { .. }     => "dequeue",
            TraceEvent::QueueDepth { .. }  => "queue_depth",
            TraceEvent::Delivered { .. }   => "delivered",
        }
    }
}
