//! The engine's internal event heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use wt_core::{ApId, ClientId, PacketId, SimTime};

/// Something the engine does at an instant.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Kind {
    Associate { client: ClientId },
    SignalReport { client: ClientId },
    /// The client's generator emits one payload.
    Send { client: ClientId },
    /// A frame finished its time on air in `ap`'s BSS.
    TxDone { ap: ApId, client: ClientId, packet: PacketId, sent_at: SimTime },
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Scheduled {
    pub at:   SimTime,
    /// Insertion counter; breaks ties so same-instant events keep FIFO order.
    pub seq:  u64,
    pub kind: Kind,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (earliest time first)
        other.at.cmp(&self.at).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of [`Scheduled`] events with its own sequence counter.
#[derive(Debug, Default)]
pub(crate) struct Agenda {
    heap: BinaryHeap<Scheduled>,
    seq:  u64,
}

impl Agenda {
    pub fn push(&mut self, at: SimTime, kind: Kind) {
        self.heap.push(Scheduled { at, seq: self.seq, kind });
        self.seq += 1;
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|s| s.at)
    }

    /// Pop the earliest event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: SimTime) -> Option<Scheduled> {
        if self.peek_time()? <= now { self.heap.pop() } else { None }
    }
}
