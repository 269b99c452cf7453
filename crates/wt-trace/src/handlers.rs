//! Trace handlers: normalize engine events into `EventStore` updates.
//!
//! Every handler runs to completion on the run's clock before the next event
//! fires, so none of them needs a lock.  None of them can fail either: an
//! event for an entity the store doesn't know is dropped with a debug log,
//! and a dequeue without a pending enqueue is a no-op.

use std::net::Ipv4Addr;

use tracing::debug;

use wt_core::{ClientId, MacAddr, PacketId, SimTime};

use crate::event::{ApContext, ClientContext, TraceEvent};
use crate::followup::{FollowUpState, ResolutionRequest};
use crate::store::EventStore;

impl EventStore {
    /// Dispatch one event to its handler.
    ///
    /// Returns the deferred resolution the caller must put on the clock, if
    /// this event was a station's first association.
    pub fn apply(
        &mut self,
        now:              SimTime,
        event:            &TraceEvent,
        resolution_delay: SimTime,
    ) -> Option<ResolutionRequest> {
        match *event {
            TraceEvent::Association { ctx, ap } => {
                return self.on_association(now, ctx, ap, resolution_delay);
            }
            TraceEvent::Signal { ctx, dbm } => self.on_signal(ctx, dbm),
            TraceEvent::Enqueue { packet } => self.on_enqueue(now, packet),
            TraceEvent::Dequeue { ctx, packet } => {
                self.on_dequeue(now, ctx, packet);
            }
            TraceEvent::QueueDepth { ctx, new, .. } => self.on_queue_depth(ctx, new),
            // Receive timestamps feed the latency sink only.
            TraceEvent::Delivered { .. } => {}
        }
        None
    }

    /// Overwrite the station's association; start the follow-up on the first
    /// one.
    pub fn on_association(
        &mut self,
        now:              SimTime,
        ctx:              ClientContext,
        ap:               MacAddr,
        resolution_delay: SimTime,
    ) -> Option<ResolutionRequest> {
        let Some(client) = self.clients.get_mut(&ctx.client) else {
            debug!(client = ctx.client.0, "association for unknown client ignored");
            return None;
        };
        client.associated_ap = Some(ap);
        debug!(client = ctx.client.0, %ap, t = now.as_secs_f64(), "associated");

        if client.follow_up != FollowUpState::Unassociated {
            return None;
        }
        let due = now + resolution_delay;
        client.follow_up = FollowUpState::ResolutionPending { ap, due };
        Some(ResolutionRequest { client: ctx.client, ap, at: due })
    }

    /// Overwrite the station's last signal report, as-is.
    pub fn on_signal(&mut self, ctx: ClientContext, dbm: f64) {
        match self.clients.get_mut(&ctx.client) {
            Some(client) => client.last_signal_dbm = Some(dbm),
            None => debug!(client = ctx.client.0, "signal report for unknown client ignored"),
        }
    }

    /// Record when `packet` entered a MAC queue.  A reused identity
    /// overwrites the earlier entry.
    pub fn on_enqueue(&mut self, now: SimTime, packet: PacketId) {
        self.pending.insert(packet, now);
    }

    /// Match `packet` against its enqueue and store the sojourn time.
    ///
    /// Returns the delay in milliseconds when a pending entry matched.
    pub fn on_dequeue(&mut self, now: SimTime, ctx: ClientContext, packet: PacketId) -> Option<f64> {
        let enqueued = self.pending.remove(&packet)?;
        let delay_ms = now.since(enqueued).as_millis_f64();
        match self.clients.get_mut(&ctx.client) {
            Some(client) => client.last_queue_delay_ms = Some(delay_ms),
            None => debug!(client = ctx.client.0, "dequeue for unknown client ignored"),
        }
        Some(delay_ms)
    }

    /// Overwrite the AP's queue depth.
    pub fn on_queue_depth(&mut self, ctx: ApContext, depth: u32) {
        match self.aps.get_mut(&ctx.ap) {
            Some(ap) => ap.queue_depth = depth,
            None => debug!(ap = ctx.ap.0, "queue depth for unknown AP ignored"),
        }
    }

    // ── Follow-up transitions ─────────────────────────────────────────────

    /// `ResolutionPending → Active`.  Returns `false` (and changes nothing)
    /// from any other state.
    pub fn activate(&mut self, client: ClientId, target: Ipv4Addr, start: SimTime) -> bool {
        match self.clients.get_mut(&client) {
            Some(c) if matches!(c.follow_up, FollowUpState::ResolutionPending { .. }) => {
                c.follow_up = FollowUpState::Active { target, start };
                true
            }
            _ => false,
        }
    }

    /// `ResolutionPending → Unresolved`.  Returns `false` from any other
    /// state.
    pub fn mark_unresolved(&mut self, client: ClientId) -> bool {
        match self.clients.get_mut(&client) {
            Some(c) => match c.follow_up {
                FollowUpState::ResolutionPending { ap, .. } => {
                    c.follow_up = FollowUpState::Unresolved { ap };
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Install a generator without the association round-trip (fixed-start
    /// traffic).  Later associations then leave the follow-up untouched.
    pub fn preactivate(&mut self, client: ClientId, target: Ipv4Addr, start: SimTime) -> bool {
        match self.clients.get_mut(&client) {
            Some(c) if c.follow_up == FollowUpState::Unassociated => {
                c.follow_up = FollowUpState::Active { target, start };
                true
            }
            _ => false,
        }
    }
}
