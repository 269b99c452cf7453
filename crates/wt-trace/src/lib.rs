//! `wt-trace` — trace events, the per-run event store, and the association
//! follow-up for the wifi telemetry workspace.
//!
//! The engine emits [`TraceEvent`]s tagged with a typed context naming the
//! station or AP they fired on.  [`EventStore::apply`] folds each one into
//! the last-known-value maps the snapshot joiner reads.
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`event`]     | `ClientContext`, `ApContext`, `TraceEvent`                 |
//! | [`store`]     | `EventStore`, `ClientEntity`, `AccessPointEntity`          |
//! | [`handlers`]  | per-event handlers and follow-up transitions on the store  |
//! | [`followup`]  | `FollowUpState`, `ResolutionRequest`                       |
//! | [`topology`]  | `Topology` (MAC → IPv4 resolution), `TopologyNode`         |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the pending-enqueue table.   |

pub mod event;
pub mod followup;
pub mod handlers;
pub mod store;
pub mod topology;

#[cfg(test)]
mod tests;

pub use event::{ApContext, ClientContext, TraceEvent};
pub use followup::{FollowUpState, ResolutionRequest};
pub use store::{AccessPointEntity, ClientEntity, EventStore};
pub use topology::{Device, NodeRole, Topology, TopologyNode};
