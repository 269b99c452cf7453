//! `wt-sim` — the run loop of the wifi telemetry workspace.
//!
//! A [`Run`] owns one configuration, one engine ([`Medium`]) and one
//! [`EventStore`][wt_trace::EventStore].  It merges its own scheduled
//! actions (snapshot ticks, deferred address resolutions) with the engine's
//! event stream on a single clock, feeds engine events to the store, and
//! hands snapshot records to a [`RunObserver`].
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`medium`]   | `Medium` engine trait, `GeneratorSpec`                   |
//! | [`flow`]     | `FlowStatsTable`, `FlowStats`, `FlowAggregate`           |
//! | [`queue`]    | `EventQueue`, `Action`                                   |
//! | [`snapshot`] | `SnapshotJoiner`, `SnapshotRecord`                       |
//! | [`run`]      | `Run` and its event loop                                 |
//! | [`builder`]  | `RunBuilder`                                             |
//! | [`observer`] | `RunObserver`, `NoopObserver`                            |
//! | [`scripted`] | `ScriptedMedium`, a replaying engine for tests           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wt_sim::{NoopObserver, RunBuilder};
//!
//! let mut run = RunBuilder::new(config, timing, medium).build()?;
//! run.run(&mut NoopObserver)?;
//! let flows = run.medium.flow_stats();
//! ```

pub mod builder;
pub mod error;
pub mod flow;
pub mod medium;
pub mod observer;
pub mod queue;
pub mod run;
pub mod scripted;
pub mod snapshot;


pub use builder::RunBuilder;
pub use error::{SimError, SimResult};
pub use flow::{FlowAggregate, FlowKey, FlowRecord, FlowStats, FlowStatsTable, PROTO_UDP};
pub use medium::{GeneratorSpec, Medium, SINK_PORT};
pub use observer::{NoopObserver, RunObserver};
pub use queue::{Action, EventQueue};
pub use run::Run;
pub use scripted::{ScriptedMedium, Step};
pub use snapshot::{SnapshotJoiner, SnapshotRecord};
