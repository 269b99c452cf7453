//! `wt-core` — foundational types for the wifi telemetry workspace.
//!
//! This crate is a dependency of every other `wt-*` crate.  It has no `wt-*`
//! dependencies and few external ones (`rand`, `rand_distr`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`ids`]       | `ClientId`, `ApId`, `NodeId`, `PacketId`, `FlowId`         |
//! | [`time`]      | `SimTime` (nanosecond simulated clock)                     |
//! | [`radio`]     | `Band`, `ChannelSettings`, the channel lookup table        |
//! | [`net`]       | `MacAddr`                                                  |
//! | [`metric`]    | undefined-metric helpers and the `nan` marker              |
//! | [`config`]    | `RunConfiguration`, `TimingConfig`, traffic/throughput modes |
//! | [`rng`]       | `ClientRng`, `derive_seed`                                 |
//! | [`error`]     | `ConfigError`, `ConfigResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod metric;
pub mod net;
pub mod radio;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{RunConfiguration, ThroughputSource, TimingConfig, TrafficStart, config_key};
pub use error::{ConfigError, ConfigResult};
pub use ids::{ApId, ClientId, FlowId, NodeId, PacketId};
pub use metric::{NAN_MARKER, fmt_metric, ratio};
pub use net::MacAddr;
pub use radio::{Band, ChannelSettings, capacity_mbps, channel_settings};
pub use rng::{ClientRng, derive_seed};
pub use time::SimTime;
