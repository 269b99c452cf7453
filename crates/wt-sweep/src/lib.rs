//! `wt-sweep` — run configuration and the experiment sweep.
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`configurator`] | `RunConfigurator`, `SweepPoint`, `JitterSpec`, derivations |
//! | [`config`]       | `SweepConfig` and its JSON form                            |
//! | [`sweep`]        | `Sweep`, `MediumFactory`, `RunOutcome`, `SweepReport`      |
//! | [`reduce`]       | flow table → `RunSummary` and `FlowSummaryRow`s            |
//! | [`error`]        | `SweepError`, `SweepResult`                                |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Run sweep points on the rayon pool.                     |
//! | `sqlite`   | Enable the SQLite output backend.                       |
//! | `parquet`  | Enable the Parquet snapshot backend.                    |
//! | `fx-hash`  | FxHashMap for the pending-enqueue table.                |
//!
//! # Usage
//!
//! ```rust,ignore
//! use wt_medium::FluidParams;
//! use wt_sweep::{Sweep, SweepConfig};
//!
//! let config = SweepConfig::load(Path::new("sweep.json"))?;
//! let report = Sweep::new(config, FluidParams::default()).run()?;
//! println!("{} ok, {} failed", report.ok_count(), report.failed_count());
//! ```

pub mod config;
pub mod configurator;
pub mod error;
pub mod reduce;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use config::{OutputSpec, SweepConfig, TimingSpec, TrafficStartSpec};
pub use configurator::{JitterSpec, RunConfigurator, SweepPoint, draw_jitter, run_seed, send_interval};
pub use error::{SweepError, SweepResult};
pub use reduce::{flow_rows, summarize};
pub use sweep::{MediumFactory, RunOutcome, Sweep, SweepReport};
