//! `wt-medium` — [`FluidMedium`], a deterministic stand-in engine.
//!
//! It implements [`wt_sim::Medium`] with a queueing model instead of a PHY:
//! stations associate on a fixed stagger, report a path-loss signal level,
//! and drain their MAC queues through a round-robin BSS channel whose frame
//! time grows with payload and shrinks with channel width.  It is enough to
//! exercise every stream the telemetry pipeline consumes and to make sweep
//! axes move the results in the expected direction.

mod event;
pub mod fluid;
pub mod params;


pub use fluid::FluidMedium;
pub use params::FluidParams;
