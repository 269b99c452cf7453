//! Run observer trait for data collection.

use wt_core::{ApId, ClientId, MacAddr, RunConfiguration, SimTime};
use wt_trace::TraceEvent;

use crate::{FlowStatsTable, GeneratorSpec, SnapshotRecord};

/// Callbacks invoked by [`Run::run`][crate::Run::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: count snapshot rows
///
/// ```rust,ignore
/// struct RowCounter(usize);
///
/// impl RunObserver for RowCounter {
///     fn on_snapshot(&mut self, _now: SimTime, rows: &[SnapshotRecord]) {
///         self.0 += rows.len();
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once before the first instant is processed.
    fn on_run_start(&mut self, _config: &RunConfiguration) {}

    /// Called for every engine event, before the event store applies it.
    fn on_event(&mut self, _now: SimTime, _event: &TraceEvent) {}

    /// An AP receiver accepted a payload that spent `latency` in flight.
    fn on_delivery(&mut self, _now: SimTime, _ap: ApId, _latency: SimTime) {}

    /// A client's generator was installed.
    fn on_generator_installed(&mut self, _now: SimTime, _spec: &GeneratorSpec) {}

    /// A client's AP had no routable address; the client will not send.
    fn on_resolution_failed(&mut self, _now: SimTime, _client: ClientId, _ap: MacAddr) {}

    /// Called at every snapshot tick with that tick's records (possibly
    /// none).
    fn on_snapshot(&mut self, _now: SimTime, _rows: &[SnapshotRecord]) {}

    /// Called once when the run reaches its stop time.
    fn on_run_end(&mut self, _end: SimTime, _flows: &FlowStatsTable) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Forwards every callback to both observers, `A` first.
impl<A: RunObserver, B: RunObserver> RunObserver for (A, B) {
    fn on_run_start(&mut self, config: &RunConfiguration) {
        self.0.on_run_start(config);
        self.1.on_run_start(config);
    }

    fn on_event(&mut self, now: SimTime, event: &TraceEvent) {
        self.0.on_event(now, event);
        self.1.on_event(now, event);
    }

    fn on_delivery(&mut self, now: SimTime, ap: ApId, latency: SimTime) {
        self.0.on_delivery(now, ap, latency);
        self.1.on_delivery(now, ap, latency);
    }

    fn on_generator_installed(&mut self, now: SimTime, spec: &GeneratorSpec) {
        self.0.on_generator_installed(now, spec);
        self.1.on_generator_installed(now, spec);
    }

    fn on_resolution_failed(&mut self, now: SimTime, client: ClientId, ap: MacAddr) {
        self.0.on_resolution_failed(now, client, ap);
        self.1.on_resolution_failed(now, client, ap);
    }

    fn on_snapshot(&mut self, now: SimTime, rows: &[SnapshotRecord]) {
        self.0.on_snapshot(now, rows);
        self.1.on_snapshot(now, rows);
    }

    fn on_run_end(&mut self, end: SimTime, flows: &FlowStatsTable) {
        self.0.on_run_end(end, flows);
        self.1.on_run_end(end, flows);
    }
}
