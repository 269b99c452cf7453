//! The `Run` struct and its event loop.

use tracing::{debug, info, warn};

use wt_core::{RunConfiguration, SimTime, TimingConfig};
use wt_trace::{EventStore, ResolutionRequest, TraceEvent};

use crate::queue::{Action, EventQueue};
use crate::{GeneratorSpec, Medium, RunObserver, SINK_PORT, SimError, SimResult, SnapshotJoiner};

/// One experiment run: a configuration, an engine, and the state that
/// correlates the engine's events.
///
/// # Instant processing
///
/// ```text
/// loop:
///   next = min(queue.next_time, medium.next_event_time)   stop if > sim_time
///   ① Actions — everything the run queued for `next`, in insertion order:
///                 Snapshot        → join store into records → observer
///                 Resolve(req)    → topology lookup → install or give up
///   ② Engine  — medium.advance(next); each event goes to the observer,
///               then to the event store.  A first association queues a
///               Resolve at next + resolution_delay.
/// ```
///
/// A snapshot therefore never sees engine events of its own instant.
///
/// Create via [`RunBuilder`][crate::RunBuilder].
pub struct Run<M: Medium> {
    pub config: RunConfiguration,
    pub timing: TimingConfig,
    /// Last-known telemetry, owned by this run alone.
    pub store:  EventStore,
    pub queue:  EventQueue,
    pub medium: M,
    pub(crate) joiner: SnapshotJoiner,
    pub(crate) now:    SimTime,
    /// Scratch buffer reused across `advance` calls.
    pub(crate) events: Vec<TraceEvent>,
}

impl<M: Medium> Run<M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Current position of the run clock.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Run to `timing.sim_time`, calling observer hooks along the way.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(key = %self.config.key, sim_time = %self.timing.sim_time, "run start");
        observer.on_run_start(&self.config);

        self.run_until(self.timing.sim_time, observer)?;

        let flows = self.medium.flow_stats();
        observer.on_run_end(self.now, flows);
        info!(key = %self.config.key, flows = flows.len(), "run end");
        Ok(())
    }

    /// Process every instant up to and including `until`.
    ///
    /// Useful for tests and incremental stepping; does not fire the start
    /// and end hooks.
    pub fn run_until<O: RunObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<()> {
        while let Some(next) = self.next_instant() {
            if next > until {
                break;
            }
            if next < self.now {
                return Err(SimError::ClockRegression { now: self.now, event: next });
            }
            self.now = next;
            self.process_instant(next, observer)?;
        }
        self.now = self.now.max(until);
        Ok(())
    }

    // ── Core instant processing ───────────────────────────────────────────

    fn next_instant(&self) -> Option<SimTime> {
        match (self.queue.next_time(), self.medium.next_event_time()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn process_instant<O: RunObserver>(&mut self, now: SimTime, observer: &mut O) -> SimResult<()> {
        // ── Phase 1: run-queued actions ───────────────────────────────────
        if let Some(actions) = self.queue.drain_at(now) {
            for action in actions {
                match action {
                    Action::Snapshot => {
                        let rows = self.joiner.join(now, &mut self.store, &self.medium);
                        debug!(t = %now, rows = rows.len(), "snapshot");
                        observer.on_snapshot(now, &rows);
                    }
                    Action::Resolve(req) => self.resolve(now, req, observer)?,
                }
            }
        }

        // ── Phase 2: engine events ────────────────────────────────────────
        if self.medium.next_event_time() != Some(now) {
            return Ok(());
        }
        let mut events = std::mem::take(&mut self.events);
        self.medium.advance(now, &mut events);
        let delay = self.timing.resolution_delay;
        for event in events.drain(..) {
            observer.on_event(now, &event);
            if let TraceEvent::Delivered { ctx, sent_at, .. } = event {
                observer.on_delivery(now, ctx.ap, now.since(sent_at));
            }
            if let Some(req) = self.store.apply(now, &event, delay) {
                self.queue.push(req.at, Action::Resolve(req));
            }
        }
        self.events = events;
        Ok(())
    }

    /// Resolve the AP captured at association and start the client's
    /// traffic, or record that it never will.
    fn resolve<O: RunObserver>(
        &mut self,
        now:      SimTime,
        req:      ResolutionRequest,
        observer: &mut O,
    ) -> SimResult<()> {
        let Some(node) = self.store.client(req.client).map(|c| c.node) else {
            return Ok(());
        };

        let Some(target) = self.medium.topology().resolve_ipv4(req.ap) else {
            if self.store.mark_unresolved(req.client) {
                warn!(client = req.client.0, ap = %req.ap, "AP address unresolved; client will not send");
                observer.on_resolution_failed(now, req.client, req.ap);
            }
            return Ok(());
        };

        let start = now + self.timing.generator_start_offset + self.config.jitter_for(req.client);
        if !self.store.activate(req.client, target, start) {
            return Ok(());
        }
        let spec = GeneratorSpec {
            client:        req.client,
            node,
            target,
            port:          SINK_PORT,
            payload_bytes: self.config.payload_bytes,
            interval:      self.config.client_interval,
            start,
            stop:          self.timing.sim_time,
        };
        self.medium.install_generator(spec)?;
        debug!(client = req.client.0, %target, start = %start, "generator installed");
        observer.on_generator_installed(now, &spec);
        Ok(())
    }
}
