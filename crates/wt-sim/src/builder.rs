//! Builder for constructing a [`Run`].

use tracing::debug;

use wt_core::{RunConfiguration, SimTime, TimingConfig, TrafficStart};
use wt_trace::EventStore;

use crate::queue::{Action, EventQueue};
use crate::{GeneratorSpec, Medium, Run, SINK_PORT, SimError, SimResult, SnapshotJoiner};

/// Builder for [`Run<M>`].
///
/// # Required inputs
///
/// - [`RunConfiguration`] from the run configurator
/// - [`TimingConfig`] shared by the sweep
/// - `M: Medium`: a freshly built engine for this configuration
///
/// # Example
///
/// ```rust,ignore
/// let mut run = RunBuilder::new(config, timing, medium).build()?;
/// run.run(&mut NoopObserver)?;
/// ```
pub struct RunBuilder<M: Medium> {
    config: RunConfiguration,
    timing: TimingConfig,
    medium: M,
}

impl<M: Medium> RunBuilder<M> {
    pub fn new(config: RunConfiguration, timing: TimingConfig, medium: M) -> Self {
        Self { config, timing, medium }
    }

    /// Validate inputs, seed the event store from the engine's topology,
    /// queue every snapshot tick, and return a ready-to-run [`Run`].
    ///
    /// With [`TrafficStart::AtFixedTime`] every client's generator is
    /// installed here, aimed at the first AP with a routable address.
    pub fn build(mut self) -> SimResult<Run<M>> {
        self.timing.validate()?;

        // ── Validate the engine against the configuration ─────────────────
        let topology = self.medium.topology();
        let clients  = topology.clients().count();
        if clients != self.config.client_count as usize {
            return Err(SimError::CountMismatch {
                expected: self.config.client_count as usize,
                got:      clients,
                what:     "client stations",
            });
        }
        let aps = topology.access_points().count();
        if aps != self.config.ap_count as usize {
            return Err(SimError::CountMismatch {
                expected: self.config.ap_count as usize,
                got:      aps,
                what:     "access points",
            });
        }

        let mut store = EventStore::from_topology(topology);

        // ── Snapshot ticks ────────────────────────────────────────────────
        let mut queue = EventQueue::new();
        for tick in self.timing.snapshot_ticks() {
            queue.push(tick, Action::Snapshot);
        }

        // ── Fixed-start traffic ───────────────────────────────────────────
        if let TrafficStart::AtFixedTime(at) = self.timing.traffic_start {
            let target = self
                .medium
                .topology()
                .access_points()
                .find_map(|(_, n)| n.routable_ipv4())
                .ok_or(SimError::NoTrafficTarget)?;
            let clients: Vec<_> = store.clients().map(|c| (c.id, c.node)).collect();
            for (client, node) in clients {
                let start = at + self.config.jitter_for(client);
                store.preactivate(client, target, start);
                self.medium.install_generator(GeneratorSpec {
                    client,
                    node,
                    target,
                    port:          SINK_PORT,
                    payload_bytes: self.config.payload_bytes,
                    interval:      self.config.client_interval,
                    start,
                    stop:          self.timing.sim_time,
                })?;
                debug!(client = client.0, %target, start = %start, "generator installed");
            }
        }

        Ok(Run {
            joiner: SnapshotJoiner::new(&self.config, self.timing.throughput_source),
            config: self.config,
            timing: self.timing,
            store,
            queue,
            medium: self.medium,
            now:    SimTime::ZERO,
            events: Vec::new(),
        })
    }
}
