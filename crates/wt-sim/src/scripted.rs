//! `ScriptedMedium` — an engine that replays a fixed timeline.
//!
//! Nothing is simulated: every trace event, receive-counter value and flow
//! record is scripted up front at the instant it should appear.  Installed
//! generators are recorded but never send.  Use it to drive a [`Run`]
//! through an exact event sequence.
//!
//! [`Run`]: crate::Run

use std::collections::BTreeMap;

use wt_core::{ApId, SimTime};
use wt_trace::{Topology, TraceEvent};

use crate::{FlowRecord, FlowStatsTable, GeneratorSpec, Medium, SimResult};

/// One scripted occurrence.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Trace(TraceEvent),
    /// Set the AP receiver's cumulative packet count.
    ApReceived { ap: ApId, total: u64 },
    /// Replace a flow-table row.
    Flow(FlowRecord),
}

#[derive(Clone, Debug, Default)]
pub struct ScriptedMedium {
    topology:  Topology,
    script:    BTreeMap<SimTime, Vec<Step>>,
    ap_rx:     BTreeMap<ApId, u64>,
    flows:     FlowStatsTable,
    installed: Vec<GeneratorSpec>,
}

impl ScriptedMedium {
    pub fn new(topology: Topology) -> Self {
        Self { topology, ..Self::default() }
    }

    /// Emit `event` at `at`.  Events at the same instant keep script order.
    pub fn trace(self, at: SimTime, event: TraceEvent) -> Self {
        self.step(at, Step::Trace(event))
    }

    /// Give `ap` a receiver whose count becomes `total` at `at`.
    pub fn ap_received(mut self, at: SimTime, ap: ApId, total: u64) -> Self {
        self.ap_rx.entry(ap).or_insert(0);
        self.step(at, Step::ApReceived { ap, total })
    }

    /// Publish `record` into the flow table at `at`.
    pub fn flow(self, at: SimTime, record: FlowRecord) -> Self {
        self.step(at, Step::Flow(record))
    }

    pub fn step(mut self, at: SimTime, step: Step) -> Self {
        self.script.entry(at).or_default().push(step);
        self
    }

    /// Generators installed so far, in installation order.
    pub fn installed(&self) -> &[GeneratorSpec] {
        &self.installed
    }
}

impl Medium for ScriptedMedium {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn next_event_time(&self) -> Option<SimTime> {
        self.script.keys().next().copied()
    }

    fn advance(&mut self, now: SimTime, out: &mut Vec<TraceEvent>) {
        for step in self.script.remove(&now).unwrap_or_default() {
            match step {
                Step::Trace(event)           => out.push(event),
                Step::ApReceived { ap, total } => {
                    self.ap_rx.insert(ap, total);
                }
                Step::Flow(record)           => self.flows.insert(record),
            }
        }
    }

    fn install_generator(&mut self, spec: GeneratorSpec) -> SimResult<()> {
        self.installed.push(spec);
        Ok(())
    }

    fn ap_received_packets(&self, ap: ApId) -> Option<u64> {
        self.ap_rx.get(&ap).copied()
    }

    fn flow_stats(&self) -> &FlowStatsTable {
        &self.flows
    }
}
