//! Sweep Orchestrator.
//!
//! For every point of the cross product, in declared order:
//!
//! 1. Derive the point's [`RunConfiguration`].
//! 2. Build a fresh engine through the [`MediumFactory`] and a fresh
//!    [`Run`][wt_sim::Run] around it (own event store, own clock, own sinks).
//! 3. Run to the stop time, streaming snapshots to the point's writer.
//! 4. Reduce the flow table to a [`RunSummary`] plus one [`FlowSummaryRow`]
//!    per flow, and optionally dump the table as JSON.
//!
//! A point that fails at any step is logged with `error!`, recorded as a
//! `failed` summary with undefined metrics, and the sweep moves on.  Only a
//! failure of the sweep-level summary writer aborts the sweep.
//!
//! With the `parallel` feature, points execute on the rayon pool; their
//! results are still written in declared order.

use tracing::{error, info};

use wt_core::{RunConfiguration, TimingConfig};
use wt_medium::{FluidMedium, FluidParams};
use wt_output::{
    DiscardSnapshots, FlowSummaryRow, LatencyRow, RunOutputObserver, RunStatus, RunSummary,
    SnapshotWriter, SummaryWriter, write_flow_dump,
};
use wt_sim::{Medium, RunBuilder, SimResult};

use crate::config::SweepConfig;
use crate::configurator::{RunConfigurator, SweepPoint};
use crate::reduce::{flow_rows, summarize};
use crate::SweepResult;

/// Builds one engine instance per run.
pub trait MediumFactory: Send + Sync {
    type Medium: Medium;

    fn create(&self, config: &RunConfiguration, timing: &TimingConfig) -> SimResult<Self::Medium>;
}

impl MediumFactory for FluidParams {
    type Medium = FluidMedium;

    fn create(&self, config: &RunConfiguration, timing: &TimingConfig) -> SimResult<FluidMedium> {
        Ok(FluidMedium::new(config, timing, self.clone()))
    }
}

/// What one sweep point produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub flows:   Vec<FlowSummaryRow>,
    pub latency: Vec<LatencyRow>,
}

impl RunOutcome {
    fn failed(point: SweepPoint) -> Self {
        Self {
            summary: RunSummary::failed(point.key(), point.payload_bytes, point.width_mhz, point.band_ghz),
            flows:   Vec::new(),
            latency: Vec::new(),
        }
    }
}

/// Summaries of a finished sweep, in declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub summaries: Vec<RunSummary>,
}

impl SweepReport {
    pub fn ok_count(&self) -> usize {
        self.summaries.iter().filter(|s| s.status == RunStatus::Ok).count()
    }

    pub fn failed_count(&self) -> usize {
        self.summaries.len() - self.ok_count()
    }
}

/// A configured sweep, ready to run.
pub struct Sweep<F: MediumFactory> {
    config:       SweepConfig,
    configurator: RunConfigurator,
    timing:       TimingConfig,
    factory:      F,
}

impl<F: MediumFactory> Sweep<F> {
    pub fn new(config: SweepConfig, factory: F) -> Self {
        Self {
            configurator: config.configurator(),
            timing:       config.timing.to_timing(),
            config,
            factory,
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Execute every point and write the sweep-level tables.
    pub fn run(&self) -> SweepResult<SweepReport> {
        let points = self.config.points()?;
        let out = &self.config.output;
        std::fs::create_dir_all(&out.dir)?;
        let mut writer = out.backend.open_summary(&out.dir)?;

        info!(
            points  = points.len(),
            backend = %out.backend,
            dir     = %out.dir.display(),
            "sweep starting"
        );

        let mut report = SweepReport::default();

        #[cfg(not(feature = "parallel"))]
        for &point in &points {
            let outcome = self.run_point(point);
            record(&mut writer, &mut report, outcome)?;
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let outcomes: Vec<RunOutcome> = points.par_iter().map(|&p| self.run_point(p)).collect();
            for outcome in outcomes {
                record(&mut writer, &mut report, outcome)?;
            }
        }

        writer.finish()?;
        info!(ok = report.ok_count(), failed = report.failed_count(), "sweep finished");
        Ok(report)
    }

    /// Execute one point.  Never fails: errors become a `failed` outcome.
    pub fn run_point(&self, point: SweepPoint) -> RunOutcome {
        match self.execute(point) {
            Ok(outcome) => {
                info!(
                    key            = %outcome.summary.config_key,
                    flows          = outcome.summary.flows,
                    bandwidth_mbps = outcome.summary.bandwidth_mbps.unwrap_or(f64::NAN),
                    drop_rate      = outcome.summary.drop_rate.unwrap_or(f64::NAN),
                    "run complete"
                );
                outcome
            }
            Err(e) => {
                error!(key = %point.key(), error = %e, "run failed");
                RunOutcome::failed(point)
            }
        }
    }

    fn execute(&self, point: SweepPoint) -> SweepResult<RunOutcome> {
        let config = self.configurator.configure(point)?;
        let out    = &self.config.output;

        let medium  = self.factory.create(&config, &self.timing)?;
        let mut run = RunBuilder::new(config.clone(), self.timing.clone(), medium).build()?;

        let snapshots: Box<dyn SnapshotWriter + Send> = if out.snapshots {
            out.backend.open_snapshots(&out.dir, &config.key)?
        } else {
            Box::new(DiscardSnapshots)
        };
        let mut observer = RunOutputObserver::new(snapshots, out.latency);
        run.run(&mut observer)?;
        if let Some(e) = observer.take_error() {
            return Err(e.into());
        }

        let duration_s = self.timing.sim_time.as_secs_f64();
        let table      = run.medium.flow_stats();
        if out.flow_dump {
            write_flow_dump(&out.dir, &config.key, duration_s, table)?;
        }

        Ok(RunOutcome {
            summary: summarize(&config, duration_s, table),
            flows:   flow_rows(&config.key, duration_s, table),
            latency: observer.take_latency(),
        })
    }
}

fn record<W: SummaryWriter + ?Sized>(
    writer:  &mut W,
    report:  &mut SweepReport,
    outcome: RunOutcome,
) -> SweepResult<()> {
    writer.write_summary(&outcome.summary)?;
    writer.write_flows(&outcome.flows)?;
    if !outcome.latency.is_empty() {
        writer.write_latency(&outcome.latency)?;
    }
    report.summaries.push(outcome.summary);
    Ok(())
}
