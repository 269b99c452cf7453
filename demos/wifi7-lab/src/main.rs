//! wifi7-lab — run Wi-Fi 7 telemetry sweeps on the fluid engine.
//!
//! ```text
//! wifi7-lab defaults > sweep.json           # print the default config
//! wifi7-lab sweep --config sweep.json       # full payload × width × band sweep
//! wifi7-lab features --band 6 --width 160   # one point, two APs, per-client snapshots
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`; the sweep report is
//! printed to stdout as JSON.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use wt_core::ThroughputSource;
use wt_medium::FluidParams;
use wt_output::{OutputBackend, RunStatus};
use wt_sweep::{Sweep, SweepConfig, SweepReport, TrafficStartSpec};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wifi7-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a payload × width × band sweep.
    Sweep(SweepArgs),
    /// Run one point with two APs and per-client feature snapshots.
    Features(FeaturesArgs),
    /// Print the default sweep configuration as JSON.
    Defaults,
}

/// Overrides shared by both run commands.  Unset flags keep the config value.
#[derive(Args, Debug)]
struct Overrides {
    /// Output directory.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Output backend: csv, sqlite or parquet.
    #[arg(long)]
    backend: Option<OutputBackend>,

    /// Sweep seed for start-time jitter.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of client stations.
    #[arg(long)]
    clients: Option<u32>,

    /// Aggregate offered load, in Mbps.
    #[arg(long)]
    rate: Option<f64>,

    /// Simulated seconds per run.
    #[arg(long)]
    sim_time: Option<f64>,

    /// Write one latency row per delivered packet.
    #[arg(long)]
    latency: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// JSON sweep config; defaults are used when omitted.
    #[arg(short, long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start every generator at this instant (seconds) instead of after
    /// association.
    #[arg(long, value_name = "SECS")]
    fixed_start: Option<f64>,

    /// Take AP throughput from the flow table instead of AP receive counters.
    #[arg(long)]
    flow_counters: bool,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Args, Debug)]
struct FeaturesArgs {
    #[arg(long, default_value = "1500")]
    payload: u32,

    #[arg(long, default_value = "80")]
    width: u16,

    #[arg(long, default_value = "5")]
    band: u32,

    #[arg(long, default_value = "2")]
    aps: u32,

    #[command(flatten)]
    overrides: Overrides,
}

impl Overrides {
    fn apply(&self, config: &mut SweepConfig) {
        if let Some(out) = &self.out {
            config.output.dir = out.clone();
        }
        if let Some(backend) = self.backend {
            config.output.backend = backend;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(clients) = self.clients {
            config.client_count = clients;
        }
        if let Some(rate) = self.rate {
            config.target_rate_mbps = rate;
        }
        if let Some(secs) = self.sim_time {
            config.timing.sim_time_s = secs;
        }
        if self.latency {
            config.output.latency = true;
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn sweep(args: SweepArgs) -> Result<SweepReport> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => SweepConfig::default(),
    };
    if let Some(start_s) = args.fixed_start {
        config.timing.traffic_start = TrafficStartSpec::AtFixedTime { start_s };
    }
    if args.flow_counters {
        config.timing.throughput_source = ThroughputSource::FlowCounters;
    }
    args.overrides.apply(&mut config);
    run(config)
}

fn features(args: FeaturesArgs) -> Result<SweepReport> {
    let mut config = SweepConfig {
        payload_sizes:  vec![args.payload],
        channel_widths: vec![args.width],
        bands:          vec![args.band],
        ap_count:       args.aps,
        ..SweepConfig::default()
    };
    config.timing.traffic_start = TrafficStartSpec::OnAssociation;
    config.output.dir = PathBuf::from("features");
    args.overrides.apply(&mut config);
    run(config)
}

fn run(config: SweepConfig) -> Result<SweepReport> {
    let dir = config.output.dir.clone();
    let points = config.points()?.len();
    info!(points, dir = %dir.display(), "starting");

    let started = Instant::now();
    let report = Sweep::new(config, FluidParams::default())
        .run()
        .with_context(|| format!("sweep into {}", dir.display()))?;
    info!(
        ok      = report.ok_count(),
        failed  = report.failed_count(),
        elapsed = format!("{:.2?}", started.elapsed()),
        "done"
    );
    Ok(report)
}

fn print_report(report: &SweepReport) -> Result<()> {
    let runs: Vec<serde_json::Value> = report
        .summaries
        .iter()
        .map(|s| {
            serde_json::json!({
                "config_key":     s.config_key,
                "status":         s.status.as_str(),
                "flows":          s.flows,
                "bandwidth_mbps": s.bandwidth_mbps,
                "drop_rate":      s.drop_rate,
            })
        })
        .collect();
    let body = serde_json::json!({
        "ok":     report.ok_count(),
        "failed": report.failed_count(),
        "runs":   runs,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,wt_sweep=info,wifi7_lab=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let report = match cli.command {
        Command::Sweep(args) => sweep(args)?,
        Command::Features(args) => features(args)?,
        Command::Defaults => {
            println!("{}", SweepConfig::default().to_json()?);
            return Ok(());
        }
    };
    print_report(&report)?;

    if report.summaries.iter().all(|s| s.status == RunStatus::Failed) {
        anyhow::bail!("every run failed");
    }
    Ok(())
}
