//! Tests for wt-sweep.

#[cfg(test)]
mod configurator {
    use wt_core::{Band, ConfigError, SimTime};

    use crate::{JitterSpec, RunConfigurator, SweepPoint, draw_jitter, run_seed, send_interval};

    fn configurator() -> RunConfigurator {
        RunConfigurator {
            client_count:     10,
            ap_count:         1,
            distance_m:       20.0,
            target_rate_mbps: 200.0,
            jitter:           JitterSpec { mean_s: 0.01, std_s: 0.005, floor_s: 0.0 },
            seed:             1,
        }
    }

    fn point(payload_bytes: u32, width_mhz: u16, band_ghz: u32) -> SweepPoint {
        SweepPoint { payload_bytes, width_mhz, band_ghz }
    }

    #[test]
    fn interval_from_target_rate() {
        // 10 · 1500 · 8 / 200e6 = 600 µs
        assert_eq!(send_interval(10, 1500, 200.0).unwrap(), SimTime::from_micros(600));
        assert_eq!(send_interval(1, 1000, 8.0).unwrap(), SimTime::from_millis(1));
    }

    #[test]
    fn interval_rejects_non_positive_inputs() {
        assert!(matches!(send_interval(0, 1500, 200.0), Err(ConfigError::NonPositive { .. })));
        assert!(matches!(send_interval(10, 0, 200.0), Err(ConfigError::NonPositive { .. })));
        assert!(matches!(send_interval(10, 1500, 0.0), Err(ConfigError::NonPositive { .. })));
        assert!(matches!(send_interval(10, 1500, -5.0), Err(ConfigError::NonPositive { .. })));
        assert!(matches!(send_interval(10, 1500, f64::NAN), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn configure_derives_channel_and_key() {
        let cfg = configurator().configure(point(3000, 160, 6)).unwrap();
        assert_eq!(cfg.key, "ps3000_w160_b6GHz");
        assert_eq!(cfg.channel.number, 15);
        assert_eq!(cfg.channel.band, Band::Ghz6);
        assert_eq!(cfg.channel.primary20, 0);
        assert_eq!(cfg.client_count, 10);
        assert_eq!(cfg.client_start_jitter.len(), 10);
        assert_eq!(cfg.client_interval, SimTime::from_micros(1200));
    }

    #[test]
    fn unsupported_pairs_fail() {
        let c = configurator();
        assert_eq!(
            c.configure(point(1500, 40, 6)).unwrap_err(),
            ConfigError::UnsupportedChannel { band: 6, width_mhz: 40 }
        );
        assert_eq!(c.configure(point(1500, 80, 2)).unwrap_err(), ConfigError::UnsupportedBand(2));
        let no_aps = RunConfigurator { ap_count: 0, ..configurator() };
        assert!(no_aps.configure(point(1500, 80, 5)).is_err());
    }

    #[test]
    fn configuration_is_order_independent() {
        let c = configurator();
        let a = c.configure(point(1500, 80, 5)).unwrap();
        let _ = c.configure(point(3000, 160, 6)).unwrap();
        let b = c.configure(point(1500, 80, 5)).unwrap();
        assert_eq!(a, b);
        let other = c.configure(point(1500, 80, 6)).unwrap();
        assert_ne!(a.seed, other.seed);
        assert_ne!(a.client_start_jitter, other.client_start_jitter);
    }

    #[test]
    fn sweep_seed_changes_jitter() {
        let a = configurator().configure(point(1500, 80, 5)).unwrap();
        let b = RunConfigurator { seed: 2, ..configurator() }.configure(point(1500, 80, 5)).unwrap();
        assert_ne!(a.client_start_jitter, b.client_start_jitter);
    }

    #[test]
    fn jitter_clamped_to_floor() {
        let spec = JitterSpec { mean_s: -1.0, std_s: 0.0, floor_s: 0.002 };
        let j = draw_jitter(9, 4, &spec).unwrap();
        assert_eq!(j, vec![SimTime::from_millis(2); 4]);

        let spread = JitterSpec { mean_s: 0.0, std_s: 0.01, floor_s: 0.0 };
        let j = draw_jitter(run_seed(1, point(1500, 80, 5)), 50, &spread).unwrap();
        assert!(j.iter().any(|&t| t == SimTime::ZERO));
        assert!(j.iter().any(|&t| t > SimTime::ZERO));
    }

    #[test]
    fn zero_spread_jitter_is_constant() {
        let spec = JitterSpec { mean_s: 0.005, std_s: 0.0, floor_s: 0.0 };
        let j = draw_jitter(3, 3, &spec).unwrap();
        assert_eq!(j, vec![SimTime::from_millis(5); 3]);
    }

    #[test]
    fn bad_jitter_parameters_fail() {
        let negative_std = JitterSpec { mean_s: 0.0, std_s: -1.0, floor_s: 0.0 };
        assert!(matches!(draw_jitter(1, 2, &negative_std), Err(ConfigError::Jitter(_))));
        let negative_floor = JitterSpec { mean_s: 0.0, std_s: 0.0, floor_s: -0.1 };
        assert!(matches!(draw_jitter(1, 2, &negative_floor), Err(ConfigError::Jitter(_))));
        let infinite_std = JitterSpec { mean_s: 0.0, std_s: f64::INFINITY, floor_s: 0.0 };
        assert!(matches!(draw_jitter(1, 2, &infinite_std), Err(ConfigError::Jitter(_))));
    }
}

#[cfg(test)]
mod config {
    use wt_core::{SimTime, ThroughputSource, TrafficStart};
    use wt_output::OutputBackend;

    use crate::{SweepConfig, SweepError, SweepPoint};

    #[test]
    fn empty_json_is_default() {
        let cfg = SweepConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SweepConfig::default());
        assert_eq!(cfg.payload_sizes.first(), Some(&1500));
        assert_eq!(cfg.payload_sizes.last(), Some(&15000));
        assert_eq!(cfg.points().unwrap().len(), 40);
        assert!(cfg.output.snapshots);
        assert!(!cfg.output.latency);
    }

    #[test]
    fn points_in_declared_order() {
        let cfg = SweepConfig {
            payload_sizes:  vec![3000, 1500],
            channel_widths: vec![160, 80],
            bands:          vec![6, 5],
            ..SweepConfig::default()
        };
        let points = cfg.points().unwrap();
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], SweepPoint { payload_bytes: 3000, width_mhz: 160, band_ghz: 6 });
        assert_eq!(points[1], SweepPoint { payload_bytes: 3000, width_mhz: 160, band_ghz: 5 });
        assert_eq!(points[2], SweepPoint { payload_bytes: 3000, width_mhz: 80, band_ghz: 6 });
        assert_eq!(points[7], SweepPoint { payload_bytes: 1500, width_mhz: 80, band_ghz: 5 });
    }

    #[test]
    fn empty_axis_rejected() {
        let cfg = SweepConfig { bands: vec![], ..SweepConfig::default() };
        assert!(matches!(cfg.points(), Err(SweepError::EmptyAxis("bands"))));
    }

    #[test]
    fn partial_json_overrides() {
        let cfg = SweepConfig::from_json(
            r#"{
                "payload_sizes": [500],
                "client_count": 4,
                "jitter": { "std_s": 0.002 },
                "timing": {
                    "sim_time_s": 3,
                    "resolution_delay_ms": 20,
                    "traffic_start": { "at_fixed_time": { "start_s": 1.5 } },
                    "throughput_source": "flow_counters"
                },
                "output": { "dir": "out", "backend": "sqlite", "latency": true }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.payload_sizes, vec![500]);
        assert_eq!(cfg.channel_widths, vec![80, 160]);
        assert_eq!(cfg.client_count, 4);
        assert_eq!(cfg.jitter.std_s, 0.002);
        assert_eq!(cfg.jitter.mean_s, 0.0);
        assert_eq!(cfg.output.backend, OutputBackend::Sqlite);
        assert!(cfg.output.latency);
        assert!(cfg.output.flow_dump);

        let timing = cfg.timing.to_timing();
        assert_eq!(timing.sim_time, SimTime::from_secs(3));
        assert_eq!(timing.resolution_delay, SimTime::from_millis(20));
        assert_eq!(timing.generator_start_offset, SimTime::from_millis(10));
        assert_eq!(timing.traffic_start, TrafficStart::AtFixedTime(SimTime::from_millis(1500)));
        assert_eq!(timing.throughput_source, ThroughputSource::FlowCounters);
    }

    #[test]
    fn default_timing_matches_core_defaults() {
        assert_eq!(SweepConfig::default().timing.to_timing(), wt_core::TimingConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let cfg = SweepConfig { seed: 99, ..SweepConfig::default() };
        let back = SweepConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(SweepConfig::from_json("{\"bands\": 5}"), Err(SweepError::Json(_))));
        let missing = std::path::Path::new("/nonexistent/sweep.json");
        assert!(matches!(SweepConfig::load(missing), Err(SweepError::ReadConfig { .. })));
    }
}

#[cfg(test)]
mod reduce {
    use std::net::Ipv4Addr;

    use wt_core::{Band, FlowId, RunConfiguration, SimTime, channel_settings};
    use wt_output::RunStatus;
    use wt_sim::{FlowKey, FlowStats, FlowStatsTable, PROTO_UDP, SINK_PORT};

    use crate::{flow_rows, summarize};

    fn key(client: u8) -> FlowKey {
        FlowKey {
            source:           Ipv4Addr::new(10, 1, 1, 2 + client),
            destination:      Ipv4Addr::new(10, 1, 1, 1),
            protocol:         PROTO_UDP,
            source_port:      49153 + u16::from(client),
            destination_port: SINK_PORT,
        }
    }

    fn config() -> RunConfiguration {
        RunConfiguration {
            key:                 "ps1000_w80_b5GHz".into(),
            payload_bytes:       1000,
            channel:             channel_settings(Band::Ghz5, 80).unwrap(),
            client_count:        3,
            ap_count:            1,
            distance_m:          20.0,
            target_rate_mbps:    20.0,
            client_interval:     SimTime::from_millis(1),
            client_start_jitter: vec![SimTime::ZERO; 3],
            seed:                1,
        }
    }

    fn table() -> FlowStatsTable {
        let mut t = FlowStatsTable::new();
        *t.entry(FlowId(1), key(0)) = FlowStats {
            tx_packets:   100,
            rx_packets:   80,
            lost_packets: 20,
            tx_bytes:     100_000,
            rx_bytes:     80_000,
            delay_sum:    SimTime::from_millis(80),
            jitter_sum:   SimTime::from_millis(79),
            ..FlowStats::default()
        };
        *t.entry(FlowId(2), key(1)) = FlowStats {
            tx_packets:   100,
            rx_packets:   100,
            tx_bytes:     100_000,
            rx_bytes:     100_000,
            delay_sum:    SimTime::from_millis(50),
            ..FlowStats::default()
        };
        t.entry(FlowId(3), key(2));
        t
    }

    #[test]
    fn summary_sums_over_flows() {
        let s = summarize(&config(), 2.0, &table());
        assert_eq!(s.config_key, "ps1000_w80_b5GHz");
        assert_eq!(s.packet_size, 1000);
        assert_eq!(s.channel_width_mhz, 80);
        assert_eq!(s.band_ghz, 5);
        assert_eq!(s.flows, 2);
        // 180 000 B · 8 / (2 s · 1e6)
        assert!((s.bandwidth_mbps.unwrap() - 0.72).abs() < 1e-12);
        assert!((s.drop_rate.unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(s.status, RunStatus::Ok);
    }

    #[test]
    fn nothing_sent_leaves_drop_rate_undefined() {
        let s = summarize(&config(), 2.0, &FlowStatsTable::new());
        assert_eq!(s.flows, 0);
        assert_eq!(s.bandwidth_mbps, Some(0.0));
        assert_eq!(s.drop_rate, None);
    }

    #[test]
    fn one_row_per_flow() {
        let rows = flow_rows("k", 2.0, &table());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].flow_id, 1);
        assert_eq!(rows[0].source, Ipv4Addr::new(10, 1, 1, 2));
        assert_eq!(rows[0].drop_rate, Some(0.2));
        assert_eq!(rows[0].mean_delay_ms, Some(1.0));
        assert_eq!(rows[0].mean_jitter_ms, Some(1.0));
        assert_eq!(rows[1].mean_jitter_ms, Some(0.0));
        assert_eq!(rows[2].drop_rate, None);
        assert_eq!(rows[2].mean_delay_ms, None);
        assert_eq!(rows[2].bandwidth_mbps, Some(0.0));
    }
}

#[cfg(test)]
mod sweep {
    use std::collections::HashSet;
    use std::path::Path;

    use tempfile::TempDir;
    use wt_medium::FluidParams;
    use wt_output::RunStatus;

    use crate::{JitterSpec, Sweep, SweepConfig, SweepPoint, TimingSpec, TrafficStartSpec};

    fn small(dir: &Path) -> SweepConfig {
        let mut cfg = SweepConfig {
            payload_sizes:    vec![500, 1000],
            channel_widths:   vec![80, 160],
            bands:            vec![5, 6],
            client_count:     2,
            target_rate_mbps: 20.0,
            jitter:           JitterSpec { mean_s: 0.01, std_s: 0.005, floor_s: 0.0 },
            timing:           TimingSpec { sim_time_s: 2.0, ..TimingSpec::default() },
            ..SweepConfig::default()
        };
        cfg.output.dir = dir.to_path_buf();
        cfg.output.latency = true;
        cfg
    }

    fn read(path: &Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn two_by_two_by_two() {
        let dir: TempDir = tempfile::tempdir().unwrap();
        let report = Sweep::new(small(dir.path()), FluidParams::default()).run().unwrap();

        assert_eq!(report.summaries.len(), 8);
        assert_eq!(report.ok_count(), 8);
        let keys: HashSet<&str> = report.summaries.iter().map(|s| s.config_key.as_str()).collect();
        assert_eq!(keys.len(), 8);
        for s in &report.summaries {
            let bw = s.bandwidth_mbps.unwrap();
            assert!(bw.is_finite() && bw > 0.0, "{}: bandwidth {bw}", s.config_key);
            let drop = s.drop_rate.unwrap();
            assert!((0.0..=1.0).contains(&drop), "{}: drop {drop}", s.config_key);
            assert_eq!(s.flows, 2);
        }
        assert_eq!(report.summaries[0].config_key, "ps500_w80_b5GHz");
        assert_eq!(report.summaries[1].config_key, "ps500_w80_b6GHz");
        assert_eq!(report.summaries[7].config_key, "ps1000_w160_b6GHz");

        let rows = read(&dir.path().join("summary.csv"));
        assert_eq!(rows.len(), 8);
        assert_eq!(&rows[0][0], "ps500_w80_b5GHz");
        assert!(rows.iter().all(|r| &r[7] == "ok"));

        assert_eq!(read(&dir.path().join("flows.csv")).len(), 16);
        assert!(!read(&dir.path().join("latency.csv")).is_empty());

        for s in &report.summaries {
            let snaps = read(&dir.path().join(format!("snapshots_{}.csv", s.config_key)));
            // two ticks, two associated clients
            assert_eq!(snaps.len(), 4, "{}", s.config_key);
            assert!(dir.path().join(format!("flowmon_{}.json", s.config_key)).exists());
        }
    }

    #[test]
    fn failed_point_is_recorded_and_sweep_continues() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SweepConfig {
            payload_sizes:  vec![500],
            channel_widths: vec![40],
            bands:          vec![6, 5],
            ..small(dir.path())
        };
        let report = Sweep::new(cfg, FluidParams::default()).run().unwrap();
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.summaries[0].status, RunStatus::Failed);
        assert_eq!(report.summaries[1].status, RunStatus::Ok);

        let rows = read(&dir.path().join("summary.csv"));
        assert_eq!(&rows[0][0], "ps500_w40_b6GHz");
        assert_eq!(&rows[0][5], "nan");
        assert_eq!(&rows[0][6], "nan");
        assert_eq!(&rows[0][7], "failed");
        assert_eq!(&rows[1][7], "ok");
        assert!(!dir.path().join("snapshots_ps500_w40_b6GHz.csv").exists());
    }

    #[test]
    fn reruns_are_reproducible() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        Sweep::new(small(a.path()), FluidParams::default()).run().unwrap();
        Sweep::new(small(b.path()), FluidParams::default()).run().unwrap();
        for file in ["summary.csv", "flows.csv", "snapshots_ps1000_w160_b5GHz.csv"] {
            let x = std::fs::read_to_string(a.path().join(file)).unwrap();
            let y = std::fs::read_to_string(b.path().join(file)).unwrap();
            assert_eq!(x, y, "{file}");
        }
    }

    #[test]
    fn summary_appends_across_sweeps() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SweepConfig { payload_sizes: vec![500], bands: vec![5], ..small(dir.path()) };
        Sweep::new(cfg.clone(), FluidParams::default()).run().unwrap();
        Sweep::new(cfg, FluidParams::default()).run().unwrap();
        assert_eq!(read(&dir.path().join("summary.csv")).len(), 4);
    }

    #[test]
    fn fixed_start_and_optional_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = SweepConfig { payload_sizes: vec![1000], bands: vec![6], ..small(dir.path()) };
        cfg.timing.traffic_start = TrafficStartSpec::AtFixedTime { start_s: 1.0 };
        cfg.output.snapshots = false;
        cfg.output.flow_dump = false;
        cfg.output.latency = false;
        let report = Sweep::new(cfg, FluidParams::default()).run().unwrap();
        assert_eq!(report.ok_count(), 2);
        assert!(report.summaries.iter().all(|s| s.bandwidth_mbps.unwrap() > 0.0));
        assert!(!dir.path().join("snapshots_ps1000_w80_b6GHz.csv").exists());
        assert!(!dir.path().join("flowmon_ps1000_w80_b6GHz.json").exists());
        assert!(read(&dir.path().join("latency.csv")).is_empty());
    }

    #[test]
    fn run_point_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sweep = Sweep::new(small(dir.path()), FluidParams::default());
        let bad = sweep.run_point(SweepPoint { payload_bytes: 0, width_mhz: 80, band_ghz: 5 });
        assert_eq!(bad.summary.status, RunStatus::Failed);
        assert_eq!(bad.summary.config_key, "ps0_w80_b5GHz");
        assert!(bad.flows.is_empty());
    }
}
