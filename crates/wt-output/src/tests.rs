//! Integration tests for wt-output.

#[cfg(test)]
mod fixtures {
    use std::net::Ipv4Addr;

    use crate::{FlowSummaryRow, RunStatus, RunSummary, SnapshotRow};

    pub fn snap_row(client_id: u32, signal: Option<f64>) -> SnapshotRow {
        SnapshotRow {
            time_s:             1.0,
            client_id,
            ap:                 "00:00:00:00:00:01".into(),
            signal_dbm:         signal,
            queue_delay_ms:     Some(5.0),
            ap_station_count:   2,
            ap_queue_depth:     0,
            ap_throughput_mbps: Some(1.2),
            ap_utilization:     Some(0.0015),
            delay_ms:           None,
            jitter_ms:          None,
            loss_rate:          None,
            band_ghz:           5,
            channel_width_mhz:  80,
        }
    }

    pub fn summary(key: &str) -> RunSummary {
        RunSummary {
            config_key:        key.into(),
            packet_size:       1500,
            channel_width_mhz: 80,
            band_ghz:          5,
            flows:             10,
            bandwidth_mbps:    Some(96.5),
            drop_rate:         Some(0.25),
            status:            RunStatus::Ok,
        }
    }

    pub fn flow_row(key: &str, id: u32) -> FlowSummaryRow {
        FlowSummaryRow {
            config_key:     key.into(),
            flow_id:        id,
            source:         Ipv4Addr::new(10, 1, 1, 2),
            destination:    Ipv4Addr::new(10, 1, 1, 1),
            tx_packets:     100,
            rx_packets:     90,
            lost_packets:   10,
            bandwidth_mbps: Some(1.08),
            drop_rate:      Some(0.1),
            mean_delay_ms:  Some(0.5),
            mean_jitter_ms: None,
        }
    }

    pub fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    pub fn records(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::fixtures::{flow_row, headers, records, snap_row, summary};
    use crate::csv::{FLOWS_HEADER, SNAPSHOT_HEADER, SUMMARY_HEADER};
    use crate::writer::{SnapshotWriter, SummaryWriter};
    use crate::{CsvSnapshotWriter, CsvSummaryWriter, LatencyRow, RunStatus, RunSummary};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn snapshot_file_named_by_key() {
        let dir = tmp();
        let mut w = CsvSnapshotWriter::new(dir.path(), "ps1500_w80_b5GHz").unwrap();
        w.finish().unwrap();
        let path = dir.path().join("snapshots_ps1500_w80_b5GHz.csv");
        assert!(path.exists());
        assert_eq!(headers(&path), SNAPSHOT_HEADER);
    }

    #[test]
    fn undefined_metrics_render_as_nan() {
        let dir = tmp();
        let mut w = CsvSnapshotWriter::new(dir.path(), "k").unwrap();
        w.write_snapshots(&[snap_row(0, Some(-50.0)), snap_row(1, None)]).unwrap();
        w.finish().unwrap();

        let rows = records(&dir.path().join("snapshots_k.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "0");
        assert_eq!(&rows[0][3], "-50");
        assert_eq!(&rows[1][3], "nan");
        assert_eq!(&rows[1][4], "5");
        assert_eq!(&rows[1][9], "nan");
        assert_eq!(&rows[1][11], "nan");
        assert_eq!(&rows[1][12], "5");
        assert_eq!(&rows[1][13], "80");
    }

    #[test]
    fn summary_appends_with_single_header() {
        let dir = tmp();
        for key in ["a", "b"] {
            let mut w = CsvSummaryWriter::new(dir.path()).unwrap();
            w.write_summary(&summary(key)).unwrap();
            w.finish().unwrap();
        }
        let path = dir.path().join("summary.csv");
        assert_eq!(headers(&path), SUMMARY_HEADER);
        let rows = records(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "a");
        assert_eq!(&rows[1][0], "b");
        assert_eq!(&rows[1][5], "96.5");
        assert_eq!(&rows[1][6], "0.25");
        assert_eq!(&rows[1][7], "ok");
    }

    #[test]
    fn failed_summary_marks_metrics_nan() {
        let dir = tmp();
        let mut w = CsvSummaryWriter::new(dir.path()).unwrap();
        w.write_summary(&RunSummary::failed("ps1500_w40_b6GHz".into(), 1500, 40, 6)).unwrap();
        w.finish().unwrap();
        let rows = records(&dir.path().join("summary.csv"));
        assert_eq!(&rows[0][4], "0");
        assert_eq!(&rows[0][5], "nan");
        assert_eq!(&rows[0][6], "nan");
        assert_eq!(&rows[0][7], RunStatus::Failed.as_str());
    }

    #[test]
    fn flows_and_latency_rows() {
        let dir = tmp();
        let mut w = CsvSummaryWriter::new(dir.path()).unwrap();
        w.write_flows(&[flow_row("k", 1), flow_row("k", 2)]).unwrap();
        w.write_latency(&[LatencyRow {
            time_s:            1.5,
            delay_s:           0.0002,
            channel_width_mhz: 160,
            packet_size:       3000,
            band_ghz:          6,
        }])
        .unwrap();
        w.finish().unwrap();

        let flows = dir.path().join("flows.csv");
        assert_eq!(headers(&flows), FLOWS_HEADER);
        let rows = records(&flows);
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][1], "2");
        assert_eq!(&rows[1][2], "10.1.1.2");
        assert_eq!(&rows[1][10], "nan");

        let latency = records(&dir.path().join("latency.csv"));
        assert_eq!(latency.len(), 1);
        assert_eq!(&latency[0][4], "b6");
        assert_eq!(&latency[0][1], "0.0002");
    }
}

#[cfg(test)]
mod observer_tests {
    use std::net::Ipv4Addr;

    use tempfile::TempDir;
    use wt_core::{ApId, Band, ClientId, MacAddr, NodeId, RunConfiguration, SimTime, TimingConfig, channel_settings};
    use wt_sim::{NoopObserver, RunBuilder, ScriptedMedium};
    use wt_trace::{ApContext, ClientContext, Device, NodeRole, Topology, TopologyNode, TraceEvent};

    use super::fixtures::records;
    use crate::{CsvSnapshotWriter, DiscardSnapshots, RunOutputObserver};

    const AP_MAC: MacAddr = MacAddr([0, 0, 0, 0, 0, 1]);

    fn config() -> RunConfiguration {
        RunConfiguration {
            key:                 "ps1500_w160_b6GHz".into(),
            payload_bytes:       1500,
            channel:             channel_settings(Band::Ghz6, 160).unwrap(),
            client_count:        1,
            ap_count:            1,
            distance_m:          20.0,
            target_rate_mbps:    200.0,
            client_interval:     SimTime::from_micros(60),
            client_start_jitter: vec![SimTime::ZERO],
            seed:                1,
        }
    }

    fn medium() -> ScriptedMedium {
        let topo = Topology::new(vec![
            TopologyNode {
                node:    NodeId(0),
                role:    NodeRole::AccessPoint(ApId(0)),
                devices: vec![Device { mac: AP_MAC }],
                ipv4:    vec![Ipv4Addr::new(10, 1, 1, 1)],
            },
            TopologyNode {
                node:    NodeId(1),
                role:    NodeRole::Client(ClientId(0)),
                devices: vec![Device { mac: MacAddr([0, 0, 0, 0, 0, 2]) }],
                ipv4:    vec![Ipv4Addr::new(10, 1, 1, 2)],
            },
        ]);
        let ctx = ClientContext { client: ClientId(0), node: NodeId(1) };
        let ap  = ApContext { ap: ApId(0), node: NodeId(0) };
        ScriptedMedium::new(topo)
            .trace(SimTime::from_millis(10), TraceEvent::Association { ctx, ap: AP_MAC })
            .trace(SimTime::from_millis(700), TraceEvent::Delivered {
                ctx:     ap,
                packet:  wt_core::PacketId(0),
                sent_at: SimTime::from_millis(699),
            })
    }

    fn timing() -> TimingConfig {
        TimingConfig { sim_time: SimTime::from_secs(3), ..TimingConfig::default() }
    }

    #[test]
    fn writes_one_row_per_tick() {
        let dir: TempDir = tempfile::tempdir().unwrap();
        let writer = CsvSnapshotWriter::new(dir.path(), &config().key).unwrap();
        let mut obs = RunOutputObserver::new(writer, true);
        let mut run = RunBuilder::new(config(), timing(), medium()).build().unwrap();
        run.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());
        assert_eq!(obs.rows_written(), 3);

        let rows = records(&dir.path().join("snapshots_ps1500_w160_b6GHz.csv"));
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[2][0], "3");
        assert_eq!(&rows[0][2], "00:00:00:00:00:01");
        assert_eq!(&rows[0][3], "nan");
        assert_eq!(&rows[0][12], "6");
        assert_eq!(&rows[0][13], "160");

        let latency = obs.take_latency();
        assert_eq!(latency.len(), 1);
        assert_eq!(latency[0].band_ghz, 6);
        assert_eq!(latency[0].packet_size, 1500);
        assert_eq!(latency[0].channel_width_mhz, 160);
        assert!((latency[0].delay_s - 0.001).abs() < 1e-12);
    }

    #[test]
    fn latency_off_collects_nothing() {
        let mut obs = RunOutputObserver::new(DiscardSnapshots, false);
        let mut run = RunBuilder::new(config(), timing(), medium()).build().unwrap();
        run.run(&mut obs).unwrap();
        assert!(obs.take_latency().is_empty());
        assert_eq!(obs.rows_written(), 3);
    }

    #[test]
    fn composes_with_other_observers() {
        let mut pair = (RunOutputObserver::new(DiscardSnapshots, true), NoopObserver);
        let mut run = RunBuilder::new(config(), timing(), medium()).build().unwrap();
        run.run(&mut pair).unwrap();
        assert_eq!(pair.0.take_latency().len(), 1);
        assert_eq!(pair.0.rows_written(), 3);
    }
}

#[cfg(test)]
mod flowdump_tests {
    use std::net::Ipv4Addr;

    use wt_core::{FlowId, SimTime};
    use wt_sim::{FlowKey, FlowStats, FlowStatsTable, PROTO_UDP, SINK_PORT};

    use crate::write_flow_dump;

    #[test]
    fn dump_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = FlowStatsTable::new();
        let key = FlowKey {
            source:           Ipv4Addr::new(10, 1, 1, 2),
            destination:      Ipv4Addr::new(10, 1, 1, 1),
            protocol:         PROTO_UDP,
            source_port:      49153,
            destination_port: SINK_PORT,
        };
        *table.entry(FlowId(1), key) = FlowStats {
            tx_packets: 3,
            rx_packets: 2,
            lost_packets: 1,
            delay_sum: SimTime::from_millis(2),
            ..FlowStats::default()
        };
        let path = write_flow_dump(dir.path(), "ps1500_w80_b5GHz", 10.0, &table).unwrap();
        assert!(path.ends_with("flowmon_ps1500_w80_b5GHz.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["config_key"], "ps1500_w80_b5GHz");
        assert_eq!(v["flows"][0]["flow_id"], 1);
        assert_eq!(v["flows"][0]["source"], "10.1.1.2");
        assert_eq!(v["flows"][0]["lost_packets"], 1);
        assert_eq!(v["flows"][0]["delay_sum_s"], 0.002);
        assert!(v["flows"][0]["last_rx_s"].is_null());
    }
}

#[cfg(test)]
mod backend_tests {
    use crate::OutputBackend;
    use crate::writer::{SnapshotWriter, SummaryWriter};

    #[test]
    fn parse_and_display() {
        assert_eq!("CSV".parse::<OutputBackend>().unwrap(), OutputBackend::Csv);
        assert_eq!("sqlite".parse::<OutputBackend>().unwrap(), OutputBackend::Sqlite);
        assert!("xml".parse::<OutputBackend>().is_err());
        assert_eq!(OutputBackend::Parquet.to_string(), "parquet");
    }

    #[test]
    fn csv_backend_opens() {
        let dir = tempfile::tempdir().unwrap();
        let mut snaps = OutputBackend::Csv.open_snapshots(dir.path(), "k").unwrap();
        snaps.finish().unwrap();
        let mut sum = OutputBackend::Csv.open_summary(dir.path()).unwrap();
        sum.finish().unwrap();
        assert!(dir.path().join("snapshots_k.csv").exists());
        assert!(dir.path().join("summary.csv").exists());
    }

    #[cfg(not(feature = "sqlite"))]
    #[test]
    fn disabled_backend_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(OutputBackend::Sqlite.open_snapshots(dir.path(), "k").is_err());
        assert!(OutputBackend::Sqlite.open_summary(dir.path()).is_err());
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use rusqlite::Connection;

    use super::fixtures::{flow_row, snap_row, summary};
    use crate::writer::{SnapshotWriter, SummaryWriter};
    use crate::{SqliteSnapshotWriter, SqliteSummaryWriter};

    #[test]
    fn tables_filled_and_nan_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let mut snaps = SqliteSnapshotWriter::new(dir.path(), "k").unwrap();
        snaps.write_snapshots(&[snap_row(0, None), snap_row(1, Some(-60.0))]).unwrap();
        snaps.finish().unwrap();
        let mut sum = SqliteSummaryWriter::new(dir.path()).unwrap();
        sum.write_summary(&summary("k")).unwrap();
        sum.write_flows(&[flow_row("k", 1)]).unwrap();
        sum.finish().unwrap();

        let conn = Connection::open(dir.path().join("output.db")).unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM snapshots", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 2);
        let nulls: i64 = conn
            .query_row("SELECT COUNT(*) FROM snapshots WHERE signal_dbm IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(nulls, 1);
        let status: String = conn
            .query_row("SELECT status FROM run_summaries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(status, "ok");
        let flows: i64 = conn.query_row("SELECT COUNT(*) FROM flow_summaries", [], |r| r.get(0)).unwrap();
        assert_eq!(flows, 1);
    }
}

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use super::fixtures::snap_row;
    use crate::ParquetSnapshotWriter;
    use crate::writer::SnapshotWriter;

    #[test]
    fn file_created_after_finish() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = ParquetSnapshotWriter::new(dir.path(), "k").unwrap();
        w.write_snapshots(&[snap_row(0, None)]).unwrap();
        w.finish().unwrap();
        let path = dir.path().join("snapshots_k.parquet");
        assert!(path.exists());
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}
