//! Parquet output backend (feature `parquet`).
//!
//! Creates `snapshots_<key>.parquet` per run.  Undefined metrics are
//! nulls.  Sweep-level tables stay CSV (see [`OutputBackend`]).
//!
//! [`OutputBackend`]: crate::OutputBackend

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt16Builder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::csv::snapshot_file_name;
use crate::writer::SnapshotWriter;
use crate::{OutputResult, SnapshotRow};

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time_s",             DataType::Float64, false),
        Field::new("client_id",          DataType::UInt32,  false),
        Field::new("ap",                 DataType::Utf8,    false),
        Field::new("signal_dbm",         DataType::Float64, true),
        Field::new("queue_delay_ms",     DataType::Float64, true),
        Field::new("ap_station_count",   DataType::UInt32,  false),
        Field::new("ap_queue_depth",     DataType::UInt32,  false),
        Field::new("ap_throughput_mbps", DataType::Float64, true),
        Field::new("ap_utilization",     DataType::Float64, true),
        Field::new("delay_ms",           DataType::Float64, true),
        Field::new("jitter_ms",          DataType::Float64, true),
        Field::new("loss_rate",          DataType::Float64, true),
        Field::new("band_ghz",           DataType::UInt32,  false),
        Field::new("channel_width_mhz",  DataType::UInt16,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes one run's snapshot records to a Parquet file.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetSnapshotWriter {
    snapshots: Option<ArrowWriter<File>>,
    schema:    Arc<Schema>,
}

impl ParquetSnapshotWriter {
    pub fn new(dir: &Path, key: &str) -> OutputResult<Self> {
        let schema = snapshot_schema();
        let file   = File::create(dir.join(snapshot_file_name(key, "parquet")))?;
        let writer = ArrowWriter::try_new(file, Arc::clone(&schema), Some(snappy_props()))?;
        Ok(Self { snapshots: Some(writer), schema })
    }
}

impl SnapshotWriter for ParquetSnapshotWriter {
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.snapshots.as_mut() else {
            return Ok(());
        };

        let mut time_s     = Float64Builder::new();
        let mut client_id  = UInt32Builder::new();
        let mut ap         = StringBuilder::new();
        let mut signal     = Float64Builder::new();
        let mut queue      = Float64Builder::new();
        let mut stations   = UInt32Builder::new();
        let mut depth      = UInt32Builder::new();
        let mut throughput = Float64Builder::new();
        let mut util       = Float64Builder::new();
        let mut delay      = Float64Builder::new();
        let mut jitter     = Float64Builder::new();
        let mut loss       = Float64Builder::new();
        let mut band       = UInt32Builder::new();
        let mut width      = UInt16Builder::new();

        for row in rows {
            time_s.append_value(row.time_s);
            client_id.append_value(row.client_id);
            ap.append_value(&row.ap);
            signal.append_option(row.signal_dbm);
            queue.append_option(row.queue_delay_ms);
            stations.append_value(row.ap_station_count);
            depth.append_value(row.ap_queue_depth);
            throughput.append_option(row.ap_throughput_mbps);
            util.append_option(row.ap_utilization);
            delay.append_option(row.delay_ms);
            jitter.append_option(row.jitter_ms);
            loss.append_option(row.loss_rate);
            band.append_value(row.band_ghz);
            width.append_value(row.channel_width_mhz);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.schema),
            vec![
                Arc::new(time_s.finish()),
                Arc::new(client_id.finish()),
                Arc::new(ap.finish()),
                Arc::new(signal.finish()),
                Arc::new(queue.finish()),
                Arc::new(stations.finish()),
                Arc::new(depth.finish()),
                Arc::new(throughput.finish()),
                Arc::new(util.finish()),
                Arc::new(delay.finish()),
                Arc::new(jitter.finish()),
                Arc::new(loss.finish()),
                Arc::new(band.finish()),
                Arc::new(width.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.snapshots.take() {
            w.close()?;
        }
        Ok(())
    }
}
