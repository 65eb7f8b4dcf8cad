use arrow::array::{Float32Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parhist_core::{
    export_csv, export_json, read_float_column, Layout, Orchestrator, ParhistError, Topology,
};
use parquet::arrow::ArrowWriter;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_fixture() -> NamedTempFile {
    let tmp = tempfile::Builder::new()
        .suffix(".parquet")
        .tempfile()
        .unwrap();
    let schema = Arc::new(Schema::new(vec![
        Field::new("reading", DataType::Float32, true),
        Field::new("id", DataType::Int32, false),
        Field::new("label", DataType::Utf8, true),
    ]));
    let readings = Arc::new(Float32Array::from(vec![
        Some(0.5),
        Some(1.5),
        None,
        Some(2.5),
        Some(9.9),
        Some(10.0),
    ]));
    let ids = Arc::new(Int32Array::from(vec![1, 2, 3, 4, 5, 6]));
    let labels = Arc::new(StringArray::from(vec![
        Some("a"),
        None,
        Some("c"),
        None,
        Some("e"),
        None,
    ]));
    let batch = RecordBatch::try_new(schema.clone(), vec![readings, ids, labels]).unwrap();
    let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    tmp
}

#[test]
fn float_column_skips_nulls() {
    let tmp = write_fixture();
    let values = read_float_column(tmp.path(), "reading").unwrap();
    assert_eq!(values.len(), 5);
    assert!((values[4] - 10.0).abs() < 1e-6);
}

#[test]
fn integer_column_is_cast() {
    let tmp = write_fixture();
    let values = read_float_column(tmp.path(), "id").unwrap();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn missing_or_text_column_rejected() {
    let tmp = write_fixture();
    assert!(matches!(read_float_column(tmp.path(), "nope"), Err(ParhistError::Other(_))));
    assert!(matches!(read_float_column(tmp.path(), "label"), Err(ParhistError::Other(_))));
}

#[test]
fn parquet_column_through_both_topologies() {
    let tmp = write_fixture();
    let values = read_float_column(tmp.path(), "reading").unwrap();
    let layout = Layout::new(0.0, 10.0, 2).unwrap();
    for topology in [Topology::Shared, Topology::Distributed] {
        let run = Orchestrator::new(layout, 2, topology).unwrap().run(&values).unwrap();
        assert_eq!(run.histogram.counts(), vec![3, 2]);
    }
}

#[test]
fn exports_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let layout = Layout::new(0.0, 10.0, 2).unwrap();
    let run = Orchestrator::new(layout, 3, Topology::Distributed)
        .unwrap()
        .run(&[0.5, 1.5, 2.5, 9.9, 10.0])
        .unwrap();

    let json_path = dir.path().join("hist.json");
    export_json(&json_path, &run).unwrap();
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(doc["topology"], "distributed");
    assert_eq!(doc["value_count"], 5);
    assert_eq!(doc["histogram"]["bins"][1]["count"], 2);
    assert_eq!(doc["histogram"]["bins"][0]["upper_bound"], 5.0);

    let csv_path = dir.path().join("hist.csv");
    export_csv(&csv_path, &run.histogram).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.ends_with("1,5,10,2\n"));
}
