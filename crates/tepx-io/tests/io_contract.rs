use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use approx::assert_relative_eq;
use arrow::array::{ArrayRef, Float32Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use tepx_core::Error;
use tepx_core::config::SummaryConfig;
use tepx_io::{
    Axis, ClusterTable, Histogram2D, SummaryContent, SummaryFile, read_cluster_parquet,
    write_cluster_parquet,
};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    p.push(format!("tepx-io-it-{}-{}-{}", name, std::process::id(), nanos));
    std::fs::create_dir_all(&p).unwrap();
    p
}

#[test]
fn cluster_table_parquet_preserves_rows_and_radius() {
    let dir = tmp_dir("parquet");
    let path = dir.join("Cluster_100.parquet");
    let table = ClusterTable::from_columns(
        vec![7.0, 0.0, 12.0],
        vec![0.0, 15.0, 0.0],
        vec![175.0, -201.0, 300.0],
        vec![0.0, 1.57, 0.0],
        vec![0.04, 0.07, 0.04],
        vec![0.0, 1.0, 0.0],
    )
    .unwrap();
    write_cluster_parquet(&table, &path, "Clu").unwrap();

    let back = read_cluster_parquet(&path, "Clu").unwrap();
    assert_eq!(back.len(), 3);
    assert_eq!(back.z, table.z);
    assert_eq!(back.merge, table.merge);
    assert_relative_eq!(back.r[1], 15.0);

    let err = read_cluster_parquet(&path, "Hit").unwrap_err();
    assert!(err.to_string().contains("HitX"), "{err}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn float32_columns_are_widened() {
    let dir = tmp_dir("f32");
    let path = dir.join("Cluster_0.parquet");
    let names = tepx_io::clusters::column_names("Clu");
    let fields: Vec<Field> =
        names.iter().map(|n| Field::new(n, DataType::Float32, false)).collect();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for _ in 0..6 {
        arrays.push(Arc::new(Float32Array::from(vec![3.0f32, 4.0])));
    }
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut w = parquet::arrow::ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    w.write(&batch).unwrap();
    w.close().unwrap();

    let t = read_cluster_parquet(&path, "Clu").unwrap();
    assert_relative_eq!(t.r[0], 3.0f64.hypot(3.0), epsilon = 1e-6);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn wrong_column_type_is_input_error() {
    let dir = tmp_dir("badtype");
    let path = dir.join("Cluster_1.parquet");
    let names = tepx_io::clusters::column_names("Clu");
    let mut fields: Vec<Field> =
        names.iter().map(|n| Field::new(n, DataType::Float64, false)).collect();
    fields[0] = Field::new(&names[0], DataType::Utf8, false);
    let mut arrays: Vec<ArrayRef> =
        vec![Arc::new(arrow::array::StringArray::from(vec!["a"])) as ArrayRef];
    for _ in 1..6 {
        arrays.push(Arc::new(Float64Array::from(vec![1.0])));
    }
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut w = parquet::arrow::ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    w.write(&batch).unwrap();
    w.close().unwrap();

    assert!(matches!(read_cluster_parquet(&path, "Clu"), Err(Error::Input(_))));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn summary_file_lookup_and_missing_observable() {
    let dir = tmp_dir("summary");
    let path = dir.join("summary_PU_50.json");
    let mut h =
        Histogram2D::new("", Axis::new(5, 0.0, 5.0).unwrap(), Axis::new(4, 0.0, 4.0).unwrap());
    h.fill(0.5, 2.5);
    let mut content = SummaryContent::default();
    content.insert("BRIL_IT_Analysis/TEPX/Hits", "Number of hits for Disk 1", h);
    content.write_json(&path).unwrap();

    let f = SummaryFile::open(&path, &SummaryConfig::default()).unwrap();
    assert_eq!(f.pileup, 50.0);
    let got = f.histogram("BRIL_IT_Analysis/TEPX/Hits", "Number of hits for Disk 1").unwrap();
    assert_eq!(got.get(0, 2), 1.0);

    match f.histogram("BRIL_IT_Analysis/TEPX/Hits", "Number of hits for Disk -1") {
        Err(Error::MissingObservable { group, name }) => {
            assert_eq!(group, "BRIL_IT_Analysis/TEPX/Hits");
            assert_eq!(name, "Number of hits for Disk -1");
        }
        other => panic!("unexpected {other:?}"),
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_summary_is_input_error() {
    let dir = tmp_dir("malformed");
    let path = dir.join("summary_PU_10.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(SummaryFile::open(&path, &SummaryConfig::default()), Err(Error::Input(_))));

    let bad_name = dir.join("summary_PU_x.json");
    std::fs::write(&bad_name, "{}").unwrap();
    assert!(matches!(
        SummaryFile::open(&bad_name, &SummaryConfig::default()),
        Err(Error::UnrecognizedFilename { .. })
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
