//! Parquet cluster tables.
//!
//! One row per reconstructed cluster. Columns are named `<prefix><field>` with the default
//! prefix `Clu`:
//!
//! | Column      | Arrow type            | Description            |
//! |-------------|-----------------------|------------------------|
//! | `CluX`      | `Float64` / `Float32` | x position (cm)        |
//! | `CluY`      | `Float64` / `Float32` | y position (cm)        |
//! | `CluZ`      | `Float64` / `Float32` | z position (cm)        |
//! | `CluPhi`    | `Float64` / `Float32` | azimuth                |
//! | `CluTheta`  | `Float64` / `Float32` | polar angle            |
//! | `CluMerge`  | `Float64` / `Float32` | merged-cluster flag    |
//!
//! The radius `r = sqrt(x² + y²)` is derived once at load time.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::datatypes::{DataType, Field, Float32Type, Float64Type, Schema};
use arrow::record_batch::RecordBatch;

use tepx_core::{Error, Result};

/// Field suffixes, in file order.
pub const FIELDS: [&str; 6] = ["X", "Y", "Z", "Phi", "Theta", "Merge"];

/// Immutable columnar cluster table for one pileup scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterTable {
    /// x (cm).
    pub x: Vec<f64>,
    /// y (cm).
    pub y: Vec<f64>,
    /// z (cm).
    pub z: Vec<f64>,
    /// Azimuth.
    pub phi: Vec<f64>,
    /// Polar angle.
    pub theta: Vec<f64>,
    /// Merge flag.
    pub merge: Vec<f64>,
    /// Derived radius (cm).
    pub r: Vec<f64>,
}

impl ClusterTable {
    /// Build from columns; all must have equal length. `r` is computed here.
    pub fn from_columns(
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
        phi: Vec<f64>,
        theta: Vec<f64>,
        merge: Vec<f64>,
    ) -> Result<Self> {
        let n = x.len();
        for (name, len) in [
            ("Y", y.len()),
            ("Z", z.len()),
            ("Phi", phi.len()),
            ("Theta", theta.len()),
            ("Merge", merge.len()),
        ] {
            if len != n {
                return Err(Error::Input(format!(
                    "cluster column {name} has {len} rows, expected {n}"
                )));
            }
        }
        let r = x.iter().zip(&y).map(|(a, b)| a.hypot(*b)).collect();
        Ok(Self { x, y, z, phi, theta, merge, r })
    }

    /// Position-only table (angles and merge flag zero).
    pub fn from_positions(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        let n = x.len();
        Self::from_columns(x, y, z, vec![0.0; n], vec![0.0; n], vec![0.0; n])
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// `true` when the table holds no clusters.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn columns(&self) -> [&Vec<f64>; 6] {
        [&self.x, &self.y, &self.z, &self.phi, &self.theta, &self.merge]
    }
}

/// Column names for a given prefix.
pub fn column_names(prefix: &str) -> [String; 6] {
    FIELDS.map(|f| format!("{prefix}{f}"))
}

fn column_f64(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| Error::Input(format!("cluster table is missing column '{name}'")))?;
    let arr = batch.column(idx);
    match arr.data_type() {
        DataType::Float64 => {
            let a = arr.as_primitive::<Float64Type>();
            Ok((0..a.len()).map(|i| if a.is_null(i) { f64::NAN } else { a.value(i) }).collect())
        }
        DataType::Float32 => {
            let a = arr.as_primitive::<Float32Type>();
            Ok((0..a.len())
                .map(|i| if a.is_null(i) { f64::NAN } else { a.value(i) as f64 })
                .collect())
        }
        other => Err(Error::Input(format!(
            "column '{name}' has type {other:?}, expected Float64 or Float32"
        ))),
    }
}

/// Read a cluster table from a Parquet file.
pub fn read_cluster_parquet(path: &Path, prefix: &str) -> Result<ClusterTable> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Input(format!("failed to open {}: {e}", path.display())))?;
    let builder = parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::Input(format!("failed to read Parquet {}: {e}", path.display())))?;
    let reader = builder
        .build()
        .map_err(|e| Error::Input(format!("failed to build Parquet reader: {e}")))?;

    let names = column_names(prefix);
    let mut cols: [Vec<f64>; 6] = Default::default();
    for batch in reader {
        let batch =
            batch.map_err(|e| Error::Input(format!("failed to read Parquet batch: {e}")))?;
        for (col, name) in cols.iter_mut().zip(&names) {
            col.extend(column_f64(&batch, name)?);
        }
    }

    let [x, y, z, phi, theta, merge] = cols;
    let table = ClusterTable::from_columns(x, y, z, phi, theta, merge)?;
    tracing::info!(file = %path.display(), clusters = table.len(), "loaded cluster table");
    Ok(table)
}

/// Build an Arrow batch with `Float64` columns named after `prefix`.
pub fn cluster_table_to_record_batch(table: &ClusterTable, prefix: &str) -> Result<RecordBatch> {
    let names = column_names(prefix);
    let fields: Vec<Field> =
        names.iter().map(|n| Field::new(n, DataType::Float64, false)).collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.to_vec())) as ArrayRef)
        .collect();
    RecordBatch::try_new(schema, arrays)
        .map_err(|e| Error::Validation(format!("failed to build RecordBatch: {e}")))
}

/// Write a cluster table to Parquet (Snappy).
pub fn write_cluster_parquet(table: &ClusterTable, path: &Path, prefix: &str) -> Result<()> {
    let batch = cluster_table_to_record_batch(table, prefix)?;
    let file = std::fs::File::create(path).map_err(|e| Error::output_write(path, e))?;
    let props = parquet::file::properties::WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();
    let mut writer = parquet::arrow::ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| Error::output_write(path, e))?;
    writer.write(&batch).map_err(|e| Error::output_write(path, e))?;
    writer.close().map_err(|e| Error::output_write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn radius_is_derived() {
        let t = ClusterTable::from_positions(vec![3.0, 0.0], vec![4.0, -2.0], vec![175.0, -201.0])
            .unwrap();
        assert_relative_eq!(t.r[0], 5.0);
        assert_relative_eq!(t.r[1], 2.0);
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = ClusterTable::from_positions(vec![1.0], vec![1.0, 2.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn column_naming() {
        assert_eq!(column_names("Clu")[3], "CluPhi");
        assert_eq!(column_names("Hit")[5], "HitMerge");
    }
}
