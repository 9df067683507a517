//! # tepx-io
//!
//! Input and output for the TEPX endcap analysis:
//!
//! - [`summary`]: per-pileup JSON containers of 2-D histograms and file-name parsing
//! - [`clusters`]: Parquet cluster tables (via `arrow`/`parquet`)
//! - [`discover`]: sorted input listing
//! - [`results`]: the JSON results container written at the end of a run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clusters;
pub mod discover;
pub mod histogram;
pub mod results;
pub mod summary;

pub use clusters::{ClusterTable, read_cluster_parquet, write_cluster_parquet};
pub use discover::{cluster_file_path, find_summary_files};
pub use histogram::{Axis, Histogram1D, Histogram2D};
pub use results::ResultsFile;
pub use summary::{SummaryContent, SummaryFile, parse_pileup};
