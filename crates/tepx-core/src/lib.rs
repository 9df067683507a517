//! # tepx-core
//!
//! Shared types for the TEPX endcap analysis: the error enum, geometry range tables,
//! the observable selector and the run configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod observable;

pub use config::{AnalysisConfig, CentralValue};
pub use error::{Error, FitError, Result};
pub use geometry::{Geometry, RangeEntry, RangeTable, SubDiskRanges};
pub use observable::Observable;

/// Crate version, reported by the command-line tools.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
