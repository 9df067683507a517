//! # tepx-analysis
//!
//! The numeric pipeline of the TEPX endcap analysis.
//!
//! - [`classify`]: disk / ring / sub-disk masks over cluster tables
//! - [`filler`], [`stats`]: histogram filling and binned descriptive statistics
//! - [`poisson`], [`optimizer`]: scaled-Poisson fit with box-constrained L-BFGS (argmin)
//! - [`aggregate`]: ±z combination, per-ring central values, statistical-error metric
//! - [`linear`]: restricted-range linear fit, extrapolation, confidence band, deviation
//! - [`context`]: per-run accumulation across pileup scenarios
//! - [`cluster_study`]: radial distributions and z–r density maps

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod classify;
pub mod cluster_study;
pub mod context;
pub mod filler;
pub mod graph;
pub mod linear;
pub mod optimizer;
pub mod poisson;
pub mod stats;

pub use cluster_study::{ClusterStudy, run_cluster_study};
pub use context::{BucketResult, RunContext, RunOutcome, SkippedInput};
pub use graph::{Graph, GraphPoint};
pub use linear::{
    BandPoint, ExtrapolatedLine, LinearFit, confidence_band, fit_linear, relative_deviation,
};
