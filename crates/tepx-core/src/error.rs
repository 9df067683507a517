//! Error types for the TEPX analysis

use thiserror::Error;

/// TEPX analysis error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Unreadable or malformed input file
    #[error("input error: {0}")]
    Input(String),

    /// File name does not carry the expected pileup token
    #[error("unrecognized filename '{name}': expected '{expected}'")]
    UnrecognizedFilename {
        /// Offending file name.
        name: String,
        /// Expected pattern, e.g. `summary_PU_<value>.json`.
        expected: String,
    },

    /// Overlapping, misordered or inverted geometry ranges
    #[error("geometry configuration error: {0}")]
    GeometryConfig(String),

    /// Histogram or group absent from a summary file
    #[error("missing observable '{name}' in group '{group}'")]
    MissingObservable {
        /// Group path inside the summary file.
        group: String,
        /// Histogram name.
        name: String,
    },

    /// Fit failure
    #[error("fit error: {0}")]
    Fit(#[from] FitError),

    /// Output could not be written
    #[error("failed to write {path}: {reason}")]
    OutputWrite {
        /// Target path.
        path: String,
        /// Underlying reason.
        reason: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Fit-specific failure modes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer points in the fit range than free parameters.
    #[error(
        "fit underdetermined: {points} point(s) in [{lo}, {hi}], at least {required} required"
    )]
    Underdetermined {
        /// Points inside the fit range.
        points: usize,
        /// Minimum number of points.
        required: usize,
        /// Lower edge of the fit range.
        lo: f64,
        /// Upper edge of the fit range.
        hi: f64,
    },

    /// Normal equations cannot be inverted (e.g. zero variance in x).
    #[error("singular fit: {0}")]
    Singular(String),

    /// Iterative minimiser stopped without convergence.
    #[error("minimizer did not converge: {0}")]
    NotConverged(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap any displayable error as an output failure for `path`.
    pub fn output_write(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Error::OutputWrite { path: path.display().to_string(), reason: reason.to_string() }
    }
}
