//! # tepx-viz
//!
//! Visualization data artifacts for the TEPX endcap analysis.
//!
//! This crate only reshapes analysis outputs into plot-friendly JSON structures
//! (flat arrays instead of nested objects). Drawing lives in `tepx-viz-render`.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Pileup graphs (statistical error, whole-detector total, deviations).
pub mod graph;

/// Binned histogram artifacts (radial distributions, z–r density maps).
pub mod hist;

/// Axis titles per observable.
pub mod labels;

/// Linearity artifacts: data, extrapolated fit, confidence band, deviation.
pub mod linearity;

/// Multi-panel grids (summary canvases, per-ring radial grids).
pub mod grid;

/// Artifact bundles for a whole run or cluster-study scenario.
pub mod report;

use serde::{Deserialize, Serialize};

pub use graph::{GraphArtifact, SeriesArtifact};
pub use grid::{GridArtifact, Panel};
pub use hist::{Hist1dArtifact, Hist2dArtifact};
pub use linearity::{BandArtifact, FitSummary, LineArtifact, LinearityArtifact};
pub use report::{cluster_study_artifacts, run_artifacts};

/// Any artifact the renderer can draw, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotArtifact {
    /// Points with error bars.
    Graph(GraphArtifact),
    /// Points with a fitted line, band and deviation panel.
    Linearity(LinearityArtifact),
    /// 1-D histogram.
    Hist1d(Hist1dArtifact),
    /// 2-D density map.
    Hist2d(Hist2dArtifact),
    /// Grid of panels.
    Grid(GridArtifact),
}

impl PlotArtifact {
    /// Value of the `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            PlotArtifact::Graph(_) => "graph",
            PlotArtifact::Linearity(_) => "linearity",
            PlotArtifact::Hist1d(_) => "hist1d",
            PlotArtifact::Hist2d(_) => "hist2d",
            PlotArtifact::Grid(_) => "grid",
        }
    }

    /// Object name, used for output file names.
    pub fn name(&self) -> &str {
        match self {
            PlotArtifact::Graph(a) => &a.name,
            PlotArtifact::Linearity(a) => &a.name,
            PlotArtifact::Hist1d(a) => &a.name,
            PlotArtifact::Hist2d(a) => &a.name,
            PlotArtifact::Grid(a) => &a.name,
        }
    }
}

/// File-system friendly stem for an object name (`Hits Disk1Ring2` → `Hits_Disk1Ring2`).
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems() {
        assert_eq!(file_stem("Hits Disk1Ring2"), "Hits_Disk1Ring2");
        assert_eq!(file_stem("Deviation 2x Disk4Ring5"), "Deviation_2x_Disk4Ring5");
        assert_eq!(file_stem("ZvsR_PU100_D4"), "ZvsR_PU100_D4");
    }
}
