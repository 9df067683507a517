use serde::{Deserialize, Serialize};

use tepx_io::{Histogram1D, Histogram2D};

use crate::labels::{AxisTitles, radial_axes, zr_axes};

/// Plot-friendly 1-D histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hist1dArtifact {
    /// Object name.
    pub name: String,
    /// Plot title.
    pub title: String,
    /// X axis title.
    pub x_label: String,
    /// Y axis title.
    pub y_label: String,
    /// Bin edges, `contents.len() + 1` values.
    pub edges: Vec<f64>,
    /// Bin contents.
    pub contents: Vec<f64>,
    /// Number of fills.
    pub entries: f64,
}

impl Hist1dArtifact {
    /// Artifact with explicit axis titles.
    pub fn with_axes(h: &Histogram1D, title: impl Into<String>, axes: AxisTitles) -> Self {
        Self {
            name: h.name.clone(),
            title: title.into(),
            x_label: axes.x,
            y_label: axes.y,
            edges: h.axis.edges(),
            contents: h.contents.clone(),
            entries: h.entries,
        }
    }

    /// Radial distribution of clusters.
    pub fn radial(h: &Histogram1D) -> Self {
        Self::with_axes(h, h.name.clone(), radial_axes())
    }

    /// Largest bin content (0 when empty).
    pub fn max_content(&self) -> f64 {
        self.contents.iter().copied().fold(0.0, f64::max)
    }
}

/// Plot-friendly 2-D density map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hist2dArtifact {
    /// Object name.
    pub name: String,
    /// Plot title.
    pub title: String,
    /// X axis title.
    pub x_label: String,
    /// Y axis title.
    pub y_label: String,
    /// X bin edges.
    pub x_edges: Vec<f64>,
    /// Y bin edges.
    pub y_edges: Vec<f64>,
    /// Contents indexed `[iy][ix]`.
    pub contents: Vec<Vec<f64>>,
    /// Largest bin content, the top of the colour scale.
    pub z_max: f64,
}

impl Hist2dArtifact {
    /// Artifact with explicit axis titles and an object name override.
    pub fn with_axes(h: &Histogram2D, name: impl Into<String>, axes: AxisTitles) -> Self {
        Self {
            name: name.into(),
            title: if h.title.is_empty() { h.name.clone() } else { h.title.clone() },
            x_label: axes.x,
            y_label: axes.y,
            x_edges: h.x.edges(),
            y_edges: h.y.edges(),
            contents: h.contents.clone(),
            z_max: h.max_content(),
        }
    }

    /// z–r density map of clusters.
    pub fn zr(h: &Histogram2D, name: impl Into<String>) -> Self {
        Self::with_axes(h, name, zr_axes())
    }
}
