use serde::{Deserialize, Serialize};

use tepx_analysis::{BucketResult, Graph};
use tepx_core::Observable;

use crate::labels::{bucket_axes, deviation_axes};

/// One set of points, aligned arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesArtifact {
    /// Legend label.
    pub label: String,
    /// Abscissae.
    pub x: Vec<f64>,
    /// Ordinates.
    pub y: Vec<f64>,
    /// Symmetric y errors; all zero when the series has none.
    pub ey: Vec<f64>,
}

impl SeriesArtifact {
    /// `true` if any point carries a non-zero error.
    pub fn has_errors(&self) -> bool {
        self.ey.iter().any(|e| *e > 0.0)
    }
}

impl From<&Graph> for SeriesArtifact {
    fn from(g: &Graph) -> Self {
        let mut x = Vec::with_capacity(g.len());
        let mut y = Vec::with_capacity(g.len());
        let mut ey = Vec::with_capacity(g.len());
        for p in &g.points {
            x.push(p.x);
            y.push(p.y);
            ey.push(p.ey);
        }
        Self { label: g.name.clone(), x, y, ey }
    }
}

/// Plot-friendly artifact for one or more pileup graphs on shared axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphArtifact {
    /// Object name.
    pub name: String,
    /// Plot title.
    pub title: String,
    /// X axis title.
    pub x_label: String,
    /// Y axis title.
    pub y_label: String,
    /// Drawn in order; the first series is the primary one.
    pub series: Vec<SeriesArtifact>,
    /// Draw a horizontal reference line at y = 0.
    #[serde(default)]
    pub zero_line: bool,
}

impl GraphArtifact {
    /// Bucket graph(s) without fit decorations.
    pub fn from_bucket(bucket: &BucketResult, observable: Observable) -> Self {
        let axes = bucket_axes(observable);
        let title = bucket.series.first().map(|g| g.title.clone()).unwrap_or_default();
        Self {
            name: bucket.name.clone(),
            title,
            x_label: axes.x,
            y_label: axes.y,
            series: bucket.series.iter().map(SeriesArtifact::from).collect(),
            zero_line: false,
        }
    }

    /// Whole-detector statistical-error graph.
    pub fn total(graph: &Graph) -> Self {
        let axes = bucket_axes(Observable::Clusters);
        Self {
            name: graph.name.clone(),
            title: graph.title.clone(),
            x_label: axes.x,
            y_label: axes.y,
            series: vec![SeriesArtifact::from(graph)],
            zero_line: false,
        }
    }

    /// Deviation-from-linearity graph.
    pub fn deviation(graph: &Graph) -> Self {
        let axes = deviation_axes();
        Self {
            name: graph.name.clone(),
            title: "Deviation from Linearity".into(),
            x_label: axes.x,
            y_label: axes.y,
            series: vec![SeriesArtifact::from(graph)],
            zero_line: true,
        }
    }

    /// Union of x values over all series, or `None` when there are no points.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        range(self.series.iter().flat_map(|s| s.x.iter().copied()))
    }

    /// Union of `y ± ey` over all series, or `None` when there are no points.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        range(self.series.iter().flat_map(|s| {
            s.y.iter().zip(&s.ey).flat_map(|(&y, &e)| [y - e, y + e])
        }))
    }
}

pub(crate) fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
