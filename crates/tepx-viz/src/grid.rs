use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tepx_analysis::{ClusterStudy, RunOutcome};
use tepx_core::Observable;

use crate::graph::GraphArtifact;
use crate::hist::Hist1dArtifact;
use crate::linearity::LinearityArtifact;

/// One cell of a grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// Points with error bars.
    Graph(GraphArtifact),
    /// Points with fit line and band.
    Linearity(LinearityArtifact),
    /// 1-D histogram.
    Hist1d(Hist1dArtifact),
}

/// Panels laid out row-major on a `rows × cols` grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridArtifact {
    /// Object name.
    pub name: String,
    /// Figure title.
    pub title: String,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row-major panels; may be shorter than `rows * cols`.
    pub panels: Vec<Panel>,
}

impl GridArtifact {
    /// Grid with `cols` columns and as many rows as needed.
    pub fn with_cols(
        name: impl Into<String>,
        title: impl Into<String>,
        cols: usize,
        panels: Vec<Panel>,
    ) -> Self {
        let cols = cols.max(1);
        let rows = panels.len().div_ceil(cols).max(1);
        Self { name: name.into(), title: title.into(), rows, cols, panels }
    }

    /// Summary canvas of a run: one row per disk, one column per ring.
    pub fn summary(outcome: &RunOutcome, level: f64) -> Self {
        let rings: BTreeSet<u32> = outcome.buckets.iter().map(|b| b.ring).collect();
        let panels = outcome
            .buckets
            .iter()
            .map(|b| match outcome.observable {
                Observable::Clusters => {
                    Panel::Graph(GraphArtifact::from_bucket(b, outcome.observable))
                }
                obs => Panel::Linearity(LinearityArtifact::from_bucket(b, obs, level)),
            })
            .collect();
        let name = outcome.observable.summary_name();
        Self::with_cols(name, name, rings.len(), panels)
    }

    /// Per-(disk, ring) radial distributions of a cluster study.
    pub fn radial_per_ring(study: &ClusterStudy) -> Self {
        let rings: BTreeSet<u32> = study.per_ring.iter().map(|d| d.ring).collect();
        let panels = study
            .per_ring
            .iter()
            .map(|d| Panel::Hist1d(Hist1dArtifact::radial(&d.histogram)))
            .collect();
        Self::with_cols(
            format!("radialDist-perRing_PU{}", study.pileup),
            format!("Radial distribution per ring, PU {}", study.pileup),
            rings.len(),
            panels,
        )
    }

    /// Per-disk radial distributions of a cluster study, two per row.
    pub fn radial_per_disk(study: &ClusterStudy) -> Self {
        let panels = study
            .per_disk
            .iter()
            .map(|d| Panel::Hist1d(Hist1dArtifact::radial(&d.histogram)))
            .collect();
        Self::with_cols(
            format!("radialDist-perDisk_PU{}", study.pileup),
            format!("Radial distribution per disk, PU {}", study.pileup),
            2,
            panels,
        )
    }
}
