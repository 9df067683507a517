use tepx_analysis::{ClusterStudy, RunOutcome};
use tepx_core::Observable;

use crate::graph::GraphArtifact;
use crate::grid::GridArtifact;
use crate::hist::Hist2dArtifact;
use crate::linearity::LinearityArtifact;
use crate::PlotArtifact;

/// Every plot of a linearity or statistical-error run.
///
/// Per bucket: the bucket graph (statistical error) or the linearity plot plus its deviation
/// graph. Then the summary grid and, for statistical-error runs, the whole-detector total.
pub fn run_artifacts(outcome: &RunOutcome, level: f64) -> Vec<PlotArtifact> {
    let mut out = Vec::with_capacity(2 * outcome.buckets.len() + 2);
    for b in &outcome.buckets {
        match outcome.observable {
            Observable::Clusters => {
                out.push(PlotArtifact::Graph(GraphArtifact::from_bucket(b, outcome.observable)));
            }
            obs => {
                out.push(PlotArtifact::Linearity(LinearityArtifact::from_bucket(b, obs, level)));
                if let Some(dev) = &b.deviation {
                    out.push(PlotArtifact::Graph(GraphArtifact::deviation(dev)));
                }
            }
        }
    }
    out.push(PlotArtifact::Grid(GridArtifact::summary(outcome, level)));
    if let Some(total) = &outcome.total {
        out.push(PlotArtifact::Graph(GraphArtifact::total(total)));
    }
    out
}

/// Every plot of one cluster-study scenario.
pub fn cluster_study_artifacts(study: &ClusterStudy) -> Vec<PlotArtifact> {
    let pu = &study.pileup;
    vec![
        PlotArtifact::Grid(GridArtifact::radial_per_ring(study)),
        PlotArtifact::Grid(GridArtifact::radial_per_disk(study)),
        PlotArtifact::Hist2d(Hist2dArtifact::zr(&study.zr_all, format!("ZvsR_PU{pu}"))),
        PlotArtifact::Hist2d(Hist2dArtifact::zr(&study.zr_positive, format!("ZvsR_PU{pu}_Pos"))),
        PlotArtifact::Hist2d(Hist2dArtifact::zr(
            &study.zr_disk,
            format!("ZvsR_PU{pu}_D{}", study.disk_view),
        )),
    ]
}
