use approx::assert_relative_eq;

use tepx_analysis::{
    BucketResult, Graph, RunOutcome, confidence_band, fit_linear, relative_deviation,
};
use tepx_core::Observable;
use tepx_viz::{GridArtifact, Panel, PlotArtifact, run_artifacts};

fn linear_bucket(disk: u32, ring: u32) -> BucketResult {
    let mut g = Graph::new(
        format!("Hits Disk{disk}Ring{ring}"),
        format!("Linearity Disk{disk}Ring{ring}"),
    );
    for (x, y) in [(0.0, 0.0), (1.0, 2.0), (2.0, 4.1), (50.0, 100.0), (100.0, 190.0)] {
        g.push(x, y, 0.5);
    }
    let fit = fit_linear(&g, 0.0, 2.0).unwrap();
    let line = fit.extrapolate(0.0, 200.0);
    let mut dev = relative_deviation(&g, &line);
    dev.name = format!("Deviation Hits Disk{disk}Ring{ring}");
    BucketResult {
        disk,
        ring,
        name: g.name.clone(),
        band: confidence_band(&fit, &g.xs(), 0.95),
        deviation: Some(dev),
        line: Some(line),
        fit: Some(fit),
        series: vec![g],
        fit_error: None,
    }
}

fn hits_outcome() -> RunOutcome {
    let buckets = (1..=4).flat_map(|d| (1..=5).map(move |r| linear_bucket(d, r))).collect();
    RunOutcome {
        observable: Observable::Hits,
        buckets,
        total: None,
        pileups: vec![0.0, 1.0, 2.0, 50.0, 100.0],
        skipped: Vec::new(),
    }
}

#[test]
fn linearity_bundle_contract() {
    let arts = run_artifacts(&hits_outcome(), 0.95);
    // 20 linearity plots, 20 deviation graphs, one summary grid.
    assert_eq!(arts.len(), 41);
    assert_eq!(arts.iter().filter(|a| a.kind() == "linearity").count(), 20);

    let PlotArtifact::Linearity(first) = &arts[0] else { panic!("expected linearity") };
    assert_eq!(first.name, "Hits Disk1Ring1");
    assert_eq!(first.y_label, "# of Hits");
    assert_eq!(first.line.as_ref().unwrap().x.len(), tepx_viz::linearity::LINE_SAMPLES);
    let band = first.band.as_ref().unwrap();
    assert_eq!(band.x.len(), 5);
    assert!(band.lo.iter().zip(&band.hi).all(|(lo, hi)| lo <= hi));
    assert_relative_eq!(first.fit.unwrap().range_hi, 2.0);

    let PlotArtifact::Graph(dev) = &arts[1] else { panic!("expected deviation graph") };
    assert_eq!(dev.name, "Deviation Hits Disk1Ring1");
    assert!(dev.zero_line);

    let PlotArtifact::Grid(grid) = arts.last().unwrap() else { panic!("expected grid") };
    assert_eq!(grid.name, "SummaryHits");
    assert_eq!((grid.rows, grid.cols), (4, 5));
    assert!(matches!(grid.panels[0], Panel::Linearity(_)));
}

#[test]
fn artifacts_serialize_with_kind_tag() {
    let arts = run_artifacts(&hits_outcome(), 0.95);
    let json = serde_json::to_value(&arts[0]).unwrap();
    assert_eq!(json["kind"], "linearity");
    let back: PlotArtifact = serde_json::from_value(json).unwrap();
    assert_eq!(back.name(), "Hits Disk1Ring1");
}

#[test]
fn stat_error_summary_uses_plain_graphs() {
    let mut g = Graph::new("Clusters Disk1Ring1", "Statistical Error [NB4] Disk1Ring1");
    g.push(0.0, 0.0, 0.0);
    g.push(100.0, 0.02, 0.0);
    let bucket = BucketResult {
        disk: 1,
        ring: 1,
        name: g.name.clone(),
        series: vec![g.clone()],
        fit: None,
        line: None,
        band: None,
        deviation: None,
        fit_error: None,
    };
    let outcome = RunOutcome {
        observable: Observable::Clusters,
        buckets: vec![bucket],
        total: Some(Graph::new("StatErrorTEPX", "Stat. Error TEPX [NB4]")),
        pileups: vec![0.0, 100.0],
        skipped: Vec::new(),
    };
    let grid = GridArtifact::summary(&outcome, 0.95);
    assert_eq!(grid.name, "SummaryStatError");
    assert!(matches!(grid.panels[0], Panel::Graph(_)));

    let arts = run_artifacts(&outcome, 0.95);
    assert_eq!(arts.len(), 3);
    assert_eq!(arts[2].name(), "StatErrorTEPX");
    let PlotArtifact::Graph(b) = &arts[0] else { panic!("expected graph") };
    assert_eq!(b.y_label, "Statistical Error [%]");
    assert!(!b.series[0].has_errors());
}
