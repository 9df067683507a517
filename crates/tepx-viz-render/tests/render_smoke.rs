use std::time::{SystemTime, UNIX_EPOCH};

use tepx_viz::{
    BandArtifact, FitSummary, GraphArtifact, GridArtifact, Hist1dArtifact, LineArtifact,
    LinearityArtifact, Panel, PlotArtifact, SeriesArtifact,
};
use tepx_viz_render::config::VizConfig;
use tepx_viz_render::{RenderError, render_json_svg, render_svg, render_to_bytes, render_to_file};

fn series(label: &str, pts: &[(f64, f64, f64)]) -> SeriesArtifact {
    SeriesArtifact {
        label: label.into(),
        x: pts.iter().map(|p| p.0).collect(),
        y: pts.iter().map(|p| p.1).collect(),
        ey: pts.iter().map(|p| p.2).collect(),
    }
}

fn linearity() -> LinearityArtifact {
    LinearityArtifact {
        name: "Hits Disk1Ring1".into(),
        title: "Linearity Disk1Ring1".into(),
        x_label: "Pileup".into(),
        y_label: "# of Hits".into(),
        series: vec![series(
            "Hits Disk1Ring1",
            &[(0.0, 0.0, 0.1), (1.0, 2.0, 0.3), (2.0, 4.0, 0.4), (100.0, 190.0, 9.0)],
        )],
        line: Some(LineArtifact { x: vec![0.0, 200.0], y: vec![0.0, 400.0] }),
        band: Some(BandArtifact {
            level: 0.95,
            x: vec![0.0, 1.0, 2.0, 100.0],
            lo: vec![-0.1, 1.9, 3.9, 195.0],
            hi: vec![0.1, 2.1, 4.1, 205.0],
        }),
        fit: Some(FitSummary {
            slope: 2.0,
            slope_error: 0.01,
            intercept: 0.0,
            intercept_error: 0.05,
            chi2: 0.2,
            ndf: 1,
            range_lo: 0.0,
            range_hi: 2.0,
        }),
        deviation: Some(series(
            "Deviation Hits Disk1Ring1",
            &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (100.0, -5.0, 0.0)],
        )),
        fit_error: None,
    }
}

fn stat_graph() -> GraphArtifact {
    GraphArtifact {
        name: "Clusters Disk1Ring1".into(),
        title: "Statistical Error [NB4] Disk1Ring1".into(),
        x_label: "Pileup".into(),
        y_label: "Statistical Error [%]".into(),
        series: vec![series(
            "Clusters Disk1Ring1",
            &[(0.0, 0.0, 0.0), (50.0, 0.04, 0.0), (100.0, 0.03, 0.0)],
        )],
        zero_line: false,
    }
}

#[test]
fn linearity_svg_has_band_line_and_deviation_panel() {
    let svg = render_svg(&PlotArtifact::Linearity(linearity()), &VizConfig::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<path d=\"M"));
    assert!(svg.contains("<polyline"));
    assert!(svg.contains("Linearity Disk1Ring1"));
    assert!(svg.contains("Diff [%]"));
    assert!(svg.contains("slope = 2.0000"));
}

#[test]
fn summary_grid_renders_every_panel() {
    let panels = (0..20).map(|_| Panel::Graph(stat_graph())).collect();
    let grid = GridArtifact::with_cols("SummaryStatError", "SummaryStatError", 5, panels);
    assert_eq!((grid.rows, grid.cols), (4, 5));
    let svg = render_svg(&PlotArtifact::Grid(grid), &VizConfig::default()).unwrap();
    assert_eq!(svg.matches("Statistical Error [NB4] Disk1Ring1").count(), 20);
}

#[test]
fn overfull_grid_is_rejected() {
    let mut grid = GridArtifact::with_cols("g", "g", 2, vec![Panel::Graph(stat_graph()); 4]);
    grid.rows = 1;
    let result = render_svg(&PlotArtifact::Grid(grid), &VizConfig::default());
    assert!(matches!(result, Err(RenderError::Layout(_))));
}

#[test]
fn empty_histogram_renders_placeholder() {
    let h = Hist1dArtifact {
        name: "Disk 1".into(),
        title: "Disk 1".into(),
        x_label: "r [cm]".into(),
        y_label: "Clusters".into(),
        edges: vec![],
        contents: vec![],
        entries: 0.0,
    };
    let svg = render_svg(&PlotArtifact::Hist1d(h), &VizConfig::default()).unwrap();
    assert!(svg.contains("No histogram data"));
}

#[test]
fn json_dispatch_by_kind() {
    let json = serde_json::to_string(&stat_graph()).unwrap();
    let svg = render_json_svg(&json, "graph", &VizConfig::default()).unwrap();
    assert!(svg.contains("Pileup"));
    let cfg = VizConfig::default();
    assert!(matches!(render_json_svg(&json, "pie", &cfg), Err(RenderError::UnknownKind(_))));
    assert!(matches!(render_json_svg("{", "graph", &cfg), Err(RenderError::Deserialize(_))));
}

#[test]
fn unknown_format_is_rejected() {
    let art = PlotArtifact::Graph(stat_graph());
    let result = render_to_bytes(&art, "pdf", &VizConfig::default());
    assert!(matches!(result, Err(RenderError::UnknownFormat(_))));
}

#[test]
fn png_file_is_written() {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let dir = std::env::temp_dir().join(format!("tepx-render-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("StatErrorTEPX.png");
    let cfg = VizConfig::for_report("tepx", "png", 72);
    render_to_file(&PlotArtifact::Graph(stat_graph()), &path, &cfg).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
    let _ = std::fs::remove_dir_all(&dir);
}
