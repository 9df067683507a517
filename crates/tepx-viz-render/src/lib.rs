//! # tepx-viz-render
//!
//! Renders `tepx-viz` artifacts to SVG, and to PNG through resvg.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::{Path, PathBuf};

use config::VizConfig;
use tepx_viz::PlotArtifact;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render an artifact to an SVG string.
pub fn render_svg(artifact: &PlotArtifact, config: &VizConfig) -> Result<String> {
    match artifact {
        PlotArtifact::Graph(a) => plots::graph::render(a, config),
        PlotArtifact::Linearity(a) => plots::linearity::render(a, config),
        PlotArtifact::Hist1d(a) => plots::hist1d::render(a, config),
        PlotArtifact::Hist2d(a) => plots::hist2d::render(a, config),
        PlotArtifact::Grid(a) => plots::grid::render(a, config),
    }
}

/// Render artifact JSON of the given kind to an SVG string.
pub fn render_json_svg(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    let artifact = match kind {
        "graph" => PlotArtifact::Graph(serde_json::from_str(artifact_json)?),
        "linearity" => PlotArtifact::Linearity(serde_json::from_str(artifact_json)?),
        "hist1d" => PlotArtifact::Hist1d(serde_json::from_str(artifact_json)?),
        "hist2d" => PlotArtifact::Hist2d(serde_json::from_str(artifact_json)?),
        "grid" => PlotArtifact::Grid(serde_json::from_str(artifact_json)?),
        other => return Err(RenderError::UnknownKind(other.to_string())),
    };
    render_svg(&artifact, config)
}

/// Render an artifact to bytes in the specified format (`svg` or `png`).
pub fn render_to_bytes(
    artifact: &PlotArtifact,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    let svg = render_svg(artifact, config)?;
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render an artifact to a file; the format is inferred from the extension.
pub fn render_to_file(artifact: &PlotArtifact, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = render_to_bytes(artifact, ext, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Render an artifact into `dir`, named after the artifact, in the configured format.
pub fn render_into_dir(artifact: &PlotArtifact, dir: &Path, config: &VizConfig) -> Result<PathBuf> {
    let stem = tepx_viz::file_stem(artifact.name());
    let path = dir.join(format!("{stem}.{}", config.output.format));
    render_to_file(artifact, &path, config)?;
    tracing::debug!(path = %path.display(), kind = artifact.kind(), "plot written");
    Ok(path)
}
