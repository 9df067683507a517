//! Shared plumbing of the `tepx` and `cluster_study` binaries.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tepx_core::AnalysisConfig;
use tepx_core::config::ReportConfig;
use tepx_viz::PlotArtifact;
use tepx_viz_render::config::{VizConfig, resolve_config};

/// Install the stderr subscriber used by both binaries.
pub fn init_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the analysis configuration, falling back to defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let cfg = AnalysisConfig::load_or_default(path).with_context(|| match path {
        Some(p) => format!("loading configuration {}", p.display()),
        None => "validating default configuration".to_string(),
    })?;
    Ok(cfg)
}

/// Renderer settings: the report theme, optionally overridden by a YAML style file.
///
/// The report section always decides image format and resolution.
pub fn viz_config(report: &ReportConfig, style: Option<&Path>) -> Result<VizConfig> {
    let mut cfg = match style {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading style {}", p.display()))?;
            resolve_config(Some(&text))?
        }
        None => VizConfig::for_report(&report.theme, &report.format, report.dpi),
    };
    cfg.output.format = report.format.clone();
    cfg.output.dpi = report.dpi;
    Ok(cfg)
}

/// Output directory: the command-line value, else the configured one. Created if missing.
pub fn prepare_out_dir(cli: Option<PathBuf>, cfg: &AnalysisConfig) -> Result<PathBuf> {
    let dir = cli.unwrap_or_else(|| cfg.out_dir.clone());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    Ok(dir)
}

/// Render every artifact into `dir`; a failing plot is logged and skipped.
pub fn render_all(artifacts: &[PlotArtifact], dir: &Path, viz: &VizConfig) -> Vec<PathBuf> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        match tepx_viz_render::render_into_dir(artifact, dir, viz) {
            Ok(path) => {
                tracing::debug!(kind = artifact.kind(), path = %path.display(), "image written");
                written.push(path);
            }
            Err(e) => tracing::warn!(name = artifact.name(), error = %e, "plot not rendered"),
        }
    }
    tracing::info!(images = written.len(), dir = %dir.display(), "rendering finished");
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_section_decides_output() {
        let report = ReportConfig { theme: "cms".into(), format: "svg".into(), dpi: 96 };
        let cfg = viz_config(&report, None).unwrap();
        assert_eq!(cfg.output.format, "svg");
        assert_eq!(cfg.output.dpi, 96);
        assert_eq!(cfg.experiment.name, "CMS");
    }
}
