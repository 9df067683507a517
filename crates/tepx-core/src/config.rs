//! Run configuration (YAML or JSON).
//!
//! Every field has a default matching the TEPX simulation campaign, so an empty file (or no
//! file at all) reproduces the reference analysis.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory scanned for summary files when no path is given on the command line.
    pub input_dir: PathBuf,
    /// Directory receiving images and results files.
    pub out_dir: PathBuf,
    /// Endcap geometry tables.
    pub geometry: Geometry,
    /// Summary-file naming and layout.
    pub summary: SummaryConfig,
    /// Linear fit and extrapolation settings.
    pub linearity: LinearityConfig,
    /// Constants for the statistical-error metric.
    pub stat_error: StatErrorConfig,
    /// Poisson-model fit settings.
    pub poisson: PoissonFitConfig,
    /// Cluster-level geometry study.
    pub clusters: ClusterStudyConfig,
    /// Plot output.
    pub report: ReportConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("summaries"),
            out_dir: PathBuf::from("."),
            geometry: Geometry::default(),
            summary: SummaryConfig::default(),
            linearity: LinearityConfig::default(),
            stat_error: StatErrorConfig::default(),
            poisson: PoissonFitConfig::default(),
            clusters: ClusterStudyConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read a configuration file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
        let cfg: AnalysisConfig = if ext == "json" {
            serde_json::from_slice(&bytes)?
        } else {
            serde_yaml_ng::from_slice(&bytes)?
        };
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let cfg = Self::default();
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Validate geometry and numeric settings.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        let basis = self.linearity.fit_basis;
        if basis.is_nan() || basis <= 0.0 {
            return Err(Error::Validation(format!("linearity.fit_basis must be > 0, got {basis}")));
        }
        let cl = self.linearity.confidence_level;
        if cl.is_nan() || cl <= 0.0 || cl >= 1.0 {
            return Err(Error::Validation(format!(
                "linearity.confidence_level must be in (0, 1), got {cl}"
            )));
        }
        if self.stat_error.coincidence_factor <= 0.0 || self.stat_error.rate_divisor <= 0.0 {
            return Err(Error::Validation(
                "stat_error.coincidence_factor and stat_error.rate_divisor must be > 0".into(),
            ));
        }
        let [lo, hi] = self.poisson.range;
        if lo >= hi {
            return Err(Error::Validation(format!(
                "poisson.range must be increasing, got [{lo}, {hi}]"
            )));
        }
        let c = &self.clusters;
        if c.radial_bins == 0 || c.density_bins == 0 || c.disk_view_bins == 0 {
            return Err(Error::Validation("cluster histogram bin counts must be > 0".into()));
        }
        let ranges = [
            ("r_range", c.r_range),
            ("z_range", c.z_range),
            ("z_range_positive", c.z_range_positive),
        ];
        for (name, [lo, hi]) in ranges {
            if lo.is_nan() || hi.is_nan() || lo >= hi {
                return Err(Error::Validation(format!(
                    "clusters.{name} must be increasing, got [{lo}, {hi}]"
                )));
            }
        }
        if self.geometry.disks.get(self.clusters.disk_view).is_none() {
            return Err(Error::Validation(format!(
                "clusters.disk_view = {} is not a configured disk",
                self.clusters.disk_view
            )));
        }
        Ok(())
    }
}

/// Summary-file naming and internal layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// File-name prefix preceding the pileup value.
    pub prefix: String,
    /// File extension (without dot).
    pub extension: String,
    /// Top-level group inside each file.
    pub base_group: String,
    /// Sub-detector group below `base_group`.
    pub subdetector: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            prefix: "summary_PU_".into(),
            extension: "json".into(),
            base_group: "BRIL_IT_Analysis".into(),
            subdetector: "TEPX".into(),
        }
    }
}

impl SummaryConfig {
    /// Human-readable pattern, e.g. `summary_PU_<value>.json`.
    pub fn pattern(&self) -> String {
        format!("{}<value>.{}", self.prefix, self.extension)
    }
}

/// How the per-ring central value is obtained from its distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralValue {
    /// Histogram mean.
    #[default]
    Mean,
    /// 0.5-quantile.
    Median,
    /// Mean parameter of a Poisson-model fit (empirical mean at low counts).
    PoissonFit,
}

/// Linear fit / extrapolation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearityConfig {
    /// Fit range is `[0, fit_basis]` in pileup.
    pub fit_basis: f64,
    /// Extrapolated line is evaluated over `[0, extrapolate_to]`.
    pub extrapolate_to: f64,
    /// Confidence level of the error band.
    pub confidence_level: f64,
    /// Central-value policy.
    pub central_value: CentralValue,
}

impl Default for LinearityConfig {
    fn default() -> Self {
        Self {
            fit_basis: 2.0,
            extrapolate_to: 200.0,
            confidence_level: 0.95,
            central_value: CentralValue::Mean,
        }
    }
}

/// Constants of the statistical-error metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatErrorConfig {
    /// Orbits integrated per measurement (NB4 = 4 x 4096).
    pub coincidence_factor: f64,
    /// Trigger rate in kHz.
    pub trigger_rate_khz: f64,
    /// Bunch-crossing rate divisor.
    pub rate_divisor: f64,
}

impl Default for StatErrorConfig {
    fn default() -> Self {
        Self { coincidence_factor: 16384.0, trigger_rate_khz: 0.075, rate_divisor: 40.0 }
    }
}

/// Poisson-model fit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonFitConfig {
    /// At or below this mean the fit is skipped.
    pub min_mean: f64,
    /// Fit range in the counted observable.
    pub range: [f64; 2],
    /// Iteration cap for the minimiser.
    pub max_iter: u64,
}

impl Default for PoissonFitConfig {
    fn default() -> Self {
        Self { min_mean: 0.51, range: [1.0, 2500.0], max_iter: 500 }
    }
}

/// Cluster-level geometry study settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStudyConfig {
    /// Simulated object kind; files are named `<kind>_<pileup>.parquet`.
    pub object_kind: String,
    /// Column-name prefix (`Clu` gives `CluX`, `CluY`, ...).
    pub column_prefix: String,
    /// Pileup scenarios processed when none are given on the command line.
    pub pileups: Vec<String>,
    /// Bins of the radial histograms.
    pub radial_bins: usize,
    /// Bins per axis of the z-r density maps.
    pub density_bins: usize,
    /// Disk shown in the single-disk density map.
    pub disk_view: u32,
    /// Bins per axis of the single-disk density map.
    pub disk_view_bins: usize,
    /// Radial range of density maps (cm).
    pub r_range: [f64; 2],
    /// z range of the full density map (cm).
    pub z_range: [f64; 2],
    /// z range of the +z density map (cm).
    pub z_range_positive: [f64; 2],
    /// Also classify clusters into sub-disk ranges.
    pub inner_disks: bool,
}

impl Default for ClusterStudyConfig {
    fn default() -> Self {
        Self {
            object_kind: "Cluster".into(),
            column_prefix: "Clu".into(),
            pileups: vec!["100".into()],
            radial_bins: 40,
            density_bins: 300,
            disk_view: 4,
            disk_view_bins: 100,
            r_range: [0.0, 30.0],
            z_range: [-300.0, 300.0],
            z_range_positive: [160.0, 275.0],
            inner_disks: false,
        }
    }
}

/// Plot output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Theme name (`tepx`, `cms`, `minimal`).
    pub theme: String,
    /// Image format (`png` or `svg`).
    pub format: String,
    /// Raster resolution.
    pub dpi: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { theme: "tepx".into(), format: "png".into(), dpi: 150 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "linearity:\n  fit_basis: 60\nstat_error:\n  trigger_rate_khz: 0.1\n";
        let cfg: AnalysisConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(cfg.linearity.fit_basis, 60.0);
        assert_eq!(cfg.linearity.extrapolate_to, 200.0);
        assert_eq!(cfg.stat_error.trigger_rate_khz, 0.1);
        assert_eq!(cfg.stat_error.coincidence_factor, 16384.0);
        assert_eq!(cfg.geometry.n_rings(), 5);
    }

    #[test]
    fn yaml_geometry_override() {
        let yaml = "geometry:\n  rings:\n    \
                    - {index: 1, low: 5.0, high: 8.0}\n    \
                    - {index: 2, low: 7.5, high: 9.0}\n";
        let cfg: AnalysisConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(matches!(cfg.validate(), Err(Error::GeometryConfig(_))));
    }

    #[test]
    fn central_value_snake_case() {
        let cfg: LinearityConfig =
            serde_json::from_str(r#"{"central_value":"poisson_fit"}"#).unwrap();
        assert_eq!(cfg.central_value, CentralValue::PoissonFit);
    }

    #[test]
    fn rejects_bad_cluster_study_settings() {
        let mut cfg = AnalysisConfig::default();
        cfg.clusters.disk_view_bins = 0;
        assert!(matches!(cfg.validate(), Err(Error::Validation(_))));

        let yaml = "clusters:\n  z_range_positive: [300.0, 0.0]\n";
        let cfg: AnalysisConfig = serde_yaml_ng::from_str(yaml).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("z_range_positive"), "{err}");

        let mut cfg = AnalysisConfig::default();
        cfg.clusters.r_range = [f64::NAN, 30.0];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_basis() {
        let mut cfg = AnalysisConfig::default();
        cfg.linearity.fit_basis = 0.0;
        assert!(cfg.validate().is_err());
    }
}
