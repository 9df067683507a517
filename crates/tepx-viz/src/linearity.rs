use serde::{Deserialize, Serialize};

use tepx_analysis::{BandPoint, BucketResult, ExtrapolatedLine, LinearFit};
use tepx_core::Observable;

use crate::graph::{SeriesArtifact, range};
use crate::labels::bucket_axes;

/// Number of samples drawn along the extrapolated line.
pub const LINE_SAMPLES: usize = 101;

/// Sampled straight line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineArtifact {
    /// Sample abscissae.
    pub x: Vec<f64>,
    /// Line values.
    pub y: Vec<f64>,
}

impl From<&ExtrapolatedLine> for LineArtifact {
    fn from(line: &ExtrapolatedLine) -> Self {
        let (x, y) = line.sample(LINE_SAMPLES).into_iter().unzip();
        Self { x, y }
    }
}

/// Confidence band evaluated at the data abscissae.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandArtifact {
    /// Confidence level.
    pub level: f64,
    /// Abscissae.
    pub x: Vec<f64>,
    /// Lower edge.
    pub lo: Vec<f64>,
    /// Upper edge.
    pub hi: Vec<f64>,
}

impl BandArtifact {
    /// Band from per-point half widths.
    pub fn new(level: f64, points: &[BandPoint]) -> Self {
        let mut x = Vec::with_capacity(points.len());
        let mut lo = Vec::with_capacity(points.len());
        let mut hi = Vec::with_capacity(points.len());
        for p in points {
            x.push(p.x);
            lo.push(p.y - p.half_width);
            hi.push(p.y + p.half_width);
        }
        Self { level, x, lo, hi }
    }
}

/// Fit parameters shown in the plot annotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitSummary {
    /// Slope.
    pub slope: f64,
    /// Slope uncertainty.
    pub slope_error: f64,
    /// Intercept.
    pub intercept: f64,
    /// Intercept uncertainty.
    pub intercept_error: f64,
    /// Chi-square at the minimum.
    pub chi2: f64,
    /// Degrees of freedom.
    pub ndf: usize,
    /// Fit range lower edge.
    pub range_lo: f64,
    /// Fit range upper edge.
    pub range_hi: f64,
}

impl From<&LinearFit> for FitSummary {
    fn from(f: &LinearFit) -> Self {
        Self {
            slope: f.slope,
            slope_error: f.slope_error(),
            intercept: f.intercept,
            intercept_error: f.intercept_error(),
            chi2: f.chi2,
            ndf: f.ndf,
            range_lo: f.range.0,
            range_hi: f.range.1,
        }
    }
}

/// Plot-friendly artifact for one linearity bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearityArtifact {
    /// Object name.
    pub name: String,
    /// Plot title.
    pub title: String,
    /// X axis title.
    pub x_label: String,
    /// Y axis title.
    pub y_label: String,
    /// Data series; the first one is the fitted series.
    pub series: Vec<SeriesArtifact>,
    /// Extrapolated fit line.
    pub line: Option<LineArtifact>,
    /// Confidence band around the fit.
    pub band: Option<BandArtifact>,
    /// Fit parameters.
    pub fit: Option<FitSummary>,
    /// Percent deviation of the fitted series from the line.
    pub deviation: Option<SeriesArtifact>,
    /// Why there is no fit.
    pub fit_error: Option<String>,
}

impl LinearityArtifact {
    /// Artifact for a fitted bucket; `level` is the band's confidence level.
    pub fn from_bucket(bucket: &BucketResult, observable: Observable, level: f64) -> Self {
        let axes = bucket_axes(observable);
        Self {
            name: bucket.name.clone(),
            title: bucket.series.first().map(|g| g.title.clone()).unwrap_or_default(),
            x_label: axes.x,
            y_label: axes.y,
            series: bucket.series.iter().map(SeriesArtifact::from).collect(),
            line: bucket.line.as_ref().map(LineArtifact::from),
            band: bucket.band.as_deref().map(|b| BandArtifact::new(level, b)),
            fit: bucket.fit.as_ref().map(FitSummary::from),
            deviation: bucket.deviation.as_ref().map(SeriesArtifact::from),
            fit_error: bucket.fit_error.clone(),
        }
    }

    /// X extent of data and line.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let data = self.series.iter().flat_map(|s| s.x.iter().copied());
        let line = self.line.iter().flat_map(|l| l.x.iter().copied());
        range(data.chain(line))
    }

    /// Y extent of data (with errors), line and band.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let data = self
            .series
            .iter()
            .flat_map(|s| s.y.iter().zip(&s.ey).flat_map(|(&y, &e)| [y - e, y + e]));
        let line = self.line.iter().flat_map(|l| l.y.iter().copied());
        let band = self.band.iter().flat_map(|b| b.lo.iter().chain(&b.hi).copied());
        range(data.chain(line).chain(band))
    }
}
