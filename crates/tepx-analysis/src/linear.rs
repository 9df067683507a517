//! Restricted-range linear fits, extrapolation, confidence bands and deviation from
//! linearity.
//!
//! The fit minimises `Σ w_i (y_i - a·x_i - b)²` over points with `x ∈ [lo, hi]`. When at
//! least two points in range with distinct x carry `ey > 0`, only those points enter the fit
//! with weights `1/ey²`; zero-error points are left out. Otherwise every point in range enters
//! with weight 1. The
//! parameter covariance is the inverse of the normal matrix, and confidence intervals follow
//! the usual convention
//! `t(1 - α/2, ndf) · sqrt(χ²/ndf) · sqrt(gᵀ C g)` with `g = (x, 1)`.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use tepx_core::{FitError, Result};

use crate::graph::Graph;

/// Straight-line fit result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Slope `a`.
    pub slope: f64,
    /// Intercept `b`.
    pub intercept: f64,
    /// Covariance of `(a, b)`.
    pub covariance: [[f64; 2]; 2],
    /// Weighted sum of squared residuals.
    pub chi2: f64,
    /// Points entering the fit minus 2.
    pub ndf: usize,
    /// Closed fit range.
    pub range: (f64, f64),
    /// `true` when `1/ey²` weights were used.
    pub weighted: bool,
}

impl LinearFit {
    /// `a·x + b`.
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Uncertainty of `a`.
    pub fn slope_error(&self) -> f64 {
        self.covariance[0][0].max(0.0).sqrt()
    }

    /// Uncertainty of `b`.
    pub fn intercept_error(&self) -> f64 {
        self.covariance[1][1].max(0.0).sqrt()
    }

    /// The fitted line over `[x_min, x_max]`.
    pub fn extrapolate(&self, x_min: f64, x_max: f64) -> ExtrapolatedLine {
        ExtrapolatedLine { slope: self.slope, intercept: self.intercept, x_min, x_max }
    }
}

/// A fitted line valid over a plotting range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolatedLine {
    /// Slope.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Lower end of the range.
    pub x_min: f64,
    /// Upper end of the range.
    pub x_max: f64,
}

impl ExtrapolatedLine {
    /// `a·x + b`; also defined outside `[x_min, x_max]`.
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// `n >= 2` equally spaced `(x, y)` samples over the range.
    pub fn sample(&self, n: usize) -> Vec<(f64, f64)> {
        let n = n.max(2);
        let step = (self.x_max - self.x_min) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                let x = self.x_min + i as f64 * step;
                (x, self.eval(x))
            })
            .collect()
    }
}

/// Confidence interval of the line at one x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    /// Abscissa.
    pub x: f64,
    /// Line value.
    pub y: f64,
    /// Half-width of the interval.
    pub half_width: f64,
}

/// Fit `y = a·x + b` to the points of `graph` with `x ∈ [lo, hi]`.
pub fn fit_linear(graph: &Graph, lo: f64, hi: f64) -> Result<LinearFit> {
    let sorted = graph.sorted();
    let pts: Vec<_> = sorted.points.iter().filter(|p| p.x >= lo && p.x <= hi).collect();
    if pts.len() < 2 {
        return Err(FitError::Underdetermined { points: pts.len(), required: 2, lo, hi }.into());
    }
    if pts.iter().all(|p| p.x == pts[0].x) {
        return Err(FitError::Singular(format!(
            "all {} points in [{lo}, {hi}] share x = {}",
            pts.len(),
            pts[0].x
        ))
        .into());
    }

    let with_errors: Vec<_> = pts.iter().copied().filter(|p| p.ey > 0.0).collect();
    let weighted = with_errors.len() >= 2 && with_errors.iter().any(|p| p.x != with_errors[0].x);
    let pts = if weighted {
        if with_errors.len() < pts.len() {
            let excluded = pts.len() - with_errors.len();
            tracing::debug!(excluded, "zero-error points left out of the fit");
        }
        with_errors
    } else {
        pts
    };
    let weight = |ey: f64| if weighted { 1.0 / (ey * ey) } else { 1.0 };

    let mut normal = Matrix2::<f64>::zeros();
    let mut rhs = Vector2::<f64>::zeros();
    for p in &pts {
        let w = weight(p.ey);
        let g = Vector2::new(p.x, 1.0);
        normal += w * g * g.transpose();
        rhs += w * p.y * g;
    }
    let cov = normal
        .try_inverse()
        .ok_or_else(|| {
            FitError::Singular(format!("normal matrix not invertible on [{lo}, {hi}]"))
        })?;
    let params = cov * rhs;
    let (slope, intercept) = (params[0], params[1]);

    let chi2 = pts
        .iter()
        .map(|p| {
            let r = p.y - (slope * p.x + intercept);
            weight(p.ey) * r * r
        })
        .sum();

    let fit = LinearFit {
        slope,
        intercept,
        covariance: [[cov[(0, 0)], cov[(0, 1)]], [cov[(1, 0)], cov[(1, 1)]]],
        chi2,
        ndf: pts.len() - 2,
        range: (lo, hi),
        weighted,
    };
    tracing::debug!(slope, intercept, chi2 = fit.chi2, ndf = fit.ndf, weighted, "linear fit");
    Ok(fit)
}

/// Confidence band of `fit` at each `x`, or `None` when `ndf == 0`.
pub fn confidence_band(fit: &LinearFit, xs: &[f64], level: f64) -> Option<Vec<BandPoint>> {
    if fit.ndf == 0 {
        return None;
    }
    let ndf = fit.ndf as f64;
    let t = StudentsT::new(0.0, 1.0, ndf).ok()?.inverse_cdf(1.0 - (1.0 - level) / 2.0);
    let scale = (fit.chi2 / ndf).sqrt();
    let c = fit.covariance;
    Some(
        xs.iter()
            .map(|&x| {
                let var = x * x * c[0][0] + 2.0 * x * c[0][1] + c[1][1];
                BandPoint { x, y: fit.eval(x), half_width: t * scale * var.max(0.0).sqrt() }
            })
            .collect(),
    )
}

/// Percent deviation `(y - line(x)) / line(x) · 100` per point, 0 where the line is 0.
/// The result is ordered by ascending x.
pub fn relative_deviation(graph: &Graph, line: &ExtrapolatedLine) -> Graph {
    let sorted = graph.sorted();
    let mut out = Graph::new(format!("Deviation {}", graph.name), "Deviation from Linearity");
    for p in &sorted.points {
        let expected = line.eval(p.x);
        let dev = if expected == 0.0 { 0.0 } else { (p.y - expected) / expected * 100.0 };
        out.push(p.x, dev, 0.0);
    }
    out
}
