//! Scaled-Poisson model fitted to count distributions.
//!
//! `f(x) = p0 · (p1/p2)^(x/p2) · exp(-p1/p2) / Γ(x/p2 + 1)`
//!
//! `p0` is a normalisation, `p1` the mean count and `p2` a scale that lets the model widen
//! beyond a pure Poisson. The fit minimises the binned χ² over bins with positive content
//! inside the configured range, using `sqrt(content)` as the bin error.

use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

use tepx_core::config::PoissonFitConfig;
use tepx_core::{FitError, Result};
use tepx_io::Histogram1D;

use crate::optimizer::{BoundedLbfgs, MinimizerConfig, Objective};
use crate::stats;

/// Model value at `x` for parameters `[p0, p1, p2]`.
pub fn model(x: f64, p: &[f64]) -> f64 {
    let (norm, mu, scale) = (p[0], p[1], p[2]);
    if norm <= 0.0 || mu <= 0.0 || scale <= 0.0 {
        return 0.0;
    }
    let lambda = mu / scale;
    let k = x / scale;
    (norm.ln() + k * lambda.ln() - lambda - ln_gamma(k + 1.0)).exp()
}

/// Binned χ² of the model against `(x, content)` pairs.
#[derive(Debug, Clone)]
pub struct BinnedChi2 {
    points: Vec<(f64, f64)>,
}

impl BinnedChi2 {
    /// Bins of `h` with centre in `[lo, hi]` and positive content.
    pub fn new(h: &Histogram1D, lo: f64, hi: f64) -> Self {
        let points = h
            .contents
            .iter()
            .enumerate()
            .map(|(i, &c)| (h.axis.center(i), c))
            .filter(|&(x, c)| c > 0.0 && x >= lo && x <= hi)
            .collect();
        Self { points }
    }

    /// Bins entering the fit.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }
}

impl Objective for BinnedChi2 {
    fn value(&self, p: &[f64]) -> f64 {
        self.points.iter().map(|&(x, c)| (c - model(x, p)).powi(2) / c).sum()
    }
}

/// Best-fit parameters of the scaled-Poisson model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoissonFit {
    /// `[p0, p1, p2]`.
    pub parameters: [f64; 3],
    /// χ² at the minimum.
    pub chi2: f64,
    /// Bins minus free parameters.
    pub ndf: usize,
    /// Minimiser iterations.
    pub n_iter: u64,
}

impl PoissonFit {
    /// Fitted mean count (`p1`).
    pub fn mean(&self) -> f64 {
        self.parameters[1]
    }
}

/// Result of attempting a fit.
#[derive(Debug, Clone, PartialEq)]
pub enum PoissonOutcome {
    /// Distribution mean at or below the threshold; nothing fitted.
    Skipped {
        /// Empirical mean.
        mean: f64,
    },
    /// Converged fit.
    Fitted(PoissonFit),
}

/// Fit the model to `h`.
///
/// Returns [`PoissonOutcome::Skipped`] when the empirical mean is `<= cfg.min_mean`,
/// [`FitError::Underdetermined`] with fewer than three usable bins and
/// [`FitError::NotConverged`] when the minimiser does not converge.
pub fn fit_poisson(h: &Histogram1D, cfg: &PoissonFitConfig) -> Result<PoissonOutcome> {
    let mean = stats::mean(h);
    if mean <= cfg.min_mean {
        return Ok(PoissonOutcome::Skipped { mean });
    }
    let [lo, hi] = cfg.range;
    let chi2 = BinnedChi2::new(h, lo, hi);
    if chi2.n_points() < 3 {
        let points = chi2.n_points();
        return Err(FitError::Underdetermined { points, required: 3, lo, hi }.into());
    }

    let norm0 = (h.integral() * h.axis.width()).max(1.0);
    let start = [norm0, mean, 1.0];
    let bounds = [(0.0, 100.0 * norm0), (1e-6, 10.0 * mean + 10.0), (0.05, 50.0)];
    let minimizer =
        BoundedLbfgs::new(MinimizerConfig { max_iter: cfg.max_iter, ..Default::default() });
    let m = minimizer.minimize(&chi2, &start, &bounds)?;
    if !m.converged {
        return Err(FitError::NotConverged(m.message).into());
    }
    let fit = PoissonFit {
        parameters: [m.parameters[0], m.parameters[1], m.parameters[2]],
        chi2: m.fval,
        ndf: chi2.n_points() - 3,
        n_iter: m.n_iter,
    };
    tracing::debug!(mean = fit.mean(), chi2 = fit.chi2, ndf = fit.ndf, "poisson fit");
    Ok(PoissonOutcome::Fitted(fit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tepx_io::Axis;

    fn poisson_hist(lambda: f64, n: f64) -> Histogram1D {
        // Integer bin centres 0..99.
        let axis = Axis::new(100, -0.5, 99.5).unwrap();
        let contents =
            (0..100).map(|k| n * model(k as f64, &[1.0, lambda, 1.0])).collect::<Vec<_>>();
        Histogram1D::from_contents("pois", axis, contents).unwrap()
    }

    #[test]
    fn model_is_poisson_pmf_at_unit_scale() {
        // P(3; 2) = 2^3 e^-2 / 3!
        let expected = 8.0 * (-2.0f64).exp() / 6.0;
        assert_relative_eq!(model(3.0, &[1.0, 2.0, 1.0]), expected, epsilon = 1e-12);
        assert_eq!(model(3.0, &[1.0, 0.0, 1.0]), 0.0);
    }

    #[test]
    fn chi2_vanishes_at_truth() {
        let h = poisson_hist(20.0, 10_000.0);
        let chi2 = BinnedChi2::new(&h, 1.0, 2500.0);
        assert!(chi2.value(&[10_000.0, 20.0, 1.0]) < 1e-9);
        assert!(chi2.value(&[10_000.0, 22.0, 1.0]) > 1.0);
    }

    #[test]
    fn fit_recovers_mean_and_unit_scale() {
        for lambda in [5.0, 40.0] {
            let h = poisson_hist(lambda, 10_000.0);
            let out = fit_poisson(&h, &PoissonFitConfig::default()).unwrap();
            let PoissonOutcome::Fitted(fit) = out else {
                panic!("expected a converged fit for lambda = {lambda}, got {out:?}");
            };
            assert_relative_eq!(fit.mean(), lambda, max_relative = 1e-3);
            assert_relative_eq!(fit.parameters[2], 1.0, epsilon = 1e-2);
            assert_relative_eq!(fit.parameters[0], 10_000.0, max_relative = 1e-2);
            assert!(fit.chi2 < 1.0, "chi2 = {}", fit.chi2);
        }
    }

    #[test]
    fn low_mean_is_skipped() {
        let axis = Axis::new(4, -0.5, 3.5).unwrap();
        let h = Histogram1D::from_contents("low", axis, vec![10.0, 1.0, 0.0, 0.0]).unwrap();
        let out = fit_poisson(&h, &PoissonFitConfig::default()).unwrap();
        assert!(matches!(out, PoissonOutcome::Skipped { .. }));
    }

    #[test]
    fn too_few_bins_is_underdetermined() {
        let axis = Axis::new(4, -0.5, 3.5).unwrap();
        let h = Histogram1D::from_contents("few", axis, vec![0.0, 0.0, 5.0, 5.0]).unwrap();
        let err = fit_poisson(&h, &PoissonFitConfig::default()).unwrap_err();
        assert!(err.to_string().contains("underdetermined"), "{err}");
    }
}
