//! Box-constrained L-BFGS on top of argmin.
//!
//! Bounds are enforced by clamping parameters before every evaluation and zeroing gradient
//! components that push against an active bound.

use std::cell::Cell;
use std::rc::Rc;

use argmin::core::{CostFunction, Executor, Gradient, State, TerminationReason, TerminationStatus};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;

use tepx_core::{Error, FitError, Result};

/// Minimiser settings.
#[derive(Debug, Clone)]
pub struct MinimizerConfig {
    /// Iteration cap.
    pub max_iter: u64,
    /// Gradient-norm tolerance.
    pub tol: f64,
    /// L-BFGS history length.
    pub m: usize,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self { max_iter: 500, tol: 1e-6, m: 7 }
    }
}

/// Outcome of a minimisation.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best parameters (inside the bounds).
    pub parameters: Vec<f64>,
    /// Objective at `parameters`.
    pub fval: f64,
    /// Iterations used.
    pub n_iter: u64,
    /// Objective evaluations.
    pub n_fev: usize,
    /// `true` when the solver reported convergence.
    pub converged: bool,
    /// Termination status text.
    pub message: String,
}

/// Scalar objective with an optional analytic gradient.
pub trait Objective {
    /// Value at `params`.
    fn value(&self, params: &[f64]) -> f64;

    /// Gradient at `params`; central differences unless overridden.
    fn gradient(&self, params: &[f64]) -> Vec<f64> {
        let mut grad = vec![0.0; params.len()];
        let mut p = params.to_vec();
        for i in 0..params.len() {
            let h = 1e-7 * params[i].abs().max(1.0);
            p[i] = params[i] + h;
            let up = self.value(&p);
            p[i] = params[i] - h;
            let down = self.value(&p);
            p[i] = params[i];
            grad[i] = (up - down) / (2.0 * h);
        }
        grad
    }
}

fn clamp(params: &[f64], bounds: &[(f64, f64)]) -> Vec<f64> {
    params.iter().zip(bounds).map(|(&v, &(lo, hi))| v.clamp(lo, hi)).collect()
}

struct Problem<'a> {
    objective: &'a dyn Objective,
    bounds: &'a [(f64, f64)],
    n_fev: Rc<Cell<usize>>,
}

impl CostFunction for Problem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> std::result::Result<f64, argmin::core::Error> {
        self.n_fev.set(self.n_fev.get() + 1);
        let v = self.objective.value(&clamp(params, self.bounds));
        if v.is_finite() {
            Ok(v)
        } else {
            Err(argmin::core::Error::msg("objective is not finite"))
        }
    }
}

impl Gradient for Problem<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, params: &Self::Param) -> std::result::Result<Vec<f64>, argmin::core::Error> {
        let x = clamp(params, self.bounds);
        let mut g = self.objective.gradient(&x);
        const EPS: f64 = 1e-12;
        for (gi, (&xi, &(lo, hi))) in g.iter_mut().zip(x.iter().zip(self.bounds)) {
            if (xi <= lo + EPS && *gi > 0.0) || (xi >= hi - EPS && *gi < 0.0) {
                *gi = 0.0;
            }
        }
        Ok(g)
    }
}

/// L-BFGS with box constraints.
#[derive(Debug, Clone, Default)]
pub struct BoundedLbfgs {
    config: MinimizerConfig,
}

impl BoundedLbfgs {
    /// New minimiser.
    pub fn new(config: MinimizerConfig) -> Self {
        Self { config }
    }

    /// Minimise `objective` from `start` within `bounds`.
    ///
    /// Solver failures (for example a line search that cannot make progress) are reported as
    /// [`FitError::NotConverged`].
    pub fn minimize(
        &self,
        objective: &dyn Objective,
        start: &[f64],
        bounds: &[(f64, f64)],
    ) -> Result<Minimum> {
        if start.len() != bounds.len() {
            return Err(Error::Validation(format!(
                "{} start values for {} bounds",
                start.len(),
                bounds.len()
            )));
        }
        let n_fev = Rc::new(Cell::new(0));
        let problem = Problem { objective, bounds, n_fev: Rc::clone(&n_fev) };
        let solver = LBFGS::new(MoreThuenteLineSearch::new(), self.config.m)
            .with_tolerance_grad(self.config.tol)
            .and_then(|s| s.with_tolerance_cost((0.1 * self.config.tol).max(1e-12)))
            .map_err(|e| Error::Validation(format!("invalid minimizer tolerance: {e}")))?;

        let res = Executor::new(problem, solver)
            .configure(|state| state.param(clamp(start, bounds)).max_iters(self.config.max_iter))
            .run()
            .map_err(|e| FitError::NotConverged(e.to_string()))?;

        let state = res.state();
        let best = state
            .get_best_param()
            .ok_or_else(|| FitError::NotConverged("no parameters evaluated".into()))?;
        let termination = state.get_termination_status();
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
                | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
        );
        Ok(Minimum {
            parameters: clamp(best, bounds),
            fval: state.get_best_cost(),
            n_iter: state.get_iter(),
            n_fev: n_fev.get(),
            converged,
            message: termination.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Bowl;

    impl Objective for Bowl {
        fn value(&self, p: &[f64]) -> f64 {
            (p[0] - 2.0).powi(2) + 3.0 * (p[1] + 1.0).powi(2)
        }
    }

    #[test]
    fn finds_unconstrained_minimum() {
        let m = BoundedLbfgs::default().minimize(&Bowl, &[0.0, 0.0], &[(-10.0, 10.0); 2]).unwrap();
        assert!(m.converged, "{}", m.message);
        assert_relative_eq!(m.parameters[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(m.parameters[1], -1.0, epsilon = 1e-4);
    }

    #[test]
    fn respects_bounds() {
        let m = BoundedLbfgs::default()
            .minimize(&Bowl, &[0.5, 0.5], &[(0.0, 1.0), (0.0, 1.0)])
            .unwrap();
        assert!(m.parameters[0] <= 1.0 && m.parameters[1] >= 0.0);
        assert_relative_eq!(m.parameters[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn length_mismatch() {
        assert!(BoundedLbfgs::default().minimize(&Bowl, &[0.0], &[(0.0, 1.0); 2]).is_err());
    }
}
