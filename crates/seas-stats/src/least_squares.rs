//! A small damped least-squares (Levenberg–Marquardt) curve fitter.
//!
//! Fits `y = f(x; p)` by minimizing the summed squared residuals, given a
//! model with analytic gradients, an initial parameter guess, and an
//! iteration cap. The normal equations are solved with `nalgebra`'s
//! Cholesky factorization; the damping factor grows until a step reduces
//! the cost or the damping range is exhausted.

use crate::error::{Result, SeasStatsError};
use nalgebra::{DMatrix, DVector};

/// A scalar model with analytic partial derivatives.
pub trait CurveModel {
    /// Number of parameters.
    fn n_params(&self) -> usize;

    /// Model value at `x`.
    fn value(&self, x: f64, params: &[f64]) -> f64;

    /// Partial derivatives at `x`, written into `out` (one per parameter).
    fn gradient(&self, x: f64, params: &[f64], out: &mut [f64]);
}

/// Damped least-squares solver.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardt {
    /// Cap on outer iterations.
    pub max_iterations: usize,
    /// Stop when the gradient norm falls below this.
    pub tolerance: f64,
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

impl LevenbergMarquardt {
    /// Create a solver with the given iteration cap.
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Fit the model to `(xs, ys)` starting from `initial`.
    ///
    /// Fails when the sample count is below the parameter count, when the
    /// lengths disagree, or when no damping factor yields a solvable step.
    pub fn fit<M: CurveModel>(
        &self,
        model: &M,
        xs: &[f64],
        ys: &[f64],
        initial: &[f64],
    ) -> Result<Vec<f64>> {
        let n = xs.len();
        let p = model.n_params();
        if ys.len() != n {
            return Err(SeasStatsError::FitFailed(format!(
                "x and y lengths differ: {n} vs {}",
                ys.len()
            )));
        }
        if initial.len() != p {
            return Err(SeasStatsError::FitFailed(format!(
                "initial guess has {} parameters, model needs {p}",
                initial.len()
            )));
        }
        if n < p {
            return Err(SeasStatsError::FitFailed(format!(
                "underdetermined fit: {n} samples for {p} parameters"
            )));
        }

        let mut params = initial.to_vec();
        let mut cost = self.cost(model, xs, ys, &params);
        let mut lambda = 1e-3;
        let mut gradient = vec![0.0; p];

        for _ in 0..self.max_iterations {
            let mut jacobian = DMatrix::zeros(n, p);
            let mut residuals = DVector::zeros(n);
            for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
                residuals[i] = y - model.value(x, &params);
                model.gradient(x, &params, &mut gradient);
                for (j, &g) in gradient.iter().enumerate() {
                    jacobian[(i, j)] = g;
                }
            }

            let jtj = jacobian.transpose() * &jacobian;
            let jtr = jacobian.transpose() * &residuals;
            if jtr.norm() < self.tolerance {
                break;
            }

            // inner damping loop: grow lambda until a step helps
            loop {
                let mut damped = jtj.clone();
                for i in 0..p {
                    let d = damped[(i, i)];
                    damped[(i, i)] = d + lambda * d.max(1e-12);
                }
                let step = damped
                    .cholesky()
                    .map(|chol| chol.solve(&jtr));

                if let Some(step) = step {
                    let candidate: Vec<f64> = params
                        .iter()
                        .zip(step.iter())
                        .map(|(p, s)| p + s)
                        .collect();
                    let candidate_cost = self.cost(model, xs, ys, &candidate);
                    if candidate_cost.is_finite() && candidate_cost <= cost {
                        params = candidate;
                        cost = candidate_cost;
                        lambda = (lambda / 10.0).max(1e-12);
                        break;
                    }
                }

                lambda *= 10.0;
                if lambda > 1e12 {
                    return Err(SeasStatsError::FitFailed(
                        "damping exhausted without reducing the cost".to_string(),
                    ));
                }
            }
        }

        Ok(params)
    }

    fn cost<M: CurveModel>(&self, model: &M, xs: &[f64], ys: &[f64], params: &[f64]) -> f64 {
        xs.iter()
            .zip(ys)
            .map(|(&x, &y)| {
                let r = y - model.value(x, params);
                r * r
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// y = a + b x, linear in both parameters.
    struct Line;

    impl CurveModel for Line {
        fn n_params(&self) -> usize {
            2
        }

        fn value(&self, x: f64, params: &[f64]) -> f64 {
            params[0] + params[1] * x
        }

        fn gradient(&self, x: f64, _params: &[f64], out: &mut [f64]) {
            out[0] = 1.0;
            out[1] = x;
        }
    }

    #[test]
    fn test_recovers_exact_line() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 + 0.5 * x).collect();
        let fitted = LevenbergMarquardt::default()
            .fit(&Line, &xs, &ys, &[0.0, 0.0])
            .unwrap();
        assert_abs_diff_eq!(fitted[0], 3.0, epsilon = 1e-8);
        assert_abs_diff_eq!(fitted[1], 0.5, epsilon = 1e-8);
    }

    #[test]
    fn test_underdetermined_fit_fails() {
        let err = LevenbergMarquardt::default().fit(&Line, &[1.0], &[2.0], &[0.0, 0.0]);
        assert!(matches!(err, Err(SeasStatsError::FitFailed(_))));
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = LevenbergMarquardt::default().fit(&Line, &[1.0, 2.0], &[2.0], &[0.0, 0.0]);
        assert!(matches!(err, Err(SeasStatsError::FitFailed(_))));
    }
}
