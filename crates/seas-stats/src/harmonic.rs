//! The seasonal harmonic model of Graven et al. (2013).
//!
//! A quadratic trend plus annual and semi-annual harmonics in fractional
//! years:
//!
//! ```text
//! f(x) = a1 + a2 x + a3 x^2
//!      + a4 sin(2 pi x) + a5 cos(2 pi x)
//!      + a6 sin(4 pi x) + a7 cos(4 pi x)
//! ```

use crate::least_squares::CurveModel;
use std::f64::consts::PI;

/// Number of model parameters.
pub const N_PARAMS: usize = 7;

/// Initial guess handed to the solver, tuned for CO2-like series.
pub const INITIAL_GUESS: [f64; N_PARAMS] = [300.0, 1.1, 0.01, -3.0, -7.0, 5.5, 5.5];

/// Iteration cap for the per-window fits.
pub const MAX_ITERATIONS: usize = 100;

/// The 7-parameter harmonic + quadratic-trend model.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicModel;

impl HarmonicModel {
    /// Evaluate the model at `x` (fractional years).
    pub fn eval(x: f64, p: &[f64]) -> f64 {
        p[0] + p[1] * x
            + p[2] * x * x
            + p[3] * (2.0 * PI * x).sin()
            + p[4] * (2.0 * PI * x).cos()
            + p[5] * (4.0 * PI * x).sin()
            + p[6] * (4.0 * PI * x).cos()
    }
}

impl CurveModel for HarmonicModel {
    fn n_params(&self) -> usize {
        N_PARAMS
    }

    fn value(&self, x: f64, params: &[f64]) -> f64 {
        Self::eval(x, params)
    }

    fn gradient(&self, x: f64, _params: &[f64], out: &mut [f64]) {
        out[0] = 1.0;
        out[1] = x;
        out[2] = x * x;
        out[3] = (2.0 * PI * x).sin();
        out[4] = (2.0 * PI * x).cos();
        out[5] = (4.0 * PI * x).sin();
        out[6] = (4.0 * PI * x).cos();
    }
}
