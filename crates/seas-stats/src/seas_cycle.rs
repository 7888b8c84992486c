//! Rolling-window seasonal-cycle estimation.
//!
//! Both estimators work on trailing windows of `n_years * 12` monthly
//! samples ending at every 12th sample. A window survives when it holds
//! more than one year of finite data; surviving windows produce a 12-value
//! annual cycle and the JJA minus DJF amplitude summary.
//!
//! The harmonic estimator fits the Graven model per window by damped least
//! squares and reads the cycle off the fitted curve; it suits sparse or
//! irregular-within-month data. The climatology estimator simply averages
//! by calendar month within each window and assumes regular sampling.

use crate::error::{Result, SeasStatsError};
use crate::harmonic::{HarmonicModel, INITIAL_GUESS, MAX_ITERATIONS};
use crate::least_squares::LevenbergMarquardt;
use chrono::{DateTime, Datelike, Utc};
use grid_common::{time, Axis, Grid};
use ndarray::{ArrayD, Axis as NdAxis, IxDyn};
use rayon::prelude::*;
use tracing::warn;

/// Samples per year required by both estimators.
pub const MONTHS_PER_YEAR: usize = 12;

/// Zero-based cycle positions of June, July, August.
const JJA: [usize; 3] = [5, 6, 7];

/// Zero-based cycle positions of December, January, February.
const DJF: [usize; 3] = [11, 0, 1];

/// The windowed seasonal cycle of a grid.
#[derive(Debug, Clone)]
pub struct SeasonalCycle {
    /// Timestamp of the last sample of each surviving window.
    pub window_ends: Vec<DateTime<Utc>>,

    /// The grid's non-time axes, in their original order.
    pub other_axes: Vec<Axis>,

    /// Annual cycle per window: shape `[window, month, other dims...]`,
    /// with months January..December along the second axis.
    pub cycle: ArrayD<f64>,

    /// JJA minus DJF amplitude: shape `[window, other dims...]`.
    pub jja_minus_djf: ArrayD<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Harmonic,
    Climatology,
}

/// Fit the seasonal cycle by per-window harmonic least squares.
///
/// Slow on large grids; prefer [`seascycl_fit_climatology`] there. Fails
/// when `dim` is missing or not a datetime axis, when the cadence is not
/// twelve steps per calendar year, or when `n_years` is even.
pub fn seascycl_fit_harmonic(grid: &Grid, n_years: usize, dim: &str) -> Result<SeasonalCycle> {
    fit(grid, n_years, dim, Method::Harmonic)
}

/// Fit the seasonal cycle by per-window calendar-month climatology.
///
/// Cheap and robust for regularly sampled data; shares every precondition
/// with [`seascycl_fit_harmonic`].
pub fn seascycl_fit_climatology(grid: &Grid, n_years: usize, dim: &str) -> Result<SeasonalCycle> {
    fit(grid, n_years, dim, Method::Climatology)
}

fn fit(grid: &Grid, n_years: usize, dim: &str, method: Method) -> Result<SeasonalCycle> {
    let (tdim, taxis) = grid
        .axis(dim)
        .ok_or_else(|| SeasStatsError::NoSuchDimension(dim.to_string()))?;
    let stamps = taxis
        .values()
        .as_time()
        .ok_or_else(|| SeasStatsError::NotTimeAxis(dim.to_string()))?
        .to_vec();
    let steps = time::steps_per_year(&stamps)?;
    if steps != MONTHS_PER_YEAR {
        return Err(SeasStatsError::NotMonthly { steps });
    }
    if n_years % 2 == 0 {
        return Err(SeasStatsError::EvenWindow(n_years));
    }

    let window = n_years * MONTHS_PER_YEAR;
    let months: Vec<usize> = stamps.iter().map(|t| t.month() as usize).collect();

    // time moves to the innermost axis so every series is one lane
    let mut order: Vec<usize> = (0..grid.ndim()).filter(|&i| i != tdim).collect();
    order.push(tdim);
    let permuted = grid.data().clone().permuted_axes(order);
    let arr = permuted.as_standard_layout().to_owned();
    let lanes: Vec<Vec<f64>> = arr
        .lanes(NdAxis(arr.ndim() - 1))
        .into_iter()
        .map(|lane| lane.to_vec())
        .collect();

    // windows end at every 12th sample; survivors hold more than a year of
    // finite data in at least one lane
    let kept: Vec<usize> = (0..stamps.len())
        .step_by(MONTHS_PER_YEAR)
        .filter(|&end| {
            let start = (end + 1).saturating_sub(window);
            lanes.iter().any(|lane| {
                lane[start..=end].iter().filter(|v| v.is_finite()).count() > MONTHS_PER_YEAR
            })
        })
        .collect();

    let results: Vec<LaneFit> = lanes
        .par_iter()
        .map(|lane| fit_lane(lane, &months, &kept, window, method))
        .collect();

    let n_windows = kept.len();
    let other_shape: Vec<usize> = grid
        .shape()
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != tdim)
        .map(|(_, &len)| len)
        .collect();
    let n_other = other_shape.len();

    // lane results land as [other..., window, month]; rotate the window and
    // month axes to the front
    let mut cycle_flat = Vec::with_capacity(lanes.len() * n_windows * MONTHS_PER_YEAR);
    let mut amp_flat = Vec::with_capacity(lanes.len() * n_windows);
    for lane_fit in results {
        cycle_flat.extend(lane_fit.cycle);
        amp_flat.extend(lane_fit.amplitude);
    }

    let mut cycle_shape = other_shape.clone();
    cycle_shape.push(n_windows);
    cycle_shape.push(MONTHS_PER_YEAR);
    let cycle = ArrayD::from_shape_vec(IxDyn(&cycle_shape), cycle_flat)
        .map_err(|e| SeasStatsError::FitFailed(e.to_string()))?;
    let mut cycle_perm = vec![n_other, n_other + 1];
    cycle_perm.extend(0..n_other);
    let cycle = cycle
        .permuted_axes(cycle_perm)
        .as_standard_layout()
        .to_owned();

    let mut amp_shape = other_shape.clone();
    amp_shape.push(n_windows);
    let amp = ArrayD::from_shape_vec(IxDyn(&amp_shape), amp_flat)
        .map_err(|e| SeasStatsError::FitFailed(e.to_string()))?;
    let mut amp_perm = vec![n_other];
    amp_perm.extend(0..n_other);
    let amp = amp.permuted_axes(amp_perm).as_standard_layout().to_owned();

    Ok(SeasonalCycle {
        window_ends: kept.iter().map(|&end| stamps[end]).collect(),
        other_axes: grid
            .axes()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != tdim)
            .map(|(_, axis)| axis.clone())
            .collect(),
        cycle,
        jja_minus_djf: amp,
    })
}

struct LaneFit {
    /// `[window, month]` row-major, NaN where the lane had too little data.
    cycle: Vec<f64>,
    /// One amplitude per window.
    amplitude: Vec<f64>,
}

fn fit_lane(
    lane: &[f64],
    months: &[usize],
    kept: &[usize],
    window: usize,
    method: Method,
) -> LaneFit {
    let mut cycle = Vec::with_capacity(kept.len() * MONTHS_PER_YEAR);
    let mut amplitude = Vec::with_capacity(kept.len());

    for &end in kept {
        let start = (end + 1).saturating_sub(window);
        let finite: Vec<(usize, f64)> = (start..=end)
            .filter(|&i| lane[i].is_finite())
            .map(|i| (months[i], lane[i]))
            .collect();

        let window_cycle = if finite.len() <= MONTHS_PER_YEAR {
            [f64::NAN; MONTHS_PER_YEAR]
        } else {
            match method {
                Method::Climatology => climatology_cycle(&finite),
                Method::Harmonic => harmonic_cycle(&finite),
            }
        };

        amplitude.push(season_difference(&window_cycle));
        cycle.extend(window_cycle);
    }

    LaneFit { cycle, amplitude }
}

/// Calendar-month means over one window.
fn climatology_cycle(samples: &[(usize, f64)]) -> [f64; MONTHS_PER_YEAR] {
    let mut sums = [0.0; MONTHS_PER_YEAR];
    let mut counts = [0usize; MONTHS_PER_YEAR];
    for &(month, value) in samples {
        sums[month - 1] += value;
        counts[month - 1] += 1;
    }
    std::array::from_fn(|m| {
        if counts[m] == 0 {
            f64::NAN
        } else {
            sums[m] / counts[m] as f64
        }
    })
}

/// Harmonic fit over one window, read off at the twelve month positions.
fn harmonic_cycle(samples: &[(usize, f64)]) -> [f64; MONTHS_PER_YEAR] {
    let xs: Vec<f64> = samples
        .iter()
        .map(|&(month, _)| month as f64 / MONTHS_PER_YEAR as f64)
        .collect();
    let ys: Vec<f64> = samples.iter().map(|&(_, value)| value).collect();

    let solver = LevenbergMarquardt::with_max_iterations(MAX_ITERATIONS);
    match solver.fit(&HarmonicModel, &xs, &ys, &INITIAL_GUESS) {
        Ok(params) => std::array::from_fn(|m| {
            HarmonicModel::eval((m + 1) as f64 / MONTHS_PER_YEAR as f64, &params)
        }),
        Err(err) => {
            warn!(%err, "harmonic window fit failed, window kept as NaN");
            [f64::NAN; MONTHS_PER_YEAR]
        }
    }
}

/// NaN-skipping JJA mean minus DJF mean of one cycle.
fn season_difference(cycle: &[f64; MONTHS_PER_YEAR]) -> f64 {
    nan_mean(JJA.iter().map(|&m| cycle[m])) - nan_mean(DJF.iter().map(|&m| cycle[m]))
}

fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use grid_common::Axis;
    use ndarray::ArrayD;

    fn monthly_grid(values: Vec<f64>) -> Grid {
        let n = values.len();
        let times = (0..n)
            .map(|i| {
                Utc.with_ymd_and_hms(2000 + (i / 12) as i32, (i % 12) as u32 + 1, 1, 0, 0, 0)
                    .unwrap()
            })
            .collect();
        Grid::new(
            "co2",
            vec![Axis::time("time", times).unwrap()],
            ArrayD::from_shape_vec(IxDyn(&[n]), values).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_even_window_rejected() {
        let grid = monthly_grid(vec![1.0; 36]);
        assert!(matches!(
            seascycl_fit_climatology(&grid, 2, "time"),
            Err(SeasStatsError::EvenWindow(2))
        ));
    }

    #[test]
    fn test_missing_dimension_rejected() {
        let grid = monthly_grid(vec![1.0; 36]);
        assert!(matches!(
            seascycl_fit_climatology(&grid, 3, "t"),
            Err(SeasStatsError::NoSuchDimension(_))
        ));
    }

    #[test]
    fn test_uneven_years_rejected() {
        let grid = monthly_grid(vec![1.0; 30]);
        assert!(seascycl_fit_climatology(&grid, 3, "time").is_err());
    }

    #[test]
    fn test_climatology_of_constant_cycle() {
        // the same 12-month pattern repeated five years
        let pattern: Vec<f64> = (1..=12).map(|m| m as f64).collect();
        let values: Vec<f64> = pattern.iter().cycle().take(60).copied().collect();
        let grid = monthly_grid(values);

        let out = seascycl_fit_climatology(&grid, 3, "time").unwrap();
        assert!(!out.window_ends.is_empty());
        // every surviving window sees the identical pattern
        let shape = out.cycle.shape().to_vec();
        assert_eq!(shape[1], 12);
        for w in 0..shape[0] {
            for m in 0..12 {
                let v = out.cycle[[w, m]];
                if v.is_finite() {
                    assert_eq!(v, (m + 1) as f64);
                }
            }
        }
        // JJA mean 7, DJF mean (12 + 1 + 2) / 3 = 5
        for w in 0..shape[0] {
            let amp = out.jja_minus_djf[[w]];
            assert!((amp - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_windows_end_on_year_boundaries() {
        let grid = monthly_grid((0..48).map(|i| i as f64).collect());
        let out = seascycl_fit_climatology(&grid, 3, "time").unwrap();
        for end in &out.window_ends {
            assert_eq!(end.day(), 1);
            assert_eq!(end.month(), 1);
        }
    }
}
