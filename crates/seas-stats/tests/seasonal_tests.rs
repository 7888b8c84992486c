//! Cross-method seasonal-cycle tests on synthetic series.

use approx::assert_abs_diff_eq;
use grid_common::{Axis, Grid};
use ndarray::{ArrayD, IxDyn};
use seas_stats::{seascycl_fit_climatology, seascycl_fit_harmonic, SeasStatsError};
use test_utils::{harmonic_series_grid, harmonic_model, monthly_times};

/// Trend-free harmonic parameters so the climatology sees a stationary
/// cycle.
const PARAMS: [f64; 7] = [310.0, 0.0, 0.0, -3.0, -7.0, 5.5, 5.5];

#[test]
fn both_methods_recover_the_same_amplitude_on_exact_data() {
    let grid = harmonic_series_grid(2000, 84, &PARAMS);

    let harmonic = seascycl_fit_harmonic(&grid, 3, "time").unwrap();
    let climatology = seascycl_fit_climatology(&grid, 3, "time").unwrap();

    assert_eq!(harmonic.window_ends, climatology.window_ends);
    assert!(!harmonic.window_ends.is_empty());

    let n_windows = harmonic.window_ends.len();
    for w in 0..n_windows {
        let a = harmonic.jja_minus_djf[[w]];
        let b = climatology.jja_minus_djf[[w]];
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }

    // and both must match the analytic cycle of the generating model
    let jja: f64 = [6, 7, 8]
        .iter()
        .map(|&m| harmonic_model(m as f64 / 12.0, &PARAMS))
        .sum::<f64>()
        / 3.0;
    let djf: f64 = [12, 1, 2]
        .iter()
        .map(|&m| harmonic_model(m as f64 / 12.0, &PARAMS))
        .sum::<f64>()
        / 3.0;
    for w in 0..n_windows {
        assert_abs_diff_eq!(harmonic.jja_minus_djf[[w]], jja - djf, epsilon = 1e-6);
    }
}

#[test]
fn cycles_match_the_generating_model_month_by_month() {
    let grid = harmonic_series_grid(2000, 60, &PARAMS);
    let fit = seascycl_fit_harmonic(&grid, 3, "time").unwrap();

    let n_windows = fit.window_ends.len();
    for w in 0..n_windows {
        for m in 0..12 {
            let expected = harmonic_model((m + 1) as f64 / 12.0, &PARAMS);
            assert_abs_diff_eq!(fit.cycle[[w, m]], expected, epsilon = 1e-6);
        }
    }
}

#[test]
fn gappy_series_still_fits_where_data_suffices() {
    let mut grid = harmonic_series_grid(2000, 60, &PARAMS);
    // knock out one quarter of the samples
    for (i, v) in grid.data_mut().iter_mut().enumerate() {
        if i % 4 == 0 {
            *v = f64::NAN;
        }
    }
    let fit = seascycl_fit_harmonic(&grid, 3, "time").unwrap();
    assert!(!fit.window_ends.is_empty());
    // remaining samples are exact model values, so the fit is still exact
    let finite = fit
        .jja_minus_djf
        .iter()
        .filter(|v| v.is_finite())
        .count();
    assert!(finite > 0);
}

#[test]
fn extra_dimensions_fit_lane_by_lane() {
    // two series side by side: the harmonic one and a flat one
    let times = monthly_times(2000, 48);
    let harmonic_values: Vec<f64> = (0..48)
        .map(|i| harmonic_model(((i % 12) as f64 + 1.0) / 12.0, &PARAMS))
        .collect();
    let mut values = Vec::with_capacity(48 * 2);
    for v in &harmonic_values {
        values.push(*v);
        values.push(100.0);
    }
    let grid = Grid::new(
        "pair",
        vec![
            Axis::time("time", times).unwrap(),
            Axis::numeric("site", vec![0.0, 1.0]).unwrap(),
        ],
        ArrayD::from_shape_vec(IxDyn(&[48, 2]), values).unwrap(),
    )
    .unwrap();

    let fit = seascycl_fit_climatology(&grid, 3, "time").unwrap();
    let n_windows = fit.window_ends.len();
    assert_eq!(fit.cycle.shape(), &[n_windows, 12, 2]);
    assert_eq!(fit.jja_minus_djf.shape(), &[n_windows, 2]);
    assert_eq!(fit.other_axes.len(), 1);
    assert_eq!(fit.other_axes[0].name(), "site");

    // the flat series has zero seasonal amplitude
    for w in 0..n_windows {
        assert_abs_diff_eq!(fit.jja_minus_djf[[w, 1]], 0.0, epsilon = 1e-9);
    }
}

#[test]
fn non_monthly_series_is_rejected() {
    // weekly cadence: the per-year sample counts cannot be equal
    use chrono::TimeZone;
    let start = chrono::Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let times: Vec<_> = (0..56).map(|i| start + chrono::Duration::weeks(i)).collect();
    let grid = Grid::new(
        "v",
        vec![Axis::time("time", times).unwrap()],
        ArrayD::zeros(IxDyn(&[56])),
    )
    .unwrap();
    let result = seascycl_fit_harmonic(&grid, 3, "time");
    assert!(matches!(
        result,
        Err(SeasStatsError::Grid(_)) | Err(SeasStatsError::NotMonthly { .. })
    ));
}
