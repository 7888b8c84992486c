//! Synthetic data generators with predictable values.

use chrono::{DateTime, TimeZone, Utc};
use grid_common::{Axis, CoordValues, Grid};
use ndarray::{ArrayD, IxDyn};

/// A monthly time axis: midnight on the 1st of each month, starting January
/// of `start_year`.
pub fn monthly_times(start_year: i32, n_months: usize) -> Vec<DateTime<Utc>> {
    (0..n_months)
        .map(|i| {
            let year = start_year + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
        })
        .collect()
}

/// A lat/lon grid whose cell value is `lat_index * 1000 + lon_index`.
///
/// The pattern makes misplaced reads obvious: `grid[[i, j]] == i*1000 + j`.
pub fn latlon_grid(lats: Vec<f64>, lons: Vec<f64>) -> Grid {
    let (nlat, nlon) = (lats.len(), lons.len());
    let mut data = Vec::with_capacity(nlat * nlon);
    for i in 0..nlat {
        for j in 0..nlon {
            data.push((i * 1000 + j) as f64);
        }
    }
    Grid::new(
        "tmp",
        vec![
            Axis::numeric("lat", lats).expect("test lats must be sorted"),
            Axis::numeric("lon", lons).expect("test lons must be sorted"),
        ],
        ArrayD::from_shape_vec(IxDyn(&[nlat, nlon]), data).expect("shape matches data"),
    )
    .expect("test grid is well formed")
}

/// A (time, lat, lon) grid with value `t*10000 + i*100 + j`.
pub fn time_latlon_grid(times: Vec<DateTime<Utc>>, lats: Vec<f64>, lons: Vec<f64>) -> Grid {
    let (nt, nlat, nlon) = (times.len(), lats.len(), lons.len());
    let mut data = Vec::with_capacity(nt * nlat * nlon);
    for t in 0..nt {
        for i in 0..nlat {
            for j in 0..nlon {
                data.push((t * 10000 + i * 100 + j) as f64);
            }
        }
    }
    Grid::new(
        "tmp",
        vec![
            Axis::time("time", times).expect("test times must be sorted"),
            Axis::numeric("lat", lats).expect("test lats must be sorted"),
            Axis::numeric("lon", lons).expect("test lons must be sorted"),
        ],
        ArrayD::from_shape_vec(IxDyn(&[nt, nlat, nlon]), data).expect("shape matches data"),
    )
    .expect("test grid is well formed")
}

/// Evaluate the 7-parameter harmonic + quadratic-trend model at `x` (in
/// fractional years).
pub fn harmonic_model(x: f64, p: &[f64; 7]) -> f64 {
    use std::f64::consts::PI;
    p[0] + p[1] * x
        + p[2] * x * x
        + p[3] * (2.0 * PI * x).sin()
        + p[4] * (2.0 * PI * x).cos()
        + p[5] * (4.0 * PI * x).sin()
        + p[6] * (4.0 * PI * x).cos()
}

/// A monthly 1-D time-series grid synthesized from the harmonic model, with
/// x = calendar month / 12.
pub fn harmonic_series_grid(start_year: i32, n_months: usize, params: &[f64; 7]) -> Grid {
    let times = monthly_times(start_year, n_months);
    let values: Vec<f64> = (0..n_months)
        .map(|i| harmonic_model(((i % 12) as f64 + 1.0) / 12.0, params))
        .collect();
    Grid::new(
        "co2",
        vec![Axis::time("time", times).expect("test times must be sorted")],
        ArrayD::from_shape_vec(IxDyn(&[n_months]), values).expect("shape matches data"),
    )
    .expect("test series is well formed")
}
