//! Zonal-anomaly diagnostics.
//!
//! The data preparation behind Hovmöller-style latitude-time plots: zonal
//! (longitude) means, latitude rows with no data dropped, the per-latitude
//! time mean removed, and the remainder averaged into calendar years.
//! Rendering is someone else's problem; this module only shapes the data.

use crate::error::{Result, SeasStatsError};
use chrono::{DateTime, Datelike, Utc};
use grid_common::Grid;
use ndarray::Array2;

/// Zonal-anomaly data for a `(time, lat, lon)` grid.
#[derive(Debug, Clone)]
pub struct ZonalAnomaly {
    /// Latitudes that held any finite data, ascending.
    pub lat: Vec<f64>,

    /// Time mean of the zonal mean per kept latitude.
    pub lat_mean: Vec<f64>,

    /// The calendar years covered, ascending.
    pub years: Vec<i32>,

    /// Annual-mean zonal anomaly, shape `[lat, year]`.
    pub anomalies: Array2<f64>,
}

/// Compute the zonal anomaly of a grid with exactly the dimensions
/// `time`, `lat`, and `lon` (any order).
pub fn zonal_anomaly(grid: &Grid) -> Result<ZonalAnomaly> {
    if grid.ndim() != 3 {
        return Err(SeasStatsError::UnexpectedDimensions {
            dims: grid.dim_names().iter().map(|s| s.to_string()).collect(),
        });
    }
    let (tdim, taxis) = grid
        .axis("time")
        .ok_or_else(|| SeasStatsError::NoSuchDimension("time".to_string()))?;
    let stamps: Vec<DateTime<Utc>> = taxis
        .values()
        .as_time()
        .ok_or_else(|| SeasStatsError::NotTimeAxis("time".to_string()))?
        .to_vec();
    let (latdim, lat_axis) = grid
        .axis("lat")
        .ok_or_else(|| SeasStatsError::NoSuchDimension("lat".to_string()))?;
    let lats = lat_axis
        .values()
        .as_numeric()
        .ok_or_else(|| SeasStatsError::UnexpectedDimensions {
            dims: grid.dim_names().iter().map(|s| s.to_string()).collect(),
        })?
        .to_vec();
    let (londim, lon_axis) = grid
        .axis("lon")
        .ok_or_else(|| SeasStatsError::NoSuchDimension("lon".to_string()))?;
    let n_lon = lon_axis.len();

    let n_time = stamps.len();
    let n_lat = lats.len();

    // zonal mean: collapse lon with a NaN-skipping mean
    let mut zonal = Array2::from_elem((n_time, n_lat), f64::NAN);
    let mut index = vec![0usize; 3];
    for t in 0..n_time {
        for la in 0..n_lat {
            let mut sum = 0.0;
            let mut count = 0usize;
            for lo in 0..n_lon {
                index[tdim] = t;
                index[latdim] = la;
                index[londim] = lo;
                if let Some(v) = grid.get(&index) {
                    if v.is_finite() {
                        sum += v;
                        count += 1;
                    }
                }
            }
            if count > 0 {
                zonal[(t, la)] = sum / count as f64;
            }
        }
    }

    // latitudes with no finite data anywhere drop out
    let kept: Vec<usize> = (0..n_lat)
        .filter(|&la| (0..n_time).any(|t| zonal[(t, la)].is_finite()))
        .collect();

    // per-latitude time mean, then the anomaly against it
    let lat_mean: Vec<f64> = kept
        .iter()
        .map(|&la| {
            let (sum, count) = (0..n_time)
                .filter_map(|t| {
                    let v = zonal[(t, la)];
                    v.is_finite().then_some(v)
                })
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            sum / count as f64
        })
        .collect();

    // annual means of the anomaly, [lat, year]
    let mut years: Vec<i32> = stamps.iter().map(Datelike::year).collect();
    years.dedup();
    let mut anomalies = Array2::from_elem((kept.len(), years.len()), f64::NAN);
    for (row, &la) in kept.iter().enumerate() {
        for (col, &year) in years.iter().enumerate() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for (t, stamp) in stamps.iter().enumerate() {
                if stamp.year() != year {
                    continue;
                }
                let v = zonal[(t, la)];
                if v.is_finite() {
                    sum += v - lat_mean[row];
                    count += 1;
                }
            }
            if count > 0 {
                anomalies[(row, col)] = sum / count as f64;
            }
        }
    }

    Ok(ZonalAnomaly {
        lat: kept.iter().map(|&la| lats[la]).collect(),
        lat_mean,
        years,
        anomalies,
    })
}
