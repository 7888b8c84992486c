//! The individual conform transforms.
//!
//! Every transform is a pure `Grid -> Result<Grid>` function. Transforms
//! tied to a named dimension are no-ops when that dimension is absent;
//! only `time_center_monthly` can fail on a present-but-wrong axis.

use crate::error::{ConformError, Result};
use crate::names::{default_match_table, guess_coord_renames};
use chrono::{DateTime, Utc};
use grid_common::{time, CoordValues, Grid};
use ndarray::{ArrayD, Axis as NdAxis, IxDyn};
use tracing::debug;

/// Canonical dimension order used by [`transpose_dims`].
pub const CANONICAL_DIM_ORDER: [&str; 4] = ["time", "depth", "lat", "lon"];

/// Rename coordinates to `[time, depth, lat, lon]` with fuzzy matching.
pub fn correct_coord_names(grid: Grid) -> Result<Grid> {
    let names = grid.dim_names();
    let renames = guess_coord_renames(&names, &default_match_table());
    if renames.is_empty() {
        return Ok(grid);
    }
    debug!(?renames, "renaming coordinates to canonical names");
    Ok(grid.rename_dims(&renames)?)
}

/// Remap longitudes from `[0 : 360]` to `[-180 : 180]` and re-sort.
pub fn lon_180w_180e(grid: Grid, lon_name: &str) -> Result<Grid> {
    remap_lon(grid, lon_name, |v| ((v - 180.0).rem_euclid(360.0)) - 180.0)
}

/// Remap longitudes from `[-180 : 180]` to `[0 : 360]` and re-sort.
pub fn lon_0e_360e(grid: Grid, lon_name: &str) -> Result<Grid> {
    remap_lon(grid, lon_name, |v| v.rem_euclid(360.0))
}

fn remap_lon(grid: Grid, lon_name: &str, f: impl Fn(f64) -> f64) -> Result<Grid> {
    let current: Option<Vec<f64>> = grid
        .axis(lon_name)
        .and_then(|(_, axis)| axis.values().as_numeric().map(<[f64]>::to_vec));
    let Some(current) = current else {
        return Ok(grid);
    };
    let remapped: Vec<f64> = current.iter().copied().map(f).collect();
    if remapped == current {
        return Ok(grid);
    }
    Ok(grid.assign_coords_sorted(lon_name, CoordValues::Numeric(remapped))?)
}

/// Transpose dimensions to `[time, depth, lat, lon]`, missing names
/// skipped; remaining dimensions go before (default) or after.
pub fn transpose_dims(grid: Grid, other_dims_before: bool) -> Result<Grid> {
    let names = grid.dim_names();
    let canonical: Vec<usize> = CANONICAL_DIM_ORDER
        .iter()
        .filter_map(|want| names.iter().position(|n| n == want))
        .collect();
    let other: Vec<usize> = (0..names.len()).filter(|i| !canonical.contains(i)).collect();

    let order: Vec<usize> = if other_dims_before {
        other.into_iter().chain(canonical).collect()
    } else {
        canonical.into_iter().chain(other).collect()
    };
    if order.iter().enumerate().all(|(i, &o)| i == o) {
        return Ok(grid);
    }
    Ok(grid.transpose_to(&order)?)
}

/// Center a monthly time axis on a given day of the month.
///
/// Fails when the time axis exists but is not at strict monthly resolution
/// (every stamp midnight on the 1st). Absent time axes pass through.
pub fn time_center_monthly(grid: Grid, center_day: u32, time_name: &str) -> Result<Grid> {
    if grid.axis(time_name).is_none() {
        return Ok(grid);
    }
    let stamps: Option<Vec<DateTime<Utc>>> = grid
        .axis(time_name)
        .and_then(|(_, axis)| axis.values().as_time().map(<[DateTime<Utc>]>::to_vec));
    let Some(stamps) = stamps else {
        return Err(ConformError::NotMonthly {
            name: grid.name().to_string(),
        });
    };
    if !time::is_month_start_cadence(&stamps) {
        return Err(ConformError::NotMonthly {
            name: grid.name().to_string(),
        });
    }
    let centered: Vec<_> = stamps
        .iter()
        .map(|&t| time::centered_on_day(t, center_day))
        .collect();
    Ok(grid.assign_coords_sorted(time_name, CoordValues::Time(centered))?)
}

/// Interpolate data whose 1-degree grid centers sit off the desired
/// sub-degree center.
///
/// Only grids carrying all of `time`, `lat`, and `lon` are touched, and
/// only when the named coordinate's fractional parts differ from `center`.
pub fn coord_center_offset(grid: Grid, center: f64, coord_name: &str) -> Result<Grid> {
    let has_canonical = ["time", "lat", "lon"]
        .iter()
        .all(|name| grid.axis(name).is_some());
    if !has_canonical {
        return Ok(grid);
    }
    let coord: Option<(usize, Vec<f64>)> = grid
        .axis(coord_name)
        .and_then(|(dim, axis)| axis.values().as_numeric().map(|v| (dim, v.to_vec())));
    let Some((dim, xs)) = coord else {
        return Ok(grid);
    };

    let center = center - center.floor();
    if xs.iter().all(|v| v - v.floor() == center) {
        return Ok(grid);
    }
    let new_values: Vec<f64> = xs.iter().map(|v| v + center).collect();
    debug!(coord_name, center, "interpolating offset grid centers");
    interp_along(grid, dim, &xs, &new_values)
}

/// Linear interpolation of the grid along one dimension onto new centers.
///
/// `xs` are the current centers of that dimension. Positions outside the
/// source range come out NaN; NaN neighbors propagate into the
/// interpolated value.
fn interp_along(grid: Grid, dim: usize, xs: &[f64], new_values: &[f64]) -> Result<Grid> {
    let axis = &grid.axes()[dim];

    let mut shape = grid.shape().to_vec();
    shape[dim] = new_values.len();
    let mut out = ArrayD::from_elem(IxDyn(&shape), f64::NAN);

    for (k, &x) in new_values.iter().enumerate() {
        if xs.is_empty() || x < xs[0] || x > xs[xs.len() - 1] {
            continue;
        }
        let upper = xs.partition_point(|&c| c < x);
        let mut slot = out.index_axis_mut(NdAxis(dim), k);
        if upper < xs.len() && xs[upper] == x {
            slot.assign(&grid.data().index_axis(NdAxis(dim), upper));
            continue;
        }
        let (i0, i1) = (upper - 1, upper);
        let w1 = (x - xs[i0]) / (xs[i1] - xs[i0]);
        let w0 = 1.0 - w1;
        let lo = grid.data().index_axis(NdAxis(dim), i0);
        let hi = grid.data().index_axis(NdAxis(dim), i1);
        slot.assign(&(&lo * w0 + &hi * w1));
    }

    let mut axes = grid.axes().to_vec();
    axes[dim] = grid_common::Axis::numeric(axis.name(), new_values.to_vec())?;
    let name = grid.name().to_string();
    let attrs = grid.attrs().clone();
    let mut result = Grid::new(name, axes, out)?;
    for (key, value) in attrs {
        result.set_attr(key, value);
    }
    Ok(result)
}

/// Normalize the variable name to snake_case.
pub fn rename_snake_case(mut grid: Grid) -> Result<Grid> {
    let snake = to_snake_case(grid.name());
    if snake != grid.name() {
        grid.set_name(snake);
    }
    Ok(grid)
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == ' ' || c == '-' || c == '.' {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
