//! Resolve point-sampled coordinates against a reference grid.

use crate::bins::BinEdges;
use crate::config::ColocationConfig;
use crate::error::{ColocationError, Result};
use crate::matcher::match_queries;
use crate::source::GridSource;
use grid_common::CoordValues;
use ndarray::{ArrayD, Axis as NdAxis, IxDyn, SliceInfoElem};
use std::ops::Range;
use tracing::debug;

/// Colocate query points against a target grid.
///
/// For each query row the target is resolved at the cell whose bin covers
/// the row's coordinates; rows falling outside the covered range come back
/// NaN. The target is restricted to the bounding range of the queries and
/// only that restriction is materialized, guarded by
/// [`ColocationConfig::max_cells`].
///
/// The first output axis is the query length. Axes of the target that no
/// query names are passed through in full and follow as extra output
/// dimensions, in target order. Call [`colocate_values`] when every target
/// dimension is queried and a flat `Vec<f64>` is wanted.
///
/// # Errors
///
/// Precondition violations (unknown names, length or kind mismatches) and
/// an oversized restriction all fail before any data is loaded. A query
/// range that covers no target cells is *not* an error: the result is
/// all-NaN with shape `[query_len]`.
pub fn colocate<S>(
    source: &S,
    queries: &[(String, CoordValues)],
    config: &ColocationConfig,
) -> Result<ArrayD<f64>>
where
    S: GridSource + ?Sized,
{
    let axes = source.axes();
    let n_rows = match_queries(source.name(), axes, queries)?;

    // Bounding index range per axis; unqueried axes pass through in full.
    let mut ranges: Vec<Range<usize>> = Vec::with_capacity(axes.len());
    for axis in axes {
        let range = match queries.iter().find(|(name, _)| name == axis.name()) {
            Some((_, values)) => match values.finite_min_max() {
                Some((min, max)) => axis
                    .range_indices(&min, &max)
                    .map_err(ColocationError::from)?,
                None => 0..0,
            },
            None => 0..axis.len(),
        };
        ranges.push(range);
    }

    let cells: u128 = ranges.iter().map(|r| r.len() as u128).product();
    if cells > config.max_cells as u128 {
        return Err(ColocationError::RangeTooLarge {
            name: source.name().to_string(),
            shape: axes.iter().map(|a| a.len()).collect(),
            cells,
            max_cells: config.max_cells,
        });
    }
    if cells == 0 {
        debug!(
            target_name = source.name(),
            "no data within the query ranges, returning NaN"
        );
        return Ok(ArrayD::from_elem(IxDyn(&[n_rows]), f64::NAN));
    }

    debug!(target_name = source.name(), cells, "loading restricted target");
    let restricted = source.load_ranges(&ranges)?;

    debug!(target_name = source.name(), "building bins");
    // Per dimension: the binned query indices, or None for unqueried dims.
    let mut dim_bins: Vec<Option<Vec<Option<usize>>>> =
        Vec::with_capacity(restricted.ndim());
    for axis in restricted.axes() {
        match queries.iter().find(|(name, _)| name == axis.name()) {
            Some((_, values)) => {
                let edges = BinEdges::from_centers(axis.values())?;
                let binned = (0..values.len())
                    .map(|i| values.get(i).and_then(|v| edges.bin_index(&v)))
                    .collect();
                dim_bins.push(Some(binned));
            }
            None => dim_bins.push(None),
        }
    }

    debug!(target_name = source.name(), "gathering values");
    let extra_shape: Vec<usize> = restricted
        .axes()
        .iter()
        .zip(&dim_bins)
        .filter(|(_, bins)| bins.is_none())
        .map(|(axis, _)| axis.len())
        .collect();
    let mut out_shape = vec![n_rows];
    out_shape.extend(&extra_shape);
    let mut out = ArrayD::from_elem(IxDyn(&out_shape), f64::NAN);

    let mut info: Vec<SliceInfoElem> = Vec::with_capacity(restricted.ndim());
    for row in 0..n_rows {
        info.clear();
        let mut valid = true;
        for bins in &dim_bins {
            match bins {
                Some(binned) => match binned[row] {
                    Some(idx) => info.push(SliceInfoElem::Index(idx as isize)),
                    None => {
                        valid = false;
                        break;
                    }
                },
                None => info.push(SliceInfoElem::Slice {
                    start: 0,
                    end: None,
                    step: 1,
                }),
            }
        }
        if !valid {
            // out-of-range row, stays NaN
            continue;
        }
        let view = restricted.data().slice(info.as_slice());
        out.index_axis_mut(NdAxis(0), row).assign(&view);
    }

    Ok(out)
}

/// Colocate and flatten to one value per query row.
///
/// Fails with [`ColocationError::UnqueriedDimensions`] when the target has
/// dimensions no query names; use [`colocate`] to keep those.
pub fn colocate_values<S>(
    source: &S,
    queries: &[(String, CoordValues)],
    config: &ColocationConfig,
) -> Result<Vec<f64>>
where
    S: GridSource + ?Sized,
{
    match_queries(source.name(), source.axes(), queries)?;
    let unqueried: Vec<String> = source
        .axes()
        .iter()
        .filter(|a| !queries.iter().any(|(name, _)| name == a.name()))
        .map(|a| a.name().to_string())
        .collect();
    if !unqueried.is_empty() {
        return Err(ColocationError::UnqueriedDimensions {
            target: source.name().to_string(),
            dims: unqueried,
        });
    }
    let out = colocate(source, queries, config)?;
    Ok(out.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::{Axis, Grid};

    fn lat_grid() -> Grid {
        Grid::new(
            "sst",
            vec![Axis::numeric("lat", vec![-1.0, 0.0, 1.0]).unwrap()],
            ArrayD::from_shape_vec(IxDyn(&[3]), vec![10.0, 20.0, 30.0]).unwrap(),
        )
        .unwrap()
    }

    fn query(name: &str, values: Vec<f64>) -> Vec<(String, CoordValues)> {
        vec![(name.to_string(), CoordValues::Numeric(values))]
    }

    #[test]
    fn test_lat_lookup_and_out_of_range() {
        let grid = lat_grid();
        let config = ColocationConfig::default();

        let out = colocate_values(&grid, &query("lat", vec![-1.0, 1.0]), &config).unwrap();
        assert_eq!(out, vec![10.0, 30.0]);

        let out = colocate_values(&grid, &query("lat", vec![5.0]), &config).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_nan());
    }

    #[test]
    fn test_between_centers_is_empty_range() {
        // [0.3, 0.4] covers no centers: the restriction is empty and the
        // result is NaN rather than an error
        let grid = lat_grid();
        let out = colocate_values(
            &grid,
            &query("lat", vec![0.3, 0.4]),
            &ColocationConfig::default(),
        )
        .unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_range_too_large() {
        let grid = lat_grid();
        let config = ColocationConfig { max_cells: 2 };
        let err = colocate_values(&grid, &query("lat", vec![-1.0, 1.0]), &config);
        assert!(matches!(err, Err(ColocationError::RangeTooLarge { .. })));
    }

    #[test]
    fn test_unqueried_dimension_passthrough() {
        let grid = Grid::new(
            "tmp",
            vec![
                Axis::numeric("lat", vec![0.0, 1.0]).unwrap(),
                Axis::numeric("lon", vec![0.0, 1.0, 2.0]).unwrap(),
            ],
            ArrayD::from_shape_vec(
                IxDyn(&[2, 3]),
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            )
            .unwrap(),
        )
        .unwrap();
        let config = ColocationConfig::default();

        // lon stays: one row per query, lon follows in full
        let out = colocate(&grid, &query("lat", vec![1.0, 0.0]), &config).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out[[0, 0]], 4.0);
        assert_eq!(out[[1, 2]], 3.0);

        // the flattening wrapper refuses the extra dimension
        let err = colocate_values(&grid, &query("lat", vec![1.0]), &config);
        assert!(matches!(
            err,
            Err(ColocationError::UnqueriedDimensions { .. })
        ));
    }

    #[test]
    fn test_nan_query_row_is_nan() {
        let grid = lat_grid();
        let out = colocate_values(
            &grid,
            &query("lat", vec![f64::NAN, 0.0]),
            &ColocationConfig::default(),
        )
        .unwrap();
        assert!(out[0].is_nan());
        assert_eq!(out[1], 20.0);
    }
}
