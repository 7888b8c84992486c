//! Bin-edge construction from axis centers.
//!
//! Edges partition a continuous axis into half-open cells aligned to the
//! given centers: center `i` lies in `(edge[i], edge[i+1]]`. Spacing is the
//! mean of consecutive center gaps, so mildly uneven axes (e.g. monthly
//! timestamps) still get usable cells. Datetime centers go through integer
//! nanoseconds and back.

use crate::error::{ColocationError, Result};
use grid_common::{CoordScalar, CoordValues};

/// Half-width used when an axis holds a single center and no spacing can be
/// estimated: 0.5 in axis units.
const SINGLE_CENTER_HALF_WIDTH: f64 = 0.5;

/// Half-width for a single datetime center: 12 hours in nanoseconds.
const SINGLE_CENTER_HALF_WIDTH_NS: i64 = 12 * 3600 * 1_000_000_000;

#[derive(Debug, Clone)]
enum EdgeValues {
    Numeric(Vec<f64>),
    /// Nanoseconds since the epoch.
    Time(Vec<i64>),
}

/// Interval edges derived from a sequence of axis centers.
///
/// Always one longer than the centers it was built from; never stored, only
/// derived where binning happens.
#[derive(Debug, Clone)]
pub struct BinEdges {
    edges: EdgeValues,
}

impl BinEdges {
    /// Derive `N + 1` edges from `N` strictly increasing centers.
    ///
    /// The first and last edge extend half a mean spacing beyond the
    /// outermost centers. Fails on empty input, on timestamps outside the
    /// nanosecond range, and (internal invariant) when the edge count does
    /// not come out one longer than the centers.
    pub fn from_centers(centers: &CoordValues) -> Result<Self> {
        if centers.is_empty() {
            return Err(ColocationError::EmptyAxis);
        }
        let edges = match centers {
            CoordValues::Numeric(v) => {
                let n = v.len();
                let dx = if n >= 2 {
                    (v[n - 1] - v[0]) / (n - 1) as f64
                } else {
                    SINGLE_CENTER_HALF_WIDTH * 2.0
                };
                let start = v[0] - dx / 2.0;
                let stop = v[n - 1] + dx / 2.0;
                let mut edges: Vec<f64> = (0..n)
                    .map(|i| start + i as f64 * (stop - start) / n as f64)
                    .collect();
                edges.push(stop);
                EdgeValues::Numeric(edges)
            }
            CoordValues::Time(_) => {
                let nanos = centers.to_nanos().ok_or(grid_common::GridError::TimeOutOfRange)?;
                let n = nanos.len();
                let dt = if n >= 2 {
                    (((nanos[n - 1] as i128) - (nanos[0] as i128)) / (n as i128 - 1)) as i64
                } else {
                    SINGLE_CENTER_HALF_WIDTH_NS * 2
                };
                let start = nanos[0] - dt / 2;
                let edges: Vec<i64> = (0..=n).map(|i| start + i as i64 * dt).collect();
                EdgeValues::Time(edges)
            }
        };
        let out = Self { edges };
        if out.n_edges() != centers.len() + 1 {
            return Err(ColocationError::BinCountInvariant {
                n_edges: out.n_edges(),
                n_centers: centers.len(),
            });
        }
        Ok(out)
    }

    fn n_edges(&self) -> usize {
        match &self.edges {
            EdgeValues::Numeric(e) => e.len(),
            EdgeValues::Time(e) => e.len(),
        }
    }

    /// Number of bins (one fewer than edges).
    pub fn n_bins(&self) -> usize {
        self.n_edges() - 1
    }

    /// Numeric edges, when this axis is numeric.
    pub fn numeric_edges(&self) -> Option<&[f64]> {
        match &self.edges {
            EdgeValues::Numeric(e) => Some(e),
            EdgeValues::Time(_) => None,
        }
    }

    /// Resolve a value to its bin index.
    ///
    /// Follows the `(lo, hi]` convention: a value equal to the lowest edge
    /// is outside. Returns `None` for out-of-range values, NaN, and
    /// kind mismatches (the coordinate matcher rules those out upstream).
    pub fn bin_index(&self, value: &CoordScalar) -> Option<usize> {
        match (&self.edges, value) {
            (EdgeValues::Numeric(edges), CoordScalar::Numeric(v)) => {
                if v.is_nan() {
                    return None;
                }
                let p = edges.partition_point(|e| e < v);
                (p > 0 && p < edges.len()).then(|| p - 1)
            }
            (EdgeValues::Time(edges), CoordScalar::Time(t)) => {
                let v = t.timestamp_nanos_opt()?;
                let p = edges.partition_point(|e| *e < v);
                (p > 0 && p < edges.len()).then(|| p - 1)
            }
            _ => None,
        }
    }
}
