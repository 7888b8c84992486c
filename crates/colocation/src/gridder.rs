//! Gridding of flat (point-indexed) records.
//!
//! The inverse-ish of colocation: scattered samples are grouped into grid
//! cells and aggregated. Variant A groups by exact coordinate value and
//! takes means; variant B bins against a prescribed target grid and
//! computes a configurable aggregate set.

use crate::bins::BinEdges;
use crate::error::{ColocationError, Result};
use grid_common::{Axis, CoordScalar, CoordValues, FlatTable, Grid, SparseDataset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Per-group aggregate statistics for the target-gridder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    /// NaN-skipping arithmetic mean.
    Mean,
    /// Sample standard deviation (ddof = 1); NaN below two finite values.
    Std,
    /// Number of finite values.
    Count,
}

impl Aggregator {
    /// The default aggregate set: mean, standard deviation, count.
    pub fn default_set() -> Vec<Aggregator> {
        vec![Self::Mean, Self::Std, Self::Count]
    }

    /// Name used in output field names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Count => "count",
        }
    }
}

impl std::fmt::Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running sums for one (group, column) cell.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    n: usize,
    sum: f64,
    sum_sq: f64,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        if value.is_finite() {
            self.n += 1;
            self.sum += value;
            self.sum_sq += value * value;
        }
    }

    fn mean(&self) -> f64 {
        if self.n == 0 {
            f64::NAN
        } else {
            self.sum / self.n as f64
        }
    }

    fn std(&self) -> f64 {
        if self.n < 2 {
            return f64::NAN;
        }
        let n = self.n as f64;
        let var = (self.sum_sq - self.sum * self.sum / n) / (n - 1.0);
        var.max(0.0).sqrt()
    }

    fn evaluate(&self, aggregator: Aggregator) -> f64 {
        match aggregator {
            Aggregator::Mean => self.mean(),
            Aggregator::Std => self.std(),
            Aggregator::Count => self.n as f64,
        }
    }
}

/// Grid flat data columns by the exact values of coordinate columns.
///
/// No binning happens: the output axes are the sorted distinct coordinate
/// values actually observed, and each data column is averaged per distinct
/// coordinate tuple. Rows with a NaN coordinate are dropped. All columns
/// must share one length.
pub fn grid_flat_data(
    data_columns: &[(String, Vec<f64>)],
    coord_columns: &[(String, CoordValues)],
) -> Result<SparseDataset> {
    if coord_columns.is_empty() {
        return Err(ColocationError::NoCoordinateColumns);
    }
    let n_rows = coord_columns[0].1.len();
    for (name, values) in coord_columns {
        if values.len() != n_rows {
            return Err(grid_common::GridError::length_mismatch(name, n_rows, values.len()).into());
        }
    }
    for (name, values) in data_columns {
        if values.len() != n_rows {
            return Err(grid_common::GridError::length_mismatch(name, n_rows, values.len()).into());
        }
    }

    // Axes are the observed distinct values; each row maps to its value's
    // position on every axis.
    let mut axes = Vec::with_capacity(coord_columns.len());
    let mut row_indices: Vec<Vec<Option<usize>>> = Vec::with_capacity(coord_columns.len());
    for (name, values) in coord_columns {
        let distinct = values.sorted_distinct();
        row_indices.push(
            (0..n_rows)
                .map(|row| values.get(row).and_then(|v| position_of(&distinct, &v)))
                .collect(),
        );
        axes.push(Axis::new(name.clone(), distinct)?);
    }

    let mut groups: HashMap<Vec<usize>, Vec<Accumulator>> = HashMap::new();
    for row in 0..n_rows {
        let index: Option<Vec<usize>> = row_indices.iter().map(|col| col[row]).collect();
        let Some(index) = index else { continue };
        let entry = groups
            .entry(index)
            .or_insert_with(|| vec![Accumulator::default(); data_columns.len()]);
        for (slot, (_, values)) in entry.iter_mut().zip(data_columns) {
            slot.push(values[row]);
        }
    }
    debug!(
        n_groups = groups.len(),
        n_rows, "grouped flat data by exact coordinates"
    );

    let mut out = SparseDataset::new(axes)?;
    for (index, accumulators) in groups {
        for ((name, _), acc) in data_columns.iter().zip(&accumulators) {
            out.insert(name, index.clone(), acc.mean())?;
        }
    }
    Ok(out)
}

/// Position of a value among sorted distinct values.
fn position_of(distinct: &CoordValues, value: &CoordScalar) -> Option<usize> {
    match (distinct, value) {
        (CoordValues::Numeric(d), CoordScalar::Numeric(v)) => {
            if v.is_nan() {
                return None;
            }
            d.binary_search_by(|c| c.partial_cmp(v).unwrap_or(std::cmp::Ordering::Less))
                .ok()
        }
        (CoordValues::Time(d), CoordScalar::Time(v)) => d.binary_search(v).ok(),
        _ => None,
    }
}

/// Grid a flat table onto a prescribed target grid.
///
/// Every target axis must appear as a column of the table with the same
/// value kind. Rows are binned against edges derived from the target's
/// centers; rows outside any bin are excluded. The remaining (non-axis)
/// columns must be numeric and are reduced per cell with the requested
/// aggregators, defaulting to [`Aggregator::default_set`]. Output fields
/// are named `{column}_{aggregator}`; cells empty across every aggregate
/// are dropped.
pub fn grid_flat_table_to_target(
    table: &FlatTable,
    target: &Grid,
    aggregators: &[Aggregator],
) -> Result<SparseDataset> {
    if aggregators.is_empty() {
        return Err(ColocationError::NoAggregators);
    }

    for axis in target.axes() {
        let column = table
            .column(axis.name())
            .ok_or_else(|| ColocationError::missing_column(axis.name()))?;
        if column.kind() != axis.kind() {
            return Err(ColocationError::ColumnKindMismatch {
                column: axis.name().to_string(),
                table: column.kind(),
                target: axis.kind(),
            });
        }
    }

    let axis_names: Vec<&str> = target.axes().iter().map(Axis::name).collect();
    let data_columns: Vec<(&str, &[f64])> = table
        .iter()
        .filter(|(name, _)| !axis_names.contains(name))
        .map(|(name, values)| match values {
            CoordValues::Numeric(v) => Ok((name, v.as_slice())),
            CoordValues::Time(_) => Err(ColocationError::NonNumericDataColumn {
                column: name.to_string(),
            }),
        })
        .collect::<Result<_>>()?;

    let edges: Vec<BinEdges> = target
        .axes()
        .iter()
        .map(|axis| BinEdges::from_centers(axis.values()))
        .collect::<Result<_>>()?;

    let n_rows = table.n_rows();
    let mut groups: HashMap<Vec<usize>, Vec<Accumulator>> = HashMap::new();
    for row in 0..n_rows {
        let index: Option<Vec<usize>> = target
            .axes()
            .iter()
            .zip(&edges)
            .map(|(axis, edges)| {
                table
                    .column(axis.name())
                    .and_then(|col| col.get(row))
                    .and_then(|v| edges.bin_index(&v))
            })
            .collect();
        let Some(index) = index else { continue };
        let entry = groups
            .entry(index)
            .or_insert_with(|| vec![Accumulator::default(); data_columns.len()]);
        for (slot, (_, values)) in entry.iter_mut().zip(&data_columns) {
            slot.push(values[row]);
        }
    }
    debug!(
        target_name = target.name(),
        n_groups = groups.len(),
        n_rows,
        "binned flat table onto target grid"
    );

    let mut out = SparseDataset::new(target.axes().to_vec())?;
    for (index, accumulators) in groups {
        let values: Vec<(String, f64)> = data_columns
            .iter()
            .zip(&accumulators)
            .flat_map(|((name, _), acc)| {
                aggregators
                    .iter()
                    .map(|agg| (format!("{name}_{agg}"), acc.evaluate(*agg)))
            })
            .collect();
        // cells empty across every aggregate are dropped
        if values.iter().all(|(_, v)| v.is_nan()) {
            continue;
        }
        for (field, value) in values {
            out.insert(&field, index.clone(), value)?;
        }
    }
    Ok(out)
}
