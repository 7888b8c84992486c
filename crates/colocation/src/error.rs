//! Error types for colocation and flat gridding.

use grid_common::{CoordKind, GridError};
use thiserror::Error;

/// Errors raised while matching, binning, or gridding.
///
/// Everything here is a precondition violation or a resource guard; there
/// are no retries and no partial results. Queries that merely fall outside
/// the covered range are *not* errors (they come back NaN).
#[derive(Error, Debug)]
pub enum ColocationError {
    /// No query coordinate was supplied.
    #[error("at least one query coordinate is required")]
    NoQueryCoordinates,

    /// Query names that are not dimensions of the target.
    #[error("query coordinates are not dimensions of {target}: {names:?}")]
    UnmatchedNames { target: String, names: Vec<String> },

    /// Query coordinate arrays differ in length.
    #[error("all query coordinates must be the same length: {lengths:?}")]
    QueryLengthMismatch { lengths: Vec<(String, usize)> },

    /// Query value kinds differ from the target's axis kinds.
    #[error("query coordinates do not match the kinds of {target}: {mismatches:?}")]
    QueryKindMismatch {
        target: String,
        mismatches: Vec<String>,
    },

    /// The restricted target would exceed the cell ceiling.
    #[error(
        "the query range is too large to load for {name} with shape {shape:?}: \
         {cells} cells exceeds the ceiling of {max_cells}"
    )]
    RangeTooLarge {
        name: String,
        shape: Vec<usize>,
        cells: u128,
        max_cells: usize,
    },

    /// `colocate_values` was asked to flatten a result with extra dimensions.
    #[error("result for {target} keeps unqueried dimensions {dims:?}")]
    UnqueriedDimensions { target: String, dims: Vec<String> },

    /// Internal invariant: edges must outnumber centers by one.
    #[error("bins must be one longer than centers: {n_edges} edges for {n_centers} centers")]
    BinCountInvariant { n_edges: usize, n_centers: usize },

    /// Bins cannot be derived from an axis without centers.
    #[error("cannot build bins for an empty axis")]
    EmptyAxis,

    /// A target axis has no column in the flat table.
    #[error("{column} is not a column in the flat table")]
    MissingColumn { column: String },

    /// A flat-table column and the target axis disagree on value kind.
    #[error("{column} is {table} in the flat table but {target} on the target grid")]
    ColumnKindMismatch {
        column: String,
        table: CoordKind,
        target: CoordKind,
    },

    /// Aggregation is defined for numeric data columns only.
    #[error("data column {column} must be numeric to aggregate")]
    NonNumericDataColumn { column: String },

    /// No aggregator was requested.
    #[error("at least one aggregator is required")]
    NoAggregators,

    /// No coordinate column was supplied to the flat gridder.
    #[error("at least one coordinate column is required")]
    NoCoordinateColumns,

    /// Underlying data-model error.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ColocationError {
    /// Create a MissingColumn error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

/// Result type for colocation operations.
pub type Result<T> = std::result::Result<T, ColocationError>;
