//! Error types for the labeled-grid data model.

use crate::coords::CoordKind;
use thiserror::Error;

/// Errors raised by the shared data model.
#[derive(Error, Debug)]
pub enum GridError {
    /// Axis centers must be strictly increasing.
    #[error("axis {axis} is not strictly increasing")]
    NotMonotonic { axis: String },

    /// Axis lengths do not match the data shape.
    #[error("axis lengths {axis_lens:?} do not match data shape {shape:?}")]
    ShapeMismatch {
        axis_lens: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Two columns or arrays that must be equally long are not.
    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// A named dimension does not exist.
    #[error("no dimension named {0}")]
    NoSuchDimension(String),

    /// Two dimensions would share a name.
    #[error("duplicate dimension name {0}")]
    DuplicateDimension(String),

    /// A numeric value met a datetime axis or vice versa.
    #[error("{name}: expected {expected} values, got {actual}")]
    KindMismatch {
        name: String,
        expected: CoordKind,
        actual: CoordKind,
    },

    /// A cell index points outside the grid shape.
    #[error("index {index:?} is out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Calendar years hold differing numbers of samples.
    #[error("time axis is not evenly sampled: per-year step counts {counts:?}")]
    UnevenYears { counts: Vec<usize> },

    /// A timestamp cannot be represented as integer nanoseconds.
    #[error("timestamp out of the representable nanosecond range")]
    TimeOutOfRange,
}

impl GridError {
    /// Create a LengthMismatch error.
    pub fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create a KindMismatch error.
    pub fn kind_mismatch(name: impl Into<String>, expected: CoordKind, actual: CoordKind) -> Self {
        Self::KindMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}

/// Result type for data-model operations.
pub type Result<T> = std::result::Result<T, GridError>;
