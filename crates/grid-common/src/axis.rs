//! Named coordinate axes.

use crate::coords::{CoordKind, CoordScalar, CoordValues};
use crate::error::{GridError, Result};
use std::ops::Range;

/// A named, ordered sequence of coordinate centers.
///
/// Centers must be strictly increasing; constructors reject anything else.
/// Empty axes are allowed (they arise from range restrictions that cover no
/// centers).
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    values: CoordValues,
}

impl Axis {
    /// Create an axis from coordinate values.
    pub fn new(name: impl Into<String>, values: CoordValues) -> Result<Self> {
        let name = name.into();
        if !values.is_strictly_increasing() {
            return Err(GridError::NotMonotonic { axis: name });
        }
        Ok(Self { name, values })
    }

    /// Create a numeric axis.
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        Self::new(name, CoordValues::Numeric(values))
    }

    /// Create a datetime axis.
    pub fn time(name: impl Into<String>, values: Vec<chrono::DateTime<chrono::Utc>>) -> Result<Self> {
        Self::new(name, CoordValues::Time(values))
    }

    /// The axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the centers.
    pub fn kind(&self) -> CoordKind {
        self.values.kind()
    }

    /// Number of centers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the axis holds no centers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The center values.
    pub fn values(&self) -> &CoordValues {
        &self.values
    }

    /// A copy of this axis under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Axis {
        Axis {
            name: name.into(),
            values: self.values.clone(),
        }
    }

    /// A contiguous sub-axis.
    pub fn slice_range(&self, range: Range<usize>) -> Axis {
        Axis {
            name: self.name.clone(),
            values: self.values.slice_range(range),
        }
    }

    /// Index range of centers within `[min, max]` (both inclusive).
    ///
    /// This is the labeled-range restriction used before loading: the
    /// returned half-open index range covers exactly the centers `c` with
    /// `min <= c <= max`. Fails when the bound kind does not match the axis.
    pub fn range_indices(&self, min: &CoordScalar, max: &CoordScalar) -> Result<Range<usize>> {
        match (&self.values, min, max) {
            (CoordValues::Numeric(v), CoordScalar::Numeric(lo), CoordScalar::Numeric(hi)) => {
                let start = v.partition_point(|c| c < lo);
                let end = v.partition_point(|c| c <= hi);
                Ok(start..end.max(start))
            }
            (CoordValues::Time(v), CoordScalar::Time(lo), CoordScalar::Time(hi)) => {
                let start = v.partition_point(|c| c < lo);
                let end = v.partition_point(|c| c <= hi);
                Ok(start..end.max(start))
            }
            _ => Err(GridError::kind_mismatch(
                self.name.clone(),
                self.kind(),
                min.kind(),
            )),
        }
    }
}
