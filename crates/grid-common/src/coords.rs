//! Coordinate value containers.
//!
//! Axes hold either numeric (`f64`) or datetime (`DateTime<Utc>`) centers,
//! mirroring the plain vs. `datetime64[ns]` split in gridded geoscience
//! files. No other coordinate dtype is supported; mixing kinds on one axis
//! is unrepresentable by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The kind of values a coordinate axis holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordKind {
    /// Plain floating-point coordinates (degrees, metres, ...).
    Numeric,
    /// Datetime coordinates with nanosecond precision.
    Time,
}

impl std::fmt::Display for CoordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// A single coordinate value of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordScalar {
    Numeric(f64),
    Time(DateTime<Utc>),
}

impl CoordScalar {
    /// The kind of this value.
    pub fn kind(&self) -> CoordKind {
        match self {
            Self::Numeric(_) => CoordKind::Numeric,
            Self::Time(_) => CoordKind::Time,
        }
    }
}

/// An ordered sequence of coordinate values of one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    Numeric(Vec<f64>),
    Time(Vec<DateTime<Utc>>),
}

impl CoordValues {
    /// The kind of the contained values.
    pub fn kind(&self) -> CoordKind {
        match self {
            Self::Numeric(_) => CoordKind::Numeric,
            Self::Time(_) => CoordKind::Time,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Time(v) => v.len(),
        }
    }

    /// Check whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the value at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<CoordScalar> {
        match self {
            Self::Numeric(v) => v.get(index).copied().map(CoordScalar::Numeric),
            Self::Time(v) => v.get(index).copied().map(CoordScalar::Time),
        }
    }

    /// View the numeric values, if this is a numeric sequence.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric(v) => Some(v),
            Self::Time(_) => None,
        }
    }

    /// View the datetime values, if this is a time sequence.
    pub fn as_time(&self) -> Option<&[DateTime<Utc>]> {
        match self {
            Self::Numeric(_) => None,
            Self::Time(v) => Some(v),
        }
    }

    /// Convert datetime values to integer nanoseconds since the epoch.
    ///
    /// Returns `None` for numeric sequences or when a timestamp falls
    /// outside the representable nanosecond range (~1677..2262).
    pub fn to_nanos(&self) -> Option<Vec<i64>> {
        match self {
            Self::Numeric(_) => None,
            Self::Time(v) => v.iter().map(|t| t.timestamp_nanos_opt()).collect(),
        }
    }

    /// Check that values are strictly increasing.
    ///
    /// Vacuously true for sequences shorter than two; false when any
    /// numeric value is NaN.
    pub fn is_strictly_increasing(&self) -> bool {
        match self {
            Self::Numeric(v) => {
                !v.iter().any(|x| x.is_nan()) && v.windows(2).all(|w| w[0] < w[1])
            }
            Self::Time(v) => v.windows(2).all(|w| w[0] < w[1]),
        }
    }

    /// Minimum and maximum over the finite values, ignoring NaN.
    ///
    /// Returns `None` when no finite value exists.
    pub fn finite_min_max(&self) -> Option<(CoordScalar, CoordScalar)> {
        match self {
            Self::Numeric(v) => {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                let mut seen = false;
                for &x in v {
                    if x.is_nan() {
                        continue;
                    }
                    seen = true;
                    min = min.min(x);
                    max = max.max(x);
                }
                seen.then(|| (CoordScalar::Numeric(min), CoordScalar::Numeric(max)))
            }
            Self::Time(v) => {
                let min = v.iter().min()?;
                let max = v.iter().max()?;
                Some((CoordScalar::Time(*min), CoordScalar::Time(*max)))
            }
        }
    }

    /// Take a contiguous sub-range of the values.
    pub fn slice_range(&self, range: Range<usize>) -> CoordValues {
        match self {
            Self::Numeric(v) => Self::Numeric(v[range].to_vec()),
            Self::Time(v) => Self::Time(v[range].to_vec()),
        }
    }

    /// Take values at the given positions, in the given order.
    pub fn select(&self, indices: &[usize]) -> CoordValues {
        match self {
            Self::Numeric(v) => Self::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Self::Time(v) => Self::Time(indices.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Sorted distinct values, dropping non-finite numerics.
    pub fn sorted_distinct(&self) -> CoordValues {
        match self {
            Self::Numeric(v) => {
                let mut out: Vec<f64> = v.iter().copied().filter(|x| x.is_finite()).collect();
                out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                out.dedup();
                Self::Numeric(out)
            }
            Self::Time(v) => {
                let mut out = v.clone();
                out.sort();
                out.dedup();
                Self::Time(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_and_len() {
        let n = CoordValues::Numeric(vec![1.0, 2.0]);
        assert_eq!(n.kind(), CoordKind::Numeric);
        assert_eq!(n.len(), 2);

        let t = CoordValues::Time(vec![Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()]);
        assert_eq!(t.kind(), CoordKind::Time);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_strictly_increasing() {
        assert!(CoordValues::Numeric(vec![-1.0, 0.0, 1.0]).is_strictly_increasing());
        assert!(!CoordValues::Numeric(vec![0.0, 0.0]).is_strictly_increasing());
        assert!(!CoordValues::Numeric(vec![1.0, f64::NAN]).is_strictly_increasing());
        assert!(CoordValues::Numeric(vec![]).is_strictly_increasing());
    }

    #[test]
    fn test_finite_min_max_skips_nan() {
        let v = CoordValues::Numeric(vec![f64::NAN, 3.0, -2.0]);
        let (min, max) = v.finite_min_max().unwrap();
        assert_eq!(min, CoordScalar::Numeric(-2.0));
        assert_eq!(max, CoordScalar::Numeric(3.0));

        assert!(CoordValues::Numeric(vec![f64::NAN]).finite_min_max().is_none());
    }

    #[test]
    fn test_sorted_distinct() {
        let v = CoordValues::Numeric(vec![2.0, 1.0, 2.0, f64::NAN, 0.5]);
        assert_eq!(
            v.sorted_distinct(),
            CoordValues::Numeric(vec![0.5, 1.0, 2.0])
        );
    }

    #[test]
    fn test_to_nanos_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2000, 2, 1, 0, 0, 0).unwrap();
        let nanos = CoordValues::Time(vec![t0, t1]).to_nanos().unwrap();
        assert_eq!(nanos[1] - nanos[0], 31 * 24 * 3600 * 1_000_000_000i64);
    }
}
