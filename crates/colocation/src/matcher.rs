//! Validation of query coordinates against a target's axes.

use crate::error::{ColocationError, Result};
use grid_common::{Axis, CoordValues};

/// Validate a set of named query coordinate arrays against a target's axes.
///
/// Checks, in order: at least one query; every query name is a dimension of
/// the target (failure lists every unmatched name); all query arrays have
/// the same length; every query's value kind matches its axis (failure
/// lists every offender with both kinds). Returns the common query length.
pub fn match_queries(
    target: &str,
    axes: &[Axis],
    queries: &[(String, CoordValues)],
) -> Result<usize> {
    if queries.is_empty() {
        return Err(ColocationError::NoQueryCoordinates);
    }

    let unmatched: Vec<String> = queries
        .iter()
        .filter(|(name, _)| !axes.iter().any(|a| a.name() == name))
        .map(|(name, _)| name.clone())
        .collect();
    if !unmatched.is_empty() {
        return Err(ColocationError::UnmatchedNames {
            target: target.to_string(),
            names: unmatched,
        });
    }

    let first_len = queries[0].1.len();
    if queries.iter().any(|(_, v)| v.len() != first_len) {
        return Err(ColocationError::QueryLengthMismatch {
            lengths: queries
                .iter()
                .map(|(name, v)| (name.clone(), v.len()))
                .collect(),
        });
    }

    let mismatches: Vec<String> = queries
        .iter()
        .filter_map(|(name, values)| {
            let axis = axes.iter().find(|a| a.name() == name)?;
            (axis.kind() != values.kind())
                .then(|| format!("{name}: [{}, {}]", axis.kind(), values.kind()))
        })
        .collect();
    if !mismatches.is_empty() {
        return Err(ColocationError::QueryKindMismatch {
            target: target.to_string(),
            mismatches,
        });
    }

    Ok(first_len)
}
