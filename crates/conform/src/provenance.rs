//! Provenance stamping for conform transforms.
//!
//! Each successful transform appends one line to the semicolon-delimited
//! `history` attribute: `[gm<.version>@<yymmdd>] <description>`. The version
//! is threaded in explicitly rather than read from global package state.

use crate::error::Result;
use chrono::Utc;
use grid_common::{Grid, HISTORY_ATTR};

/// Writer of history lines with a fixed package token and version.
#[derive(Debug, Clone)]
pub struct Provenance {
    version: String,
}

impl Provenance {
    /// Create a provenance writer for the given version string. An empty
    /// version drops the `.version` part of the prefix.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// A provenance writer carrying this crate's own version.
    pub fn crate_version() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }

    /// Format one history line for `description`.
    pub fn stamp(&self, description: &str) -> String {
        let version = if self.version.is_empty() {
            String::new()
        } else {
            format!(".{}", self.version)
        };
        let date = Utc::now().format("%y%m%d");
        format!("[gm{version}@{date}] {description}")
    }

    /// Append a stamped line to the grid's history attribute.
    pub fn append(&self, grid: &mut Grid, description: &str) {
        let line = self.stamp(description);
        let history = match grid.attr(HISTORY_ATTR) {
            Some(existing) if !existing.is_empty() => {
                let mut parts: Vec<String> = existing
                    .split(';')
                    .map(|p| p.trim().to_string())
                    .collect();
                parts.push(line);
                parts.join("; ")
            }
            _ => line,
        };
        grid.set_attr(HISTORY_ATTR, history);
    }
}

/// Wrap a transform so it stamps `description` into the history on success.
///
/// Built at pipeline-construction time; failed transforms stamp nothing.
pub fn with_provenance<F>(
    transform: F,
    description: impl Into<String>,
    provenance: Provenance,
) -> impl Fn(Grid) -> Result<Grid>
where
    F: Fn(Grid) -> Result<Grid>,
{
    let description = description.into();
    move |grid| {
        let mut out = transform(grid)?;
        provenance.append(&mut out, &description);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::Axis;
    use ndarray::{ArrayD, IxDyn};

    fn grid() -> Grid {
        Grid::new(
            "x",
            vec![Axis::numeric("lat", vec![0.0]).unwrap()],
            ArrayD::zeros(IxDyn(&[1])),
        )
        .unwrap()
    }

    #[test]
    fn test_stamp_format() {
        let line = Provenance::new("1.2.0").stamp("did a thing");
        assert!(line.starts_with("[gm.1.2.0@"));
        assert!(line.ends_with("] did a thing"));

        let line = Provenance::new("").stamp("did a thing");
        assert!(line.starts_with("[gm@"));
    }

    #[test]
    fn test_history_accumulates() {
        let prov = Provenance::new("0.1.0");
        let mut g = grid();
        prov.append(&mut g, "first");
        prov.append(&mut g, "second");
        let history = g.attr(HISTORY_ATTR).unwrap();
        let parts: Vec<&str> = history.split("; ").collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("first"));
        assert!(parts[1].ends_with("second"));
    }

    #[test]
    fn test_with_provenance_stamps_on_success_only() {
        let prov = Provenance::new("0.1.0");
        let ok = with_provenance(Ok, "identity", prov.clone());
        let out = ok(grid()).unwrap();
        assert!(out.attr(HISTORY_ATTR).unwrap().contains("identity"));

        let fail = with_provenance(
            |_| {
                Err(crate::error::ConformError::NotMonthly {
                    name: "x".to_string(),
                })
            },
            "never",
            prov,
        );
        assert!(fail(grid()).is_err());
    }
}
