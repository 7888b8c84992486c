//! Grid sources with deferred materialization.

use crate::error::Result;
use grid_common::{Axis, Grid};
use std::ops::Range;

/// A target grid whose data may live out of core.
///
/// The colocator sizes its restriction against `axes()` *before* calling
/// [`GridSource::load_ranges`], so a lazily backed implementation only ever
/// materializes the bounded region the query needs.
pub trait GridSource {
    /// The variable name, used in error messages.
    fn name(&self) -> &str;

    /// The coordinate axes of the full target.
    fn axes(&self) -> &[Axis];

    /// Materialize the given index ranges (one per dimension) into memory.
    fn load_ranges(&self, ranges: &[Range<usize>]) -> Result<Grid>;
}

/// In-memory grids are their own source: loading a range is a slice copy.
impl GridSource for Grid {
    fn name(&self) -> &str {
        Grid::name(self)
    }

    fn axes(&self) -> &[Axis] {
        Grid::axes(self)
    }

    fn load_ranges(&self, ranges: &[Range<usize>]) -> Result<Grid> {
        Ok(self.slice_ranges(ranges)?)
    }
}
