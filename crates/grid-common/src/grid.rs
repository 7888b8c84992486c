//! The labeled n-dimensional grid.

use crate::axis::Axis;
use crate::coords::CoordValues;
use crate::error::{GridError, Result};
use ndarray::{ArrayD, Axis as NdAxis, IxDyn, Slice};
use std::collections::BTreeMap;
use std::ops::Range;

/// Attribute key holding the processing history of a grid.
pub const HISTORY_ATTR: &str = "history";

/// An n-dimensional array with one named coordinate axis per dimension.
///
/// Data is `f64` with NaN as the missing value. Axis lengths must match the
/// array shape, and dimension names must be unique.
#[derive(Debug, Clone)]
pub struct Grid {
    name: String,
    axes: Vec<Axis>,
    data: ArrayD<f64>,
    attrs: BTreeMap<String, String>,
}

impl Grid {
    /// Create a grid from axes and data.
    pub fn new(name: impl Into<String>, axes: Vec<Axis>, data: ArrayD<f64>) -> Result<Self> {
        let axis_lens: Vec<usize> = axes.iter().map(Axis::len).collect();
        if axis_lens != data.shape() {
            return Err(GridError::ShapeMismatch {
                axis_lens,
                shape: data.shape().to_vec(),
            });
        }
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|a| a.name() == axis.name()) {
                return Err(GridError::DuplicateDimension(axis.name().to_string()));
            }
        }
        Ok(Self {
            name: name.into(),
            axes,
            data,
            attrs: BTreeMap::new(),
        })
    }

    /// The variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the variable.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// All axes, in dimension order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Find an axis by name, returning its dimension index too.
    pub fn axis(&self, name: &str) -> Option<(usize, &Axis)> {
        self.axes
            .iter()
            .enumerate()
            .find(|(_, a)| a.name() == name)
    }

    /// Dimension names in order.
    pub fn dim_names(&self) -> Vec<&str> {
        self.axes.iter().map(Axis::name).collect()
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Total number of cells.
    pub fn ncells(&self) -> usize {
        self.data.len()
    }

    /// The raw data array.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Mutable access to the raw data array.
    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    /// Consume the grid, returning the raw data.
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Read an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Write an attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// All attributes.
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// Value at a full multi-index, if in bounds.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.data.get(IxDyn(index)).copied()
    }

    /// Restrict every dimension to an index range.
    ///
    /// `ranges` must hold one range per dimension. The restriction copies
    /// the covered cells; axes are sliced to match.
    pub fn slice_ranges(&self, ranges: &[Range<usize>]) -> Result<Grid> {
        if ranges.len() != self.ndim() {
            return Err(GridError::length_mismatch(
                "slice ranges",
                self.ndim(),
                ranges.len(),
            ));
        }
        let mut view = self.data.view();
        for (i, range) in ranges.iter().enumerate() {
            view.slice_axis_inplace(NdAxis(i), Slice::from(range.clone()));
        }
        let axes = self
            .axes
            .iter()
            .zip(ranges)
            .map(|(a, r)| a.slice_range(r.clone()))
            .collect();
        Ok(Grid {
            name: self.name.clone(),
            axes,
            data: view.to_owned(),
            attrs: self.attrs.clone(),
        })
    }

    /// Transpose dimensions into the given order of current indices.
    pub fn transpose_to(&self, order: &[usize]) -> Result<Grid> {
        if order.len() != self.ndim() {
            return Err(GridError::length_mismatch(
                "transpose order",
                self.ndim(),
                order.len(),
            ));
        }
        let mut seen = vec![false; order.len()];
        for &i in order {
            if i >= order.len() || seen[i] {
                return Err(GridError::NoSuchDimension(format!("#{i}")));
            }
            seen[i] = true;
        }
        let axes = order.iter().map(|&i| self.axes[i].clone()).collect();
        let data = self.data.clone().permuted_axes(order.to_vec());
        Ok(Grid {
            name: self.name.clone(),
            axes,
            data: data.as_standard_layout().to_owned(),
            attrs: self.attrs.clone(),
        })
    }

    /// Rename dimensions according to a map; names not present are ignored.
    pub fn rename_dims(&self, renames: &BTreeMap<String, String>) -> Result<Grid> {
        let axes: Vec<Axis> = self
            .axes
            .iter()
            .map(|a| match renames.get(a.name()) {
                Some(new) => a.renamed(new),
                None => a.clone(),
            })
            .collect();
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|a| a.name() == axis.name()) {
                return Err(GridError::DuplicateDimension(axis.name().to_string()));
            }
        }
        Ok(Grid {
            name: self.name.clone(),
            axes,
            data: self.data.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Replace one dimension's coordinate values, re-sorting data so the new
    /// centers come out strictly increasing.
    ///
    /// This is the building block of the longitude-convention flips: the
    /// remapped centers arrive unsorted and the data rows follow them.
    pub fn assign_coords_sorted(&self, dim_name: &str, values: CoordValues) -> Result<Grid> {
        let (dim, axis) = self
            .axis(dim_name)
            .ok_or_else(|| GridError::NoSuchDimension(dim_name.to_string()))?;
        if values.len() != axis.len() {
            return Err(GridError::length_mismatch(
                format!("coordinates for {dim_name}"),
                axis.len(),
                values.len(),
            ));
        }
        let mut order: Vec<usize> = (0..values.len()).collect();
        match &values {
            CoordValues::Numeric(v) => order.sort_by(|&a, &b| {
                v[a].partial_cmp(&v[b]).unwrap_or(std::cmp::Ordering::Equal)
            }),
            CoordValues::Time(v) => order.sort_by_key(|&i| v[i]),
        }
        let sorted = values.select(&order);
        let mut axes = self.axes.clone();
        axes[dim] = Axis::new(dim_name, sorted)?;
        Ok(Grid {
            name: self.name.clone(),
            axes,
            data: self.data.select(NdAxis(dim), &order),
            attrs: self.attrs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    fn grid_2x3() -> Grid {
        let data = ArrayD::from_shape_vec(
            IxDyn(&[2, 3]),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap();
        Grid::new(
            "tmp",
            vec![
                Axis::numeric("lat", vec![-10.0, 10.0]).unwrap(),
                Axis::numeric("lon", vec![0.0, 1.0, 2.0]).unwrap(),
            ],
            data,
        )
        .unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let data = ArrayD::zeros(IxDyn(&[2, 2]));
        let result = Grid::new(
            "x",
            vec![
                Axis::numeric("lat", vec![0.0, 1.0]).unwrap(),
                Axis::numeric("lon", vec![0.0, 1.0, 2.0]).unwrap(),
            ],
            data,
        );
        assert!(matches!(result, Err(GridError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_duplicate_dims_rejected() {
        let data = ArrayD::zeros(IxDyn(&[1, 1]));
        let result = Grid::new(
            "x",
            vec![
                Axis::numeric("lat", vec![0.0]).unwrap(),
                Axis::numeric("lat", vec![0.0]).unwrap(),
            ],
            data,
        );
        assert!(matches!(result, Err(GridError::DuplicateDimension(_))));
    }

    #[test]
    fn test_slice_ranges() {
        let g = grid_2x3();
        let s = g.slice_ranges(&[0..2, 1..3]).unwrap();
        assert_eq!(s.shape(), &[2, 2]);
        assert_eq!(s.get(&[0, 0]), Some(2.0));
        assert_eq!(s.get(&[1, 1]), Some(6.0));
        assert_eq!(
            s.axis("lon").unwrap().1.values(),
            &CoordValues::Numeric(vec![1.0, 2.0])
        );
    }

    #[test]
    fn test_transpose() {
        let g = grid_2x3();
        let t = g.transpose_to(&[1, 0]).unwrap();
        assert_eq!(t.dim_names(), vec!["lon", "lat"]);
        assert_eq!(t.get(&[2, 1]), Some(6.0));
    }

    #[test]
    fn test_assign_coords_sorted_reorders_data() {
        let g = grid_2x3();
        // remap lon [0, 1, 2] -> [2, 0, 1]: data columns must follow
        let s = g
            .assign_coords_sorted("lon", CoordValues::Numeric(vec![2.0, 0.0, 1.0]))
            .unwrap();
        assert_eq!(
            s.axis("lon").unwrap().1.values(),
            &CoordValues::Numeric(vec![0.0, 1.0, 2.0])
        );
        // row 0 was [1, 2, 3] with new coords [2, 0, 1] -> sorted [2, 3, 1]
        assert_eq!(s.get(&[0, 0]), Some(2.0));
        assert_eq!(s.get(&[0, 1]), Some(3.0));
        assert_eq!(s.get(&[0, 2]), Some(1.0));
    }
}
