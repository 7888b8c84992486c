//! Sparse aggregation results.
//!
//! Gridding scattered samples onto a target usually touches a small
//! fraction of the cells, so aggregates are stored per occupied cell only.
//! `to_dense` materializes a NaN-backed [`Grid`] when a full array is
//! needed.

use crate::axis::Axis;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use ndarray::{ArrayD, IxDyn};
use std::collections::HashMap;

/// One field of per-cell values, keyed by multi-index.
#[derive(Debug, Clone, Default)]
pub struct SparseField {
    cells: HashMap<Vec<usize>, f64>,
}

impl SparseField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at a cell, if occupied.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.cells.get(index).copied()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over `(index, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<usize>, f64)> {
        self.cells.iter().map(|(k, &v)| (k, v))
    }

    fn set(&mut self, index: Vec<usize>, value: f64) {
        self.cells.insert(index, value);
    }
}

/// A set of sparse fields sharing one set of axes.
#[derive(Debug, Clone)]
pub struct SparseDataset {
    axes: Vec<Axis>,
    fields: Vec<(String, SparseField)>,
}

impl SparseDataset {
    /// Create an empty dataset over the given axes.
    pub fn new(axes: Vec<Axis>) -> Result<Self> {
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|a| a.name() == axis.name()) {
                return Err(GridError::DuplicateDimension(axis.name().to_string()));
            }
        }
        Ok(Self {
            axes,
            fields: Vec::new(),
        })
    }

    /// The shared axes.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// The dense shape implied by the axes.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::len).collect()
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&SparseField> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Write one cell of one field, creating the field on first use.
    pub fn insert(&mut self, field: &str, index: Vec<usize>, value: f64) -> Result<()> {
        let shape = self.shape();
        if index.len() != shape.len() || index.iter().zip(&shape).any(|(i, s)| i >= s) {
            return Err(GridError::IndexOutOfBounds { index, shape });
        }
        match self.fields.iter_mut().find(|(n, _)| n == field) {
            Some((_, f)) => f.set(index, value),
            None => {
                let mut f = SparseField::new();
                f.set(index, value);
                self.fields.push((field.to_string(), f));
            }
        }
        Ok(())
    }

    /// Materialize one field as a dense NaN-backed grid.
    pub fn to_dense(&self, field: &str) -> Result<Grid> {
        let sparse = self
            .field(field)
            .ok_or_else(|| GridError::NoSuchDimension(field.to_string()))?;
        let mut data = ArrayD::from_elem(IxDyn(&self.shape()), f64::NAN);
        for (index, value) in sparse.iter() {
            data[IxDyn(index)] = value;
        }
        Grid::new(field, self.axes.clone(), data)
    }
}
