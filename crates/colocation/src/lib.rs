//! Colocation and gridding of scattered geoscience samples.
//!
//! This crate resolves irregularly sampled point data against regular
//! labeled grids, in both directions:
//!
//! - **Colocation**: given a target grid and per-axis query coordinate
//!   arrays, return one target value per query point
//! - **Flat gridding**: given point records, aggregate them into grid cells
//!   (by exact coordinate value, or binned onto a prescribed target)
//!
//! # Architecture
//!
//! ```text
//! colocate(source, queries)
//!      │
//!      ├─► match_queries: names / lengths / kinds    (fail fast)
//!      │
//!      ├─► bounding range per queried axis
//!      │         │
//!      │         ├─► too many cells: error before loading
//!      │         ├─► zero cells: all-NaN result
//!      │         └─► load_ranges: materialize the restriction
//!      │
//!      ├─► BinEdges per restricted axis
//!      │
//!      └─► bin every query row, gather, NaN the misses
//! ```
//!
//! Bins follow the `(lo, hi]` convention with edges halfway between
//! centers; see [`bins::BinEdges`].
//!
//! # Example
//!
//! ```
//! use colocation::{colocate_values, ColocationConfig};
//! use grid_common::{Axis, CoordValues, Grid};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let grid = Grid::new(
//!     "sst",
//!     vec![Axis::numeric("lat", vec![-1.0, 0.0, 1.0]).unwrap()],
//!     ArrayD::from_shape_vec(IxDyn(&[3]), vec![10.0, 20.0, 30.0]).unwrap(),
//! )
//! .unwrap();
//!
//! let queries = vec![("lat".to_string(), CoordValues::Numeric(vec![-1.0, 1.0]))];
//! let values = colocate_values(&grid, &queries, &ColocationConfig::default()).unwrap();
//! assert_eq!(values, vec![10.0, 30.0]);
//! ```

pub mod bins;
pub mod colocate;
pub mod config;
pub mod error;
pub mod gridder;
pub mod matcher;
pub mod source;

// Re-export commonly used items at crate root
pub use bins::BinEdges;
pub use colocate::{colocate, colocate_values};
pub use config::{ColocationConfig, DEFAULT_MAX_CELLS};
pub use error::{ColocationError, Result};
pub use gridder::{grid_flat_data, grid_flat_table_to_target, Aggregator};
pub use matcher::match_queries;
pub use source::GridSource;
