//! Dataset conformance transforms.
//!
//! Gridded products arrive with every imaginable convention: `longitude`
//! vs. `lon`, 0..360 vs. -180..180, time first or time last, timestamps at
//! month starts or mid-month. This crate normalizes a [`Grid`] to one
//! canonical form through a pipeline of small, pure transforms, each
//! recording what it did in the grid's `history` attribute.
//!
//! # Example
//!
//! ```
//! use conform::{Conform, ConformOptions};
//! use grid_common::{Axis, Grid, HISTORY_ATTR};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let grid = Grid::new(
//!     "sst",
//!     vec![
//!         Axis::numeric("Longitude", vec![0.0, 120.0, 240.0]).unwrap(),
//!     ],
//!     ArrayD::zeros(IxDyn(&[3])),
//! )
//! .unwrap();
//!
//! let conformed = Conform::default().apply(grid).unwrap();
//! assert_eq!(conformed.dim_names(), vec!["lon"]);
//! assert!(conformed.attr(HISTORY_ATTR).is_some());
//! ```
//!
//! [`Grid`]: grid_common::Grid

pub mod error;
pub mod names;
pub mod pipeline;
pub mod provenance;
pub mod transforms;

// Re-export commonly used items at crate root
pub use error::{ConformError, Result};
pub use pipeline::{apply_pipeline, Conform, ConformOptions, ConformStep};
pub use provenance::{with_provenance, Provenance};
