//! Error types for the conform pipeline.

use grid_common::GridError;
use thiserror::Error;

/// Errors raised by conform transforms.
///
/// Most transforms are no-ops when their dimension is absent; the errors
/// here are real precondition violations.
#[derive(Error, Debug)]
pub enum ConformError {
    /// The time axis exists but is not at strict monthly resolution.
    #[error("the time variable of {name} is not monthly")]
    NotMonthly { name: String },

    /// Underlying data-model error.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type for conform operations.
pub type Result<T> = std::result::Result<T, ConformError>;
