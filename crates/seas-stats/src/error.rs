//! Error types for seasonal statistics.

use grid_common::GridError;
use thiserror::Error;

/// Errors raised by the seasonal-cycle fits and diagnostics.
#[derive(Error, Debug)]
pub enum SeasStatsError {
    /// The named dimension does not exist on the grid.
    #[error("no dimension named {0}")]
    NoSuchDimension(String),

    /// The fit dimension is not a datetime axis.
    #[error("{0} is not a datetime dimension")]
    NotTimeAxis(String),

    /// The fits require exactly twelve samples per year.
    #[error("monthly data required: found {steps} steps per year")]
    NotMonthly { steps: usize },

    /// Rolling windows must span an odd number of years.
    #[error("n_years must be an odd number, got {0}")]
    EvenWindow(usize),

    /// The least-squares solver could not make progress.
    #[error("least-squares fit failed: {0}")]
    FitFailed(String),

    /// The diagnostic expects a specific dimension set.
    #[error("expected dimensions (time, lat, lon), got {dims:?}")]
    UnexpectedDimensions { dims: Vec<String> },

    /// Underlying data-model error.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type for seasonal statistics.
pub type Result<T> = std::result::Result<T, SeasStatsError>;
