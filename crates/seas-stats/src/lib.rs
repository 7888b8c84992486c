//! Seasonal-cycle fitting and zonal diagnostics for monthly grids.
//!
//! Two estimators of the windowed annual cycle — a harmonic least-squares
//! fit and a calendar-month climatology — plus the zonal-anomaly data
//! preparation used for latitude-time diagnostics. Both estimators reduce
//! to the JJA minus DJF amplitude, the usual proxy for seasonal-cycle
//! strength.
//!
//! # Example
//!
//! ```
//! use seas_stats::seascycl_fit_climatology;
//! use test_utils::harmonic_series_grid;
//!
//! let grid = harmonic_series_grid(2000, 60, &[310.0, 0.0, 0.0, -3.0, -7.0, 5.5, 5.5]);
//! let fit = seascycl_fit_climatology(&grid, 3, "time").unwrap();
//! assert!(!fit.window_ends.is_empty());
//! ```

pub mod error;
pub mod harmonic;
pub mod least_squares;
pub mod seas_cycle;
pub mod zonal;

// Re-export commonly used items at crate root
pub use error::{Result, SeasStatsError};
pub use harmonic::HarmonicModel;
pub use least_squares::{CurveModel, LevenbergMarquardt};
pub use seas_cycle::{seascycl_fit_climatology, seascycl_fit_harmonic, SeasonalCycle};
pub use zonal::{zonal_anomaly, ZonalAnomaly};
