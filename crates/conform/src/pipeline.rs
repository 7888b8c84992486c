//! The conform pipeline: a statically enumerable transform registry.
//!
//! Steps are a sum type rather than injected attributes, so the full set is
//! known at compile time and dispatch is a plain `match`.

use crate::error::Result;
use crate::provenance::Provenance;
use crate::transforms;
use grid_common::Grid;
use serde::{Deserialize, Serialize};

/// One registered conform transform, applied with its default parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConformStep {
    /// Fuzzy-rename coordinates to the canonical set.
    CorrectCoordNames,
    /// Center a monthly time axis on the 15th.
    TimeCenterMonthly,
    /// Interpolate 1-degree grids onto 0.5-offset centers.
    CoordCenterOffset,
    /// Reorder dimensions to `[time, depth, lat, lon]`.
    TransposeDims,
    /// Remap longitudes to `[-180 : 180]`.
    Lon180W180E,
    /// Remap longitudes to `[0 : 360]`.
    Lon0E360E,
    /// Snake-case the variable name.
    RenameSnakeCase,
}

impl ConformStep {
    /// Every registered step, in canonical application order.
    pub const ALL: [ConformStep; 7] = [
        Self::CorrectCoordNames,
        Self::TimeCenterMonthly,
        Self::CoordCenterOffset,
        Self::TransposeDims,
        Self::Lon180W180E,
        Self::Lon0E360E,
        Self::RenameSnakeCase,
    ];

    /// The step's name, as used in options and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CorrectCoordNames => "correct_coord_names",
            Self::TimeCenterMonthly => "time_center_monthly",
            Self::CoordCenterOffset => "coord_center_offset",
            Self::TransposeDims => "transpose_dims",
            Self::Lon180W180E => "lon_180w_180e",
            Self::Lon0E360E => "lon_0e_360e",
            Self::RenameSnakeCase => "rename_snake_case",
        }
    }

    /// One-line description recorded in the history attribute.
    pub fn description(&self) -> &'static str {
        match self {
            Self::CorrectCoordNames => {
                "rename coordinates to [time, depth, lat, lon] with fuzzy matching"
            }
            Self::TimeCenterMonthly => "center monthly time axis on the 15th",
            Self::CoordCenterOffset => "interpolate offset grid centers onto 0.5-centered cells",
            Self::TransposeDims => "transpose dimensions to [time, depth, lat, lon]",
            Self::Lon180W180E => "regrid longitudes to [-180 : 180] from [0 : 360]",
            Self::Lon0E360E => "regrid longitudes to [0 : 360] from [-180 : 180]",
            Self::RenameSnakeCase => "rename the variable to snake_case",
        }
    }

    /// Apply the step with its default parameters.
    pub fn apply(&self, grid: Grid) -> Result<Grid> {
        match self {
            Self::CorrectCoordNames => transforms::correct_coord_names(grid),
            Self::TimeCenterMonthly => transforms::time_center_monthly(grid, 15, "time"),
            Self::CoordCenterOffset => transforms::coord_center_offset(grid, 0.5, "lon"),
            Self::TransposeDims => transforms::transpose_dims(grid, true),
            Self::Lon180W180E => transforms::lon_180w_180e(grid, "lon"),
            Self::Lon0E360E => transforms::lon_0e_360e(grid, "lon"),
            Self::RenameSnakeCase => transforms::rename_snake_case(grid),
        }
    }
}

impl std::fmt::Display for ConformStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Named flags selecting which steps a [`Conform`] pipeline runs.
///
/// Defaults match the common conformance pass: canonical names, canonical
/// dimension order, Atlantic-centered longitudes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConformOptions {
    pub correct_coord_names: bool,
    pub time_center_monthly: bool,
    pub coord_center_offset: bool,
    pub transpose_dims: bool,
    pub lon_180w_180e: bool,
    pub rename_snake_case: bool,
}

impl Default for ConformOptions {
    fn default() -> Self {
        Self {
            correct_coord_names: true,
            time_center_monthly: false,
            coord_center_offset: false,
            transpose_dims: true,
            lon_180w_180e: true,
            rename_snake_case: false,
        }
    }
}

impl ConformOptions {
    /// The selected steps, in canonical application order.
    pub fn steps(&self) -> Vec<ConformStep> {
        let mut steps = Vec::new();
        if self.correct_coord_names {
            steps.push(ConformStep::CorrectCoordNames);
        }
        if self.time_center_monthly {
            steps.push(ConformStep::TimeCenterMonthly);
        }
        if self.coord_center_offset {
            steps.push(ConformStep::CoordCenterOffset);
        }
        if self.transpose_dims {
            steps.push(ConformStep::TransposeDims);
        }
        if self.lon_180w_180e {
            steps.push(ConformStep::Lon180W180E);
        }
        if self.rename_snake_case {
            steps.push(ConformStep::RenameSnakeCase);
        }
        steps
    }
}

/// A configured conformance pipeline.
#[derive(Debug, Clone)]
pub struct Conform {
    steps: Vec<ConformStep>,
    provenance: Provenance,
}

impl Conform {
    /// Build a pipeline from option flags, stamping provenance with this
    /// crate's version.
    pub fn new(options: &ConformOptions) -> Self {
        Self {
            steps: options.steps(),
            provenance: Provenance::crate_version(),
        }
    }

    /// Build a pipeline from an explicit step list.
    pub fn from_steps(steps: Vec<ConformStep>) -> Self {
        Self {
            steps,
            provenance: Provenance::crate_version(),
        }
    }

    /// Override the version recorded in history lines.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.provenance = Provenance::new(version);
        self
    }

    /// The steps this pipeline will run, in order.
    pub fn steps(&self) -> &[ConformStep] {
        &self.steps
    }

    /// Run the pipeline. Each successful step appends one history line;
    /// the first failing step aborts the whole run.
    pub fn apply(&self, grid: Grid) -> Result<Grid> {
        let mut grid = grid;
        for step in &self.steps {
            grid = step.apply(grid)?;
            self.provenance.append(&mut grid, step.description());
        }
        Ok(grid)
    }
}

impl Default for Conform {
    fn default() -> Self {
        Self::new(&ConformOptions::default())
    }
}

/// Apply a sequence of transform functions to a grid.
///
/// The bare composition helper for callers assembling their own pipelines,
/// typically from [`crate::provenance::with_provenance`]-wrapped closures.
pub fn apply_pipeline(grid: Grid, funcs: &[&dyn Fn(Grid) -> Result<Grid>]) -> Result<Grid> {
    let mut grid = grid;
    for func in funcs {
        grid = func(grid)?;
    }
    Ok(grid)
}
