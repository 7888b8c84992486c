//! Configuration for colocation.

use serde::{Deserialize, Serialize};

/// Default cell ceiling for a restricted load: one year of half-hourly
/// quarter-degree global fields (720 x 1440 x 365 x 2).
pub const DEFAULT_MAX_CELLS: usize = 720 * 1440 * 365 * 2;

/// Configuration for the colocator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColocationConfig {
    /// Hard ceiling on the number of cells a restricted target may
    /// materialize. Guards against a sloppy query range loading an entire
    /// out-of-core dataset.
    pub max_cells: usize,
}

impl Default for ColocationConfig {
    fn default() -> Self {
        Self {
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl ColocationConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("COLOCATION_MAX_CELLS") {
            if let Ok(cells) = val.parse() {
                config.max_cells = cells;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cells == 0 {
            return Err("max_cells must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ColocationConfig::default();
        assert_eq!(config.max_cells, 756_864_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = ColocationConfig { max_cells: 0 };
        assert!(config.validate().is_err());
    }
}
