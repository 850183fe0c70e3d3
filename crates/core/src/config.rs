use serde::{Deserialize, Serialize};
use thiserror::Error;

use okuma_seyri_protocol::DEFAULT_NOTE;

pub const DEFAULT_CONTAINER_ID: &str = "readingBox";
pub const DEFAULT_MAX_SAMPLES: usize = 5000;
pub const DEFAULT_RECENT_SAMPLES: usize = 5;
pub const DEFAULT_CLICKS_PER_POINT: u32 = 5;
pub const DEFAULT_GRID: [f64; 3] = [0.15, 0.5, 0.85];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_samples must be greater than zero")]
    ZeroCapacity,
    #[error("container_id must not be empty")]
    EmptyContainer,
    #[error("calibration grid must have at least one position")]
    EmptyGrid,
    #[error("calibration grid position {0} is outside [0, 1]")]
    GridOutOfRange(f64),
    #[error("clicks_per_point must be greater than zero")]
    ZeroClicks,
}

/// Tracker settings. Every field has a default so partial config files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Element id of the container whose paragraphs are mapped.
    pub container_id: String,
    /// Sample buffer capacity; the oldest samples are evicted beyond it.
    pub max_samples: usize,
    /// How many of the latest samples the host shows live.
    pub recent_samples: usize,
    /// Disclaimer written into reports.
    pub note: String,
    pub calibration: CalibrationConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            max_samples: DEFAULT_MAX_SAMPLES,
            recent_samples: DEFAULT_RECENT_SAMPLES,
            note: DEFAULT_NOTE.to_string(),
            calibration: CalibrationConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_samples == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.container_id.is_empty() {
            return Err(ConfigError::EmptyContainer);
        }
        self.calibration.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub clicks_per_point: u32,
    /// Fractions of the viewport used on both axes; targets are the cross
    /// product, visited row by row.
    pub grid: Vec<f64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            clicks_per_point: DEFAULT_CLICKS_PER_POINT,
            grid: DEFAULT_GRID.to_vec(),
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clicks_per_point == 0 {
            return Err(ConfigError::ZeroClicks);
        }
        if self.grid.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        if let Some(&bad) = self.grid.iter().find(|f| !(0.0..=1.0).contains(*f)) {
            return Err(ConfigError::GridOutOfRange(bad));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TrackerConfig::default();
        assert_eq!(config.container_id, "readingBox");
        assert_eq!(config.max_samples, 5000);
        assert_eq!(config.calibration.grid, vec![0.15, 0.5, 0.85]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TrackerConfig = serde_json::from_str(r#"{"max_samples": 10}"#).unwrap();
        assert_eq!(config.max_samples, 10);
        assert_eq!(config.recent_samples, 5);
        assert_eq!(config.calibration.clicks_per_point, 5);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = TrackerConfig {
            max_samples: 0,
            ..TrackerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));

        config.max_samples = 1;
        config.calibration.grid = vec![0.5, 1.2];
        assert_eq!(config.validate(), Err(ConfigError::GridOutOfRange(1.2)));

        config.calibration.grid.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));
    }
}
