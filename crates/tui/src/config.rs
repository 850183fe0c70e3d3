use std::path::Path;

use anyhow::{Context, Result};
use okuma_seyri_core::TrackerConfig;

/// Load tracker settings from a TOML file, or defaults when no path is given.
///
/// ```toml
/// container_id = "readingBox"
/// max_samples = 5000
///
/// [calibration]
/// clicks_per_point = 5
/// grid = [0.15, 0.5, 0.85]
/// ```
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let Some(path) = path else {
        return Ok(TrackerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("in {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<TrackerConfig> {
    let config: TrackerConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = parse_config("max_samples = 100\n[calibration]\nclicks_per_point = 3\n").unwrap();
        assert_eq!(config.max_samples, 100);
        assert_eq!(config.calibration.clicks_per_point, 3);
        assert_eq!(config.calibration.grid.len(), 3);
        assert_eq!(config.container_id, "readingBox");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_config("max_samples = 0").is_err());
        assert!(parse_config("[calibration]\ngrid = [2.0]").is_err());
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), TrackerConfig::default());
    }
}
