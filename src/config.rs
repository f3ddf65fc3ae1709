use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::predict::Observer;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config has no satellites")]
    NoSatellites,
    #[error("config has no locations")]
    NoLocations,
    #[error("location {name}: {message}")]
    InvalidLocation { name: String, message: String },
}

/// A satellite to watch. Elements are refreshed separately each run; the
/// configuration only carries identity and the optional elevation override.
#[derive(Debug, Clone, Deserialize)]
pub struct Satellite {
    pub name: String,
    pub catalog_id: u32,
    /// Overrides the global minimum-elevation threshold for this satellite.
    #[serde(default)]
    pub min_elevation_deg: Option<f64>,
}

/// An observation site, immutable for the run's duration.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Location {
    pub fn observer(&self) -> Observer {
        Observer {
            latitude_deg: self.latitude_deg,
            longitude_deg: self.longitude_deg,
            altitude_m: self.altitude_m,
        }
    }
}

/// What a failed per-satellite element fetch does to the refresh step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Any failure fails the whole refresh (reference behavior).
    Abort,
    /// Log, drop the satellite from the run, keep going.
    Degrade,
}

/// Immutable run options, threaded through the pipeline as a value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub look_ahead_hours: u32,
    pub min_elevation_deg: f64,
    pub max_cloud_cover_percent: f64,
    /// Skip all network access: load elements from the snapshot and use a
    /// fixed cloud value instead of the forecast API.
    pub debug_mode: bool,
    pub verbose: bool,
    pub refresh_policy: RefreshPolicy,
    pub snapshot_path: PathBuf,
    /// Overall wall-clock budget for the run, in seconds.
    pub deadline_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            look_ahead_hours: 144,
            min_elevation_deg: 40.0,
            max_cloud_cover_percent: 101.0,
            debug_mode: false,
            verbose: false,
            refresh_policy: RefreshPolicy::Abort,
            snapshot_path: PathBuf::from("elements.tle"),
            deadline_secs: None,
        }
    }
}

/// Top-level configuration file: the satellite and location tables plus
/// optional run options.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub satellites: Vec<Satellite>,
    pub locations: Vec<Location>,
    #[serde(default)]
    pub options: RunConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_str(&yaml)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ConfigFile = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.satellites.is_empty() {
            return Err(ConfigError::NoSatellites);
        }
        if self.locations.is_empty() {
            return Err(ConfigError::NoLocations);
        }
        for location in &self.locations {
            if !(-90.0..=90.0).contains(&location.latitude_deg) {
                return Err(ConfigError::InvalidLocation {
                    name: location.name.clone(),
                    message: format!("latitude {} out of range", location.latitude_deg),
                });
            }
            if !(-180.0..=180.0).contains(&location.longitude_deg) {
                return Err(ConfigError::InvalidLocation {
                    name: location.name.clone(),
                    message: format!("longitude {} out of range", location.longitude_deg),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
satellites:
  - name: Landsat-8
    catalog_id: 39084
  - name: HYPSO-1
    catalog_id: 51053
    min_elevation_deg: 30.0
locations:
  - name: Mjosa
    latitude_deg: 60.8
    longitude_deg: 10.8
options:
  look_ahead_hours: 72
  max_cloud_cover_percent: 50.0
"#;

    #[test]
    fn parses_tables_and_options() {
        let config = ConfigFile::from_str(SAMPLE).unwrap();
        assert_eq!(config.satellites.len(), 2);
        assert_eq!(config.satellites[1].min_elevation_deg, Some(30.0));
        assert_eq!(config.locations[0].altitude_m, 0.0);
        assert_eq!(config.options.look_ahead_hours, 72);
        assert_eq!(config.options.max_cloud_cover_percent, 50.0);
        // Untouched options keep their defaults
        assert_eq!(config.options.min_elevation_deg, 40.0);
        assert_eq!(config.options.refresh_policy, RefreshPolicy::Abort);
    }

    #[test]
    fn defaults_match_reference_values() {
        let options = RunConfig::default();
        assert_eq!(options.look_ahead_hours, 144);
        assert_eq!(options.min_elevation_deg, 40.0);
        assert_eq!(options.max_cloud_cover_percent, 101.0);
        assert!(!options.debug_mode);
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let yaml = r#"
satellites:
  - name: X
    catalog_id: 1
locations:
  - name: nowhere
    latitude_deg: 95.0
    longitude_deg: 0.0
"#;
        assert!(matches!(
            ConfigFile::from_str(yaml),
            Err(ConfigError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn rejects_empty_tables() {
        let yaml = "satellites: []\nlocations: []\n";
        assert!(matches!(
            ConfigFile::from_str(yaml),
            Err(ConfigError::NoSatellites)
        ));
    }
}
