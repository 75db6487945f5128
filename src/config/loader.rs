//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration and the CTE preference mapping from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, LaborCodes, PreferenceMap};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml        # Sentinel, segment options, signals, bucket patterns
/// ├── labor_codes.yaml   # Pay and leave labor codes
/// └── preferences.yaml   # Optional: employee id -> prefers CTE
/// ```
///
/// # Example
///
/// ```no_run
/// use segment_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Sentinel: {}", loader.engine().sentinel);
/// # Ok::<(), segment_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    engine: EngineConfig,
    preferences: PreferenceMap,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// `engine.yaml` and `labor_codes.yaml` are required. A missing
    /// `preferences.yaml` yields an empty mapping.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let mut engine = Self::load_yaml::<EngineConfig>(&path.join("engine.yaml"))?;
        engine.labor_codes = Self::load_yaml::<LaborCodes>(&path.join("labor_codes.yaml"))?;

        let preferences_path = path.join("preferences.yaml");
        let preferences = if preferences_path.exists() {
            Self::load_preferences(&preferences_path)?
        } else {
            PreferenceMap::new()
        };

        debug!(
            config_dir = %path.display(),
            signals = engine.uncertainty_signals.len(),
            preferences = preferences.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            engine,
            preferences,
        })
    }

    /// Loads a preference mapping from a standalone YAML file.
    pub fn load_preferences<P: AsRef<Path>>(path: P) -> EngineResult<PreferenceMap> {
        Self::load_yaml(path.as_ref())
    }

    /// Replaces the default preference mapping.
    pub fn with_preferences(mut self, preferences: PreferenceMap) -> Self {
        self.preferences = preferences;
        self
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine configuration.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns the labor code table.
    pub fn labor_codes(&self) -> &LaborCodes {
        &self.engine.labor_codes
    }

    /// Returns the default preference mapping.
    pub fn preferences(&self) -> &PreferenceMap {
        &self.preferences
    }
}
