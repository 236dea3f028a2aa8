//! TOML-based query defaults.
//!
//! Supports a config file (olapq.toml) whose values seed every query
//! built with [`Query::with_settings`](crate::selection::Query::with_settings).
//!
//! Example configuration:
//! ```toml
//! [query]
//! default_hierarchize_mode = "post"
//! lowest_levels_only = false
//! consistency = "restricted_only"
//!
//! [visual_totals]
//! enabled = true
//! pattern = "* {}"
//!
//! [details]
//! axis = "rows"
//! location = "top"
//!
//! [axes]
//! non_empty = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::selection::{AxisLocation, ConsistencyPolicy, HierarchizeMode, MeasureLocation};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub query: QuerySettings,
    pub visual_totals: VisualTotalsSettings,
    pub details: DetailsSettings,
    pub axes: AxesSettings,
}

/// Query-wide compile defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Mode used when a hierarchy needs hierarchizing on its own.
    pub default_hierarchize_mode: HierarchizeMode,

    /// Use only the deepest active level of each hierarchy.
    pub lowest_levels_only: bool,

    /// When levels of one hierarchy are chained with `Exists`.
    pub consistency: ConsistencyPolicy,
}

/// Query-wide visual totals defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VisualTotalsSettings {
    pub enabled: bool,

    /// Caption pattern passed to `VisualTotals`, e.g. `"* {}"`.
    pub pattern: Option<String>,
}

/// Placement of the measures.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetailsSettings {
    pub axis: AxisLocation,
    pub location: MeasureLocation,
}

impl Default for DetailsSettings {
    fn default() -> Self {
        Self {
            axis: AxisLocation::Columns,
            location: MeasureLocation::Bottom,
        }
    }
}

/// Positional axis defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AxesSettings {
    /// Start COLUMNS and ROWS with `NON EMPTY`.
    pub non_empty: bool,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `OLAPQ_CONFIG`
    /// 2. `./olapq.toml`
    /// 3. `~/.config/olapq/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("OLAPQ_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("olapq.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("olapq").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.details.axis == AxisLocation::Unused {
            return Err(SettingsError::InvalidConfig(
                "details.axis cannot be \"unused\"".to_string(),
            ));
        }
        Ok(())
    }
}
