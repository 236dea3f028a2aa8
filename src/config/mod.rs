//! Configuration module for olapq.
//!
//! Handles the TOML settings that seed query defaults.

mod settings;

pub use settings::{
    AxesSettings, DetailsSettings, QuerySettings, Settings, SettingsError, VisualTotalsSettings,
};
