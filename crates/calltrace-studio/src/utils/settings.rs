//! Optional TOML settings file.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//! Command line flags override whatever is loaded here.
//!
//! ```toml
//! [analysis]
//! merge_restarted_threads = true
//! top_paths = 20
//!
//! [flamegraph]
//! title = "Frame Profile"
//! width = 1600
//! ```

use super::config::{
    DEFAULT_FLAMEGRAPH_TITLE, DEFAULT_FLAMEGRAPH_WIDTH, DEFAULT_MIN_FRAME_WIDTH,
    DEFAULT_TOP_PATHS, MAX_TOP_PATHS, MIN_FLAMEGRAPH_WIDTH,
};
use super::error::SettingsError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete settings file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Ingestion and aggregation options
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Flamegraph rendering options
    #[serde(default)]
    pub flamegraph: FlamegraphSettings,
}

/// Ingestion and aggregation options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Collapse restarted threads sharing a label after loading
    pub merge_restarted_threads: bool,

    /// Number of hot paths kept in the report
    pub top_paths: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            merge_restarted_threads: true,
            top_paths: DEFAULT_TOP_PATHS,
        }
    }
}

/// Flamegraph rendering options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlamegraphSettings {
    pub title: String,
    pub width: usize,
    /// Frames narrower than this (in pixels) are skipped
    pub min_width: f64,
}

impl Default for FlamegraphSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_FLAMEGRAPH_TITLE.to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
            min_width: DEFAULT_MIN_FRAME_WIDTH,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text and check ranges
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.analysis.top_paths == 0 || self.analysis.top_paths > MAX_TOP_PATHS {
            return Err(SettingsError::Invalid(format!(
                "analysis.top_paths must be between 1 and {}",
                MAX_TOP_PATHS
            )));
        }

        if self.flamegraph.width < MIN_FLAMEGRAPH_WIDTH {
            return Err(SettingsError::Invalid(format!(
                "flamegraph.width must be at least {}",
                MIN_FLAMEGRAPH_WIDTH
            )));
        }

        Ok(())
    }
}

/// Load settings from a TOML file
///
/// # Errors
/// * `SettingsError::Io` - If file cannot be read
/// * `SettingsError::ParseFailed` - If TOML is invalid
/// * `SettingsError::Invalid` - If a value is out of range
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
    let path = path.as_ref();
    debug!("Loading settings from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    Settings::from_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.analysis.merge_restarted_threads);
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_toml(
            r#"
            [analysis]
            merge_restarted_threads = false

            [flamegraph]
            width = 1600
            "#,
        )
        .unwrap();

        assert!(!settings.analysis.merge_restarted_threads);
        assert_eq!(settings.analysis.top_paths, DEFAULT_TOP_PATHS);
        assert_eq!(settings.flamegraph.width, 1600);
        assert_eq!(settings.flamegraph.title, DEFAULT_FLAMEGRAPH_TITLE);
    }

    #[test]
    fn test_out_of_range_settings() {
        let result = Settings::from_toml("[analysis]\ntop_paths = 0\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));

        let result = Settings::from_toml("[flamegraph]\nwidth = 10\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_malformed_settings() {
        let result = Settings::from_toml("[analysis\n");
        assert!(matches!(result, Err(SettingsError::ParseFailed(_))));
    }
}
