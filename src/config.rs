//! Application settings
//!
//! Typed settings for the loader: where the mapping file lives, which version it
//! must declare, and the ordered list of operating modes. Settings are read from
//! `settings.toml` in the user's config directory and fall back to defaults when
//! the file does not exist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

const APP_DIR: &str = "altinput";
const SETTINGS_FILE: &str = "settings.toml";
const MAPPING_FILE: &str = "config.ini";

/// Errors raised while reading or validating [`Settings`]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("At least one mode must be configured")]
    NoModes,

    #[error("Mode #{0} has an empty name")]
    EmptyModeName(usize),

    #[error("Invalid version string: '{0}'")]
    InvalidVersion(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Mapping file consumed by the loader
    pub config_path: PathBuf,
    /// Version the mapping file must declare in its global section
    pub expected_version: String,
    /// Ordered mode names; index 0 is the default mode
    pub modes: Vec<String>,
    /// Section holding file-wide keys such as `Version`
    pub global_section: String,
    /// Only sections declaring this interface are bound to devices
    pub interface: String,
    /// The single accepted `Class` value; an absent class defaults to it
    pub device_class: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: default_config_dir().join(MAPPING_FILE),
            expected_version: "1.4".to_string(),
            modes: vec![
                "Flight".to_string(),
                "AltFlight".to_string(),
                "Ground".to_string(),
            ],
            global_section: "global".to_string(),
            interface: "DirectInput".to_string(),
            device_class: "GameControl".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from the default location, or returns defaults if no file exists
    pub fn load() -> Result<Self, SettingsError> {
        let path = default_config_dir().join(SETTINGS_FILE);
        if !path.exists() {
            info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        debug!("Reading settings from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.modes.is_empty() {
            return Err(SettingsError::NoModes);
        }
        if let Some(index) = self.modes.iter().position(|m| m.trim().is_empty()) {
            return Err(SettingsError::EmptyModeName(index));
        }
        self.expected_version.parse::<ConfigVersion>()?;
        Ok(())
    }

    pub fn expected_version(&self) -> Result<ConfigVersion, SettingsError> {
        self.expected_version.parse()
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Dotted numeric version with 2 to 4 components
///
/// Comparison is component-wise and exact, so `1.4` and `1.4.0` are different
/// versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVersion(Vec<u32>);

impl ConfigVersion {
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for ConfigVersion {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidVersion(s.to_string());
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        if !(2..=4).contains(&parts.len()) {
            return Err(invalid());
        }
        Ok(Self(parts))
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.modes[0], "Flight");
        assert!(settings.config_path.ends_with("altinput/config.ini"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            expected_version = "2.0"
            modes = ["Flight", "Rover", "EVA"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.expected_version, "2.0");
        assert_eq!(settings.modes, vec!["Flight", "Rover", "EVA"]);
        assert_eq!(settings.interface, "DirectInput");
        assert_eq!(settings.device_class, "GameControl");
    }

    #[test]
    fn test_empty_mode_list_is_rejected() {
        let result = Settings::from_toml_str("modes = []");
        assert!(matches!(result, Err(SettingsError::NoModes)));
    }

    #[test]
    fn test_blank_mode_name_is_rejected() {
        let result = Settings::from_toml_str(r#"modes = ["Flight", " "]"#);
        assert!(matches!(result, Err(SettingsError::EmptyModeName(1))));
    }

    #[test]
    fn test_invalid_expected_version_is_rejected() {
        let result = Settings::from_toml_str(r#"expected_version = "one""#);
        assert!(matches!(result, Err(SettingsError::InvalidVersion(_))));
    }

    #[test]
    fn test_version_parsing() {
        let v: ConfigVersion = "1.4".parse().unwrap();
        assert_eq!(v.components(), &[1, 4]);
        assert_eq!(v.to_string(), "1.4");
        assert_eq!(" 1.4 ".parse::<ConfigVersion>().unwrap(), v);

        assert!("1".parse::<ConfigVersion>().is_err());
        assert!("1.2.3.4.5".parse::<ConfigVersion>().is_err());
        assert!("1.x".parse::<ConfigVersion>().is_err());
        assert!("".parse::<ConfigVersion>().is_err());
    }

    #[test]
    fn test_version_comparison_is_exact() {
        let short: ConfigVersion = "1.4".parse().unwrap();
        let long: ConfigVersion = "1.4.0".parse().unwrap();
        assert_ne!(short, long);
    }
}
