//! User configuration file handling
//!
//! Manages settings from ~/.config/towerview/settings.json

use crate::core::settings::{
    CameraRotationException, LabelOffset, DEFAULT_FILTER_BATCH_SIZE, DEFAULT_FLOOR_HEIGHT,
    DEFAULT_LOG_LEVEL,
};
use crate::systems::init_task::DEFAULT_INIT_DELAY;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration from ~/.config/towerview/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    /// Seconds to wait for building data before initializing
    pub init_delay_secs: Option<f32>,
    /// Units scanned per frame by a filter pass
    pub filter_batch_size: Option<usize>,
    /// Height of one floor in world units
    pub floor_height: Option<f32>,
    /// Log level name ("error", "warn", "info", "debug", "trace")
    pub log_level: Option<String>,
    /// Per unit type camera angle overrides
    pub camera_rotation_exceptions: Vec<CameraRotationException>,
    /// Per unit text label offsets
    pub label_offsets: Vec<LabelOffset>,
}

impl ConfigFile {
    /// Get the path to the towerview config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("towerview")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file; missing or invalid files
    /// yield `None`
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Settings file populated with the built-in defaults
    pub fn with_defaults() -> Self {
        Self {
            init_delay_secs: Some(DEFAULT_INIT_DELAY.as_secs_f32()),
            filter_batch_size: Some(DEFAULT_FILTER_BATCH_SIZE),
            floor_height: Some(DEFAULT_FLOOR_HEIGHT),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            camera_rotation_exceptions: Vec::new(),
            label_offsets: Vec::new(),
        }
    }

    /// Initialize the user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/towerview directory
    /// 2. A settings.json file with default values
    /// 3. A logs/ directory for application logs
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        let config_dir = Self::config_dir();
        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = crate::logging::logs_dir();
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            Self::with_defaults().save()?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View application logs in: {:?}", logs_dir);
        println!("  - Today's log file: {:?}", crate::logging::current_log_file());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let config = ConfigFile {
            filter_batch_size: Some(8),
            camera_rotation_exceptions: vec![CameraRotationException {
                unit_type: "PH1".to_string(),
                view_angle: 40.0,
            }],
            label_offsets: vec![LabelOffset {
                property_id: "P-3".to_string(),
                offset: [0.0, 0.25, 0.0],
            }],
            ..ConfigFile::with_defaults()
        };
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path), Some(config));
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.init_delay_secs, None);
        assert!(config.camera_rotation_exceptions.is_empty());
        assert!(config.label_offsets.is_empty());
    }

    #[test]
    fn test_invalid_or_missing_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(ConfigFile::load_from(&path), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(ConfigFile::load_from(&path), None);
    }
}
