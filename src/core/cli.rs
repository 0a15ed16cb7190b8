//! Command line interface for towerview
//!
//! Handles parsing command line arguments and validating them before the
//! headless building scene starts.

use crate::core::config_file::ConfigFile;
use crate::core::settings::{BuildingSettings, DEFAULT_LOG_LEVEL};
use crate::data::filter::FilterCriteria;
use crate::editing::selection::{BuildingCommand, ModeState};
use crate::logging;
use anyhow::{Context, Result};
use bevy::log::{warn, Level};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// towerview CLI arguments
///
/// Examples:
///   towerview --scene tower.json                          # Initialize and report
///   towerview --scene tower.json --mode cylinder --select P-12 --rotate
///   towerview --scene tower.json --floor 3 --select P-31  # Floor mode selection
///   towerview --scene tower.json --filter two-rooms.json  # Run a filter pass
///   towerview --scene tower.json --wishlist --clear       # Highlight, then reset
///   towerview --new-config                                # Write default settings
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "towerview",
    version,
    about = "Headless building selection and filter controller",
    long_about = "towerview loads a building scene description, runs the selection/mode state machine and filter passes in a headless Bevy app, and prints the resulting scene state as JSON."
)]
pub struct CliArgs {
    /// Path to a scene fixture (JSON)
    #[clap(
        long = "scene",
        short = 's',
        help = "Scene fixture to load (JSON)",
        long_help = "Path to a JSON scene fixture holding the building id, unit records, the unit types of the scene's views and the wish-list."
    )]
    pub scene: Option<PathBuf>,

    /// Presentation mode to enter after initialization
    #[clap(
        long = "mode",
        short = 'm',
        help = "Mode to enter: cylinder or hemisphere"
    )]
    pub mode: Option<String>,

    /// Collapse the building to a floor, entering floor mode
    #[clap(long = "floor", short = 'f', help = "Collapse to this floor (floor mode)")]
    pub floor: Option<i32>,

    /// Property id to select
    #[clap(long = "select", help = "Property id of the unit to select")]
    pub select: Option<String>,

    /// Rotate the camera to the selected unit
    #[clap(long = "rotate", help = "Rotate the camera to the selection")]
    pub rotate: bool,

    /// Filter criteria to apply (JSON)
    #[clap(
        long = "filter",
        help = "Filter criteria file (JSON)",
        long_help = "Path to a JSON file with filter criteria: min_floor, max_floor, unit_types, favorites_only and attributes."
    )]
    pub filter: Option<PathBuf>,

    /// Highlight the wish-list units
    #[clap(long = "wishlist", help = "Highlight the wish-list units")]
    pub highlight_wishlist: bool,

    /// Reset favorites and selections at the end
    #[clap(long = "clear", help = "Clear favorites and selections at the end")]
    pub clear: bool,

    /// Seconds to wait before initializing the building
    #[clap(long = "init-delay", help = "Initialization delay in seconds")]
    pub init_delay: Option<f32>,

    /// Units scanned per frame by a filter pass
    #[clap(long = "batch-size", help = "Units scanned per frame while filtering")]
    pub batch_size: Option<usize>,

    #[clap(long = "log-level", help = "Log level: error, warn, info, debug or trace")]
    pub log_level: Option<String>,

    /// Mirror logs into ~/.config/towerview/logs/
    #[clap(long = "log-file", help = "Also write logs to the logs directory")]
    pub log_file: bool,

    /// Initialize user configuration directory with default settings
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with default settings"
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        if self.new_config {
            return Ok(());
        }

        let Some(scene) = &self.scene else {
            return Err("No scene given.\nPass a scene fixture with --scene <FILE>.".to_string());
        };
        if !scene.is_file() {
            return Err(format!(
                "Scene fixture does not exist: {}\nMake sure the path is correct and the file exists.",
                scene.display()
            ));
        }

        if let Some(filter) = &self.filter {
            if !filter.is_file() {
                return Err(format!(
                    "Filter criteria file does not exist: {}",
                    filter.display()
                ));
            }
        }

        if let Some(mode) = &self.mode {
            match ModeState::parse(mode) {
                Some(ModeState::Cylinder) | Some(ModeState::Neither) => {}
                Some(ModeState::Floor) => {
                    return Err("Floor mode is entered with --floor <N>".to_string());
                }
                None => {
                    return Err(format!(
                        "Unknown mode: '{mode}'\nAvailable modes: cylinder, hemisphere"
                    ));
                }
            }
        }

        if let Some(delay) = self.init_delay {
            if let Err(e) = Duration::try_from_secs_f32(delay) {
                return Err(format!("Invalid init delay: {delay} ({e})"));
            }
        }

        if self.batch_size == Some(0) {
            return Err("Batch size must be at least 1".to_string());
        }

        if let Some(level) = &self.log_level {
            if logging::parse_level(level).is_none() {
                return Err(format!(
                    "Unknown log level: '{level}'\nAvailable levels: error, warn, info, debug, trace"
                ));
            }
        }

        Ok(())
    }

    /// Resolve building settings
    ///
    /// Priority order:
    /// 1. CLI arguments
    /// 2. Config file (~/.config/towerview/settings.json)
    /// 3. Built-in defaults
    pub fn resolve_settings(&self, config: Option<&ConfigFile>, building_id: &str) -> BuildingSettings {
        let defaults = BuildingSettings::default();

        let init_delay = self
            .init_delay
            .or_else(|| config.and_then(|c| c.init_delay_secs))
            .and_then(|secs| match Duration::try_from_secs_f32(secs) {
                Ok(delay) => Some(delay),
                Err(e) => {
                    warn!("Ignoring init delay of {} seconds: {}", secs, e);
                    None
                }
            })
            .unwrap_or(defaults.init_delay);

        let filter_batch_size = self
            .batch_size
            .or_else(|| config.and_then(|c| c.filter_batch_size))
            .filter(|size| *size > 0)
            .unwrap_or(defaults.filter_batch_size);

        let floor_height = config
            .and_then(|c| c.floor_height)
            .unwrap_or(defaults.floor_height);

        let rotation_exceptions = config
            .map(|c| c.camera_rotation_exceptions.clone())
            .unwrap_or_default();

        let label_offsets = config
            .map(|c| c.label_offsets.clone())
            .unwrap_or_default();

        BuildingSettings {
            building_id: building_id.to_string(),
            init_delay,
            filter_batch_size,
            floor_height,
            rotation_exceptions,
            label_offsets,
        }
    }

    /// Resolve the log level: CLI, then config file, then default
    pub fn resolve_log_level(&self, config: Option<&ConfigFile>) -> Level {
        self.log_level
            .as_deref()
            .and_then(logging::parse_level)
            .or_else(|| {
                config
                    .and_then(|c| c.log_level.as_deref())
                    .and_then(logging::parse_level)
            })
            .or_else(|| logging::parse_level(DEFAULT_LOG_LEVEL))
            .unwrap_or(Level::INFO)
    }

    /// Commands to issue once the building is initialized, in order
    pub fn building_commands(&self) -> Result<Vec<BuildingCommand>> {
        let mut commands = vec![BuildingCommand::SetActive(true)];

        match self.mode.as_deref().and_then(ModeState::parse) {
            Some(ModeState::Cylinder) => commands.push(BuildingCommand::EnterCylinder),
            Some(ModeState::Neither) => commands.push(BuildingCommand::EnterHemisphere),
            Some(ModeState::Floor) | None => {}
        }

        if let Some(floor) = self.floor {
            commands.push(BuildingCommand::CollapseFloorsTo(floor));
        }

        if self.highlight_wishlist {
            commands.push(BuildingCommand::HighlightWishlist);
        }

        if let Some(property_id) = &self.select {
            commands.push(BuildingCommand::Select {
                property_id: property_id.clone(),
                rotate: self.rotate,
            });
        }

        if let Some(path) = &self.filter {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read filter criteria {}", path.display()))?;
            let criteria: FilterCriteria = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid filter criteria in {}", path.display()))?;
            commands.push(BuildingCommand::StartFilter(criteria));
        }

        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scene_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "building_id": "b" }"#).unwrap();
        file
    }

    #[test]
    fn test_scene_is_required() {
        assert!(CliArgs::default().validate().is_err());
        let args = CliArgs {
            new_config: true,
            ..Default::default()
        };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let scene = scene_file();
        let base = CliArgs {
            scene: Some(scene.path().to_path_buf()),
            ..Default::default()
        };
        assert!(base.validate().is_ok());

        let bad_mode = CliArgs {
            mode: Some("sideways".to_string()),
            ..base.clone()
        };
        assert!(bad_mode.validate().is_err());

        let floor_mode = CliArgs {
            mode: Some("floor".to_string()),
            ..base.clone()
        };
        assert!(floor_mode.validate().is_err());

        let zero_batch = CliArgs {
            batch_size: Some(0),
            ..base.clone()
        };
        assert!(zero_batch.validate().is_err());

        let negative_delay = CliArgs {
            init_delay: Some(-1.0),
            ..base.clone()
        };
        assert!(negative_delay.validate().is_err());

        let huge_delay = CliArgs {
            init_delay: Some(1e30),
            ..base
        };
        assert!(huge_delay.validate().is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let config = ConfigFile {
            init_delay_secs: Some(5.0),
            filter_batch_size: Some(16),
            floor_height: Some(4.0),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let args = CliArgs {
            init_delay: Some(0.5),
            ..Default::default()
        };

        let settings = args.resolve_settings(Some(&config), "tower");
        assert_eq!(settings.building_id, "tower");
        assert_eq!(settings.init_delay, Duration::from_millis(500));
        assert_eq!(settings.filter_batch_size, 16);
        assert_eq!(settings.floor_height, 4.0);
        assert_eq!(args.resolve_log_level(Some(&config)), Level::DEBUG);
    }

    #[test]
    fn test_out_of_range_config_delay_falls_back_to_default() {
        let config = ConfigFile {
            init_delay_secs: Some(1e30),
            label_offsets: vec![crate::core::settings::LabelOffset {
                property_id: "P-1".to_string(),
                offset: [1.0, 0.0, 0.0],
            }],
            ..Default::default()
        };

        let settings = CliArgs::default().resolve_settings(Some(&config), "tower");
        assert_eq!(settings.init_delay, BuildingSettings::default().init_delay);
        assert_eq!(settings.label_offsets, config.label_offsets);

        let nan = ConfigFile {
            init_delay_secs: Some(f32::NAN),
            ..Default::default()
        };
        let settings = CliArgs::default().resolve_settings(Some(&nan), "tower");
        assert_eq!(settings.init_delay, BuildingSettings::default().init_delay);
    }

    #[test]
    fn test_defaults_without_config() {
        let args = CliArgs::default();
        let settings = args.resolve_settings(None, "tower");
        assert_eq!(settings.init_delay, BuildingSettings::default().init_delay);
        assert_eq!(args.resolve_log_level(None), Level::INFO);
    }

    #[test]
    fn test_command_order() {
        let args = CliArgs {
            mode: Some("cylinder".to_string()),
            select: Some("P-1".to_string()),
            rotate: true,
            highlight_wishlist: true,
            ..Default::default()
        };
        assert_eq!(
            args.building_commands().unwrap(),
            vec![
                BuildingCommand::SetActive(true),
                BuildingCommand::EnterCylinder,
                BuildingCommand::HighlightWishlist,
                BuildingCommand::Select {
                    property_id: "P-1".to_string(),
                    rotate: true,
                },
            ]
        );
    }
}
