//! Application logging
//!
//! Logging goes through Bevy's `LogPlugin`. When file logging is requested,
//! a daily rolling file under ~/.config/towerview/logs/ is attached as an
//! extra tracing layer.

use crate::core::config_file::ConfigFile;
use bevy::log::{BoxedLayer, Level, LogPlugin};
use bevy::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::Layer;

/// Marker resource: mirror logs into the log directory
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FileLogging;

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// File name prefix of the daily rolling log
const LOG_FILE_PREFIX: &str = "towerview.log";

/// Path of the file the rolling appender writes today
///
/// The appender rotates on UTC dates and appends the date to the prefix.
pub fn current_log_file() -> PathBuf {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("{}.{}", LOG_FILE_PREFIX, date))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Parse a level name such as "debug" or "WARN"
pub fn parse_level(level: &str) -> Option<Level> {
    level.parse::<Level>().ok()
}

/// Configure the log plugin for the given level
///
/// Engine crates stay at warn unless the level is even quieter.
pub fn configure_logging(level: Level) -> LogPlugin {
    let engine_level = if level < Level::WARN { level } else { Level::WARN };
    LogPlugin {
        level,
        filter: format!(
            "towerview={},bevy={},bevy_ecs::error::handler=error",
            level.as_str().to_lowercase(),
            engine_level.as_str().to_lowercase()
        ),
        custom_layer: file_log_layer,
        ..default()
    }
}

/// Extra layer writing plain-text logs to the rolling log file
fn file_log_layer(app: &mut App) -> Option<BoxedLayer> {
    app.world().get_resource::<FileLogging>()?;

    if let Err(e) = initialize_logs_directory() {
        eprintln!("Failed to create logs directory: {}", e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir(), LOG_FILE_PREFIX);
    Some(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(appender)
            .boxed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_filter_keeps_engine_quiet() {
        let plugin = configure_logging(Level::DEBUG);
        assert!(plugin.filter.contains("towerview=debug"));
        assert!(plugin.filter.contains("bevy=warn"));

        let plugin = configure_logging(Level::ERROR);
        assert!(plugin.filter.contains("bevy=error"));
    }

    #[test]
    fn test_log_file_matches_appender_naming() {
        let path = current_log_file();
        assert!(path.starts_with(logs_dir()));

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(name, format!("towerview.log.{date}"));
    }
}
