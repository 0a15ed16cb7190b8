//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Application initialization and the headless runner
//! - Settings, config file and CLI handling
//! - Controller errors

pub mod app;
pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod report;
pub mod runner;
pub mod settings;

// Re-export commonly used items
pub use app::create_app;
pub use cli::CliArgs;
pub use errors::{ControllerError, ControllerResult};
pub use runner::run_app;
pub use settings::BuildingSettings;
