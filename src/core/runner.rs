//! Application runner logic
//!
//! Drives the headless building app: waits for the delayed initialization,
//! applies the requested commands, runs any filter pass to completion and
//! prints the resulting scene as JSON.

use crate::core::app::{create_app, LogOptions};
use crate::core::cli::CliArgs;
use crate::core::config_file::ConfigFile;
use crate::core::report::BuildingReport;
use crate::data::fixture::load_fixture_from_path;
use crate::data::provider::BuildingData;
use crate::editing::selection::{BuildingCommand, SelectionController};
use crate::systems::DelayedInit;
use anyhow::{anyhow, Context, Result};
use bevy::prelude::*;
use std::time::Duration;

/// Pause between frames while waiting for the delayed init
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Create and run the application with the given CLI arguments.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    cli_args
        .validate()
        .map_err(|e| anyhow!("CLI validation failed: {}", e))?;

    let scene_path = cli_args
        .scene
        .as_ref()
        .context("No scene fixture given")?;
    let fixture = load_fixture_from_path(scene_path)?;
    let config = ConfigFile::load();

    let settings = cli_args.resolve_settings(config.as_ref(), &fixture.building_id);
    let log = LogOptions {
        level: cli_args.resolve_log_level(config.as_ref()),
        to_file: cli_args.log_file,
    };
    let commands = cli_args.building_commands()?;
    let data = fixture.building_data()?;

    let mut app = create_app(settings, data, &fixture.views, Some(log));
    app.finish();
    app.cleanup();

    let report = drive_scene(&mut app, commands, cli_args.clear);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Run the app until the scene settled and capture it
pub fn drive_scene(app: &mut App, commands: Vec<BuildingCommand>, clear: bool) -> BuildingReport {
    wait_for_init(app);

    for command in commands {
        app.world_mut().send_event(command);
    }
    app.update();
    run_filter_to_completion(app);

    if clear {
        app.world_mut().send_event(BuildingCommand::ClearApts);
        app.update();
    }

    let world = app.world();
    BuildingReport::capture(
        world.resource::<SelectionController>(),
        world.resource::<BuildingData>(),
    )
}

/// Update until the delayed init fired
pub fn wait_for_init(app: &mut App) {
    app.update();
    while app.world().resource::<DelayedInit>().is_pending() {
        std::thread::sleep(FRAME_INTERVAL);
        app.update();
    }
    debug!("Building initialization finished");
}

/// Update until no filter pass is in flight
pub fn run_filter_to_completion(app: &mut App) {
    let mut frames = 0usize;
    while app.world().resource::<SelectionController>().is_filter_running() {
        app.update();
        frames += 1;
    }
    if frames > 0 {
        debug!("Filter pass finished after {} frames", frames);
    }
}
