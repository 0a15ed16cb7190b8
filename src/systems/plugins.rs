//! Plugin configuration for the building scene
//!
//! Frame order is fixed: the delayed init runs first, then the in-flight
//! filter pass advances, then queued commands are applied. A filter pass
//! started by a command therefore scans nothing until the next frame.

use crate::editing::selection::SelectionPlugin;
use crate::systems::init_task::DelayedInit;
use crate::systems::lifecycle::{
    drive_filter_pass, run_delayed_init, BuildingInitialized, FilterCompleted,
};
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum BuildingSets {
    Init,
    Filter,
    Commands,
}

/// Main plugin bundling the building systems
pub struct BuildingSystems;

impl Plugin for BuildingSystems {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                BuildingSets::Init,
                BuildingSets::Filter,
                BuildingSets::Commands,
            )
                .chain(),
        )
        .add_event::<BuildingInitialized>()
        .add_event::<FilterCompleted>()
        // Keeps a countdown inserted by the app builder
        .init_resource::<DelayedInit>()
        .add_systems(Update, run_delayed_init.in_set(BuildingSets::Init))
        .add_systems(Update, drive_filter_pass.in_set(BuildingSets::Filter))
        .add_plugins(SelectionPlugin);
    }
}
