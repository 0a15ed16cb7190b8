//! Unit selection for the building scene
//!
//! The [`SelectionController`] holds the selection/mode state machine. Inside
//! the app it is driven through [`BuildingCommand`] events, handled once per
//! frame by [`handle_building_commands`].

pub mod controller;
pub mod mode;

pub use controller::{
    ClearReport, FilterPoll, FilterStart, IgnoreReason, SelectOutcome, SelectionController,
};
pub use mode::{ModeState, ModeTransition};

use crate::data::filter::FilterCriteria;
use crate::data::provider::{BuildingData, DataProvider};
use crate::systems::plugins::BuildingSets;
use bevy::prelude::*;

/// Requests issued by the building UI
#[derive(Event, Debug, Clone, PartialEq)]
pub enum BuildingCommand {
    EnterCylinder,
    EnterHemisphere,
    Select { property_id: String, rotate: bool },
    Deselect,
    ClearHighlights,
    HighlightWishlist,
    StartFilter(FilterCriteria),
    StopFilter,
    CollapseFloorsTo(i32),
    RestoreBuilding,
    ClearFloorsAboveSelection,
    SetCylinderLayer,
    SetBaseLayer,
    /// Rebind after the data provider refreshed its directory
    Refresh,
    /// Reset favorites and selections when leaving the building
    ClearApts,
    SetActive(bool),
}

/// Apply queued building commands in arrival order
pub fn handle_building_commands(
    mut commands: EventReader<BuildingCommand>,
    mut controller: ResMut<SelectionController>,
    mut data: ResMut<BuildingData>,
) {
    for command in commands.read() {
        debug!("Building command: {:?}", command);

        match command {
            BuildingCommand::EnterCylinder => {
                if let Err(e) = controller.enter_cylinder_mode() {
                    debug!("Cylinder mode not entered: {}", e);
                }
            }
            BuildingCommand::EnterHemisphere => {
                controller.enter_hemisphere_mode();
            }
            BuildingCommand::Select {
                property_id,
                rotate,
            } => match controller.select_by_property_id(property_id, *rotate) {
                Ok(SelectOutcome::Ignored(reason)) => {
                    debug!("Selection of {} ignored: {:?}", property_id, reason);
                }
                Ok(SelectOutcome::Selected { .. }) => {}
                Err(e) => debug!("Selection failed: {}", e),
            },
            BuildingCommand::Deselect => {
                controller.deselect_current();
            }
            BuildingCommand::ClearHighlights => controller.clear_all_highlights(),
            BuildingCommand::HighlightWishlist => {
                let highlighted = controller.highlight_wishlist(data.wishlist());
                info!("Highlighted {} wish-list units", highlighted);
            }
            BuildingCommand::StartFilter(criteria) => {
                if let Err(e) = controller.start_filter(&mut *data, Box::new(criteria.clone())) {
                    debug!("Filter not started: {}", e);
                }
            }
            BuildingCommand::StopFilter => {
                controller.stop_filter(&mut *data);
            }
            BuildingCommand::CollapseFloorsTo(floor) => controller.collapse_floors_to(*floor),
            BuildingCommand::RestoreBuilding => controller.restore_building(),
            BuildingCommand::ClearFloorsAboveSelection => {
                if !controller.clear_floors_above_current_selection() {
                    debug!("No selection to clear floors above");
                }
            }
            BuildingCommand::SetCylinderLayer => controller.set_cylinder_layer(),
            BuildingCommand::SetBaseLayer => controller.set_base_layer(),
            BuildingCommand::Refresh => {
                if let Err(e) = controller.outside_init(&*data) {
                    debug!("Refresh skipped: {}", e);
                }
            }
            BuildingCommand::ClearApts => {
                if let Err(e) = controller.clear_apts(&mut *data) {
                    debug!("Clear skipped: {}", e);
                }
            }
            BuildingCommand::SetActive(active) => controller.set_active(*active),
        }
    }
}

/// Plugin wiring building commands into the controller
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BuildingCommand>().add_systems(
            Update,
            handle_building_commands.in_set(BuildingSets::Commands),
        );
    }
}
