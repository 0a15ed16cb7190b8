//! Per-frame systems that advance the building's background work

use crate::data::provider::BuildingData;
use crate::editing::selection::{FilterPoll, SelectionController};
use crate::systems::init_task::DelayedInit;
use bevy::prelude::*;

/// Sent once the delayed initialization ran
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingInitialized {
    pub bound: usize,
    pub unbound: usize,
}

/// Sent when a filter pass published its results
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCompleted {
    pub matched: usize,
}

/// Count down the startup delay, then initialize the building
pub fn run_delayed_init(
    time: Res<Time>,
    mut init: ResMut<DelayedInit>,
    mut controller: ResMut<SelectionController>,
    data: Res<BuildingData>,
    mut initialized: EventWriter<BuildingInitialized>,
) {
    if !init.tick(time.delta()) {
        return;
    }

    match controller.init_building(&*data) {
        Ok(report) => {
            controller.animator_mut().set_floor_labels();
            initialized.write(BuildingInitialized {
                bound: report.bound,
                unbound: report.unbound,
            });
        }
        Err(e) => warn!("Building initialization failed: {}", e),
    }
}

/// Advance the in-flight filter pass by one step per frame
pub fn drive_filter_pass(
    mut controller: ResMut<SelectionController>,
    mut data: ResMut<BuildingData>,
    mut completed: EventWriter<FilterCompleted>,
) {
    if let FilterPoll::Completed { matched } = controller.poll_filter(&mut *data) {
        completed.write(FilterCompleted { matched });
    }
}
