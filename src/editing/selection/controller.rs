//! The building selection controller
//!
//! Owns the current selection, the presentation mode and the in-flight filter
//! pass. Everything visual is delegated: unit views render selection and
//! filter states, the [`ModeAnimator`] moves floors around, and the data
//! provider owns the unit directory and the filtered results.

use super::mode::{ModeState, ModeTransition};
use crate::core::errors::{ControllerError, ControllerResult};
use crate::core::settings::BuildingSettings;
use crate::data::filter::UnitPredicate;
use crate::data::provider::DataProvider;
use crate::data::units::{UnitDirectory, UnitRecord};
use crate::scene::{
    BindReport, FloorScroll, HandleId, ModeAnimator, RenderLayer, UnitView, ViewRegistry,
};
use crate::systems::filter_task::{FilterStep, FilterTask};
use bevy::prelude::*;
use std::sync::Arc;

/// Result of a selection request that reached a view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectOutcome {
    Selected {
        handle: HandleId,
        /// Camera angle override for the unit type, when rotating
        view_angle: Option<f32>,
    },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Floor mode only allows selecting on the floor already selected
    CrossFloor,
    /// Neither cylinder nor floor mode is active
    NoActiveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStart {
    /// A previous pass was still running and got cancelled
    pub interrupted_previous: bool,
}

/// What one poll of the filter pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPoll {
    /// No pass in flight
    Idle,
    Pending { scanned: usize, matched: usize },
    Completed { matched: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearReport {
    pub favorites_cleared: usize,
    pub deselected: usize,
}

#[derive(Resource)]
pub struct SelectionController {
    building_id: String,
    registry: ViewRegistry,
    animator: Box<dyn ModeAnimator>,
    floor_scroll: Box<dyn FloorScroll>,
    directory: Option<Arc<UnitDirectory>>,
    selection: Option<HandleId>,
    mode: ModeState,
    initialized_for_cylinder: bool,
    active: bool,
    filter: Option<FilterTask>,
    settings: BuildingSettings,
}

impl SelectionController {
    pub fn new(
        settings: BuildingSettings,
        registry: ViewRegistry,
        animator: Box<dyn ModeAnimator>,
        floor_scroll: Box<dyn FloorScroll>,
    ) -> Self {
        Self {
            building_id: settings.building_id.clone(),
            registry,
            animator,
            floor_scroll,
            directory: None,
            selection: None,
            mode: ModeState::Neither,
            initialized_for_cylinder: false,
            active: false,
            filter: None,
            settings,
        }
    }

    // ========================================
    // Initialization
    // ========================================

    /// Bind the provider's directory to the views, register the floor count
    /// with the floor scroll and label every bound unit
    pub fn init_building(&mut self, provider: &dyn DataProvider) -> ControllerResult<BindReport> {
        let directory = self.load_directory(provider)?;
        let report = self.registry.bind_all(&directory);

        self.floor_scroll
            .init_floor_scroll(directory.max_floor().unwrap_or(0));

        info!(
            "Building '{}' initialized with {} units ({} views bound, {} unbound)",
            self.building_id,
            directory.len(),
            report.bound,
            report.unbound
        );

        self.initialize_unit_labels();
        Ok(report)
    }

    /// Rebind after the provider refreshed its directory
    pub fn outside_init(&mut self, provider: &dyn DataProvider) -> ControllerResult<BindReport> {
        let directory = self.load_directory(provider)?;
        let report = self.registry.bind_all(&directory);
        debug!(
            "Building '{}' rebound: {} bound, {} unbound",
            self.building_id, report.bound, report.unbound
        );
        Ok(report)
    }

    fn load_directory(&mut self, provider: &dyn DataProvider) -> ControllerResult<Arc<UnitDirectory>> {
        self.directory = provider.unit_directory();
        match &self.directory {
            Some(directory) => Ok(directory.clone()),
            None => {
                error!(
                    "No unit directory available for building '{}'",
                    self.building_id
                );
                Err(ControllerError::MissingData)
            }
        }
    }

    /// Push the floor label of every bound unit, applying its configured
    /// label offset
    pub fn initialize_unit_labels(&mut self) {
        for (_, view) in self.registry.iter_mut() {
            let Some(property_id) = view.record().map(|record| record.property_id.clone()) else {
                continue;
            };
            view.set_floor_label(self.settings.label_offset_for(&property_id));
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.directory.is_some()
    }

    // ========================================
    // Selection
    // ========================================

    /// Select the view bound to `record`
    ///
    /// In cylinder mode the previous selection is deselected first. In floor
    /// mode the request is ignored when the previous selection sits on a
    /// different floor.
    pub fn select_by_record(
        &mut self,
        record: &UnitRecord,
        rotate: bool,
    ) -> ControllerResult<SelectOutcome> {
        if self.directory.is_none() {
            warn!("Selection requested before the unit directory was loaded");
            return Err(ControllerError::MissingData);
        }

        let Some(target) = self.registry.find_by_property(&record.property_id) else {
            error!("No view bound to property '{}'", record.property_id);
            return Err(ControllerError::handle_not_found(&record.property_id));
        };

        match self.mode {
            ModeState::Cylinder => {
                if let Some(previous) = self.selection {
                    if let Some(view) = self.registry.get_mut(previous) {
                        view.deselect();
                    }
                }

                let view_angle = if rotate {
                    self.view_angle_for(target)
                } else {
                    None
                };

                self.selection = Some(target);
                self.registry.try_get_mut(target)?.select_in_cylinder(rotate);
                debug!("Selected {} in cylinder mode", record.property_id);

                Ok(SelectOutcome::Selected {
                    handle: target,
                    view_angle,
                })
            }
            ModeState::Floor => {
                if let Some(previous) = self.selection {
                    let previous_floor = self.registry.get(previous).and_then(|v| v.floor());
                    let target_floor = self.registry.get(target).and_then(|v| v.floor());
                    if previous_floor != target_floor {
                        debug!(
                            "Ignoring selection of {} on floor {:?}, current selection is on floor {:?}",
                            record.property_id, target_floor, previous_floor
                        );
                        return Ok(SelectOutcome::Ignored(IgnoreReason::CrossFloor));
                    }
                }

                self.selection = Some(target);
                self.registry.try_get_mut(target)?.select_floor_mesh();
                debug!("Selected {} in floor mode", record.property_id);

                Ok(SelectOutcome::Selected {
                    handle: target,
                    view_angle: None,
                })
            }
            ModeState::Neither => Ok(SelectOutcome::Ignored(IgnoreReason::NoActiveMode)),
        }
    }

    /// Resolve `property_id` in the directory, then select it
    pub fn select_by_property_id(
        &mut self,
        property_id: &str,
        rotate: bool,
    ) -> ControllerResult<SelectOutcome> {
        let Some(directory) = self.directory.clone() else {
            warn!("Selection requested before the unit directory was loaded");
            return Err(ControllerError::MissingData);
        };

        match directory.find_by_property_id(property_id) {
            Some(record) => self.select_by_record(record, rotate),
            None => {
                error!("Property '{}' is not in the unit directory", property_id);
                Err(ControllerError::handle_not_found(property_id))
            }
        }
    }

    /// Make `handle` the current selection without touching its presentation
    pub fn set_selected(&mut self, handle: HandleId) -> ControllerResult<()> {
        if !self.registry.contains(handle) {
            return Err(ControllerError::UnknownHandle(handle));
        }
        self.selection = Some(handle);
        Ok(())
    }

    /// Deselect the current selection; returns false if nothing was selected
    pub fn deselect_current(&mut self) -> bool {
        let Some(current) = self.selection.take() else {
            return false;
        };

        let floor_mode = self.mode == ModeState::Floor;
        if let Some(view) = self.registry.get_mut(current) {
            if floor_mode {
                view.deselect_floor_mesh();
            } else {
                view.deselect();
            }
        }
        true
    }

    pub fn clear_all_highlights(&mut self) {
        for (_, view) in self.registry.iter_mut() {
            view.clear_highlight();
        }
    }

    /// Clear all highlights, then highlight every wish-list unit that has a
    /// view. Returns how many views were highlighted.
    pub fn highlight_wishlist(&mut self, wishlist: &[UnitRecord]) -> usize {
        self.clear_all_highlights();

        let mut highlighted = 0;
        for record in wishlist {
            let Some(id) = self.registry.find_by_property(&record.property_id) else {
                continue;
            };
            if let Some(view) = self.registry.get_mut(id) {
                view.render_filtered();
                highlighted += 1;
                debug!("Highlighted wish-list unit {}", record.property_id);
            }
        }
        highlighted
    }

    // ========================================
    // Mode transitions
    // ========================================

    pub fn enter_cylinder_mode(&mut self) -> ControllerResult<ModeTransition> {
        if self.directory.is_none() {
            info!("Unit directory not loaded yet, cannot enter cylinder mode");
            return Err(ControllerError::MissingData);
        }

        if self.mode == ModeState::Cylinder {
            return Ok(ModeTransition::Unchanged);
        }

        let transition = if self.initialized_for_cylinder {
            ModeTransition::Entered
        } else {
            self.animator.enable_floor_mesh();
            self.initialized_for_cylinder = true;
            ModeTransition::EnteredWithSetup
        };

        self.mode = ModeState::Cylinder;
        info!("Building '{}' entered cylinder mode", self.building_id);
        Ok(transition)
    }

    /// Leave cylinder mode, fully deselecting the current selection
    pub fn enter_hemisphere_mode(&mut self) -> ModeTransition {
        if let Some(current) = self.selection.take() {
            if let Some(view) = self.registry.get_mut(current) {
                view.deselect();
            }
        }

        if self.mode == ModeState::Cylinder {
            self.mode = ModeState::Neither;
            info!("Building '{}' entered hemisphere mode", self.building_id);
            ModeTransition::Entered
        } else {
            ModeTransition::Unchanged
        }
    }

    /// Collapse the building to `floor`; enters floor mode unless the
    /// building is in cylinder mode
    pub fn collapse_floors_to(&mut self, floor: i32) {
        self.animator.collapse_floors_to(floor);
        if self.mode == ModeState::Neither {
            self.mode = ModeState::Floor;
        }
    }

    pub fn restore_building(&mut self) {
        self.animator.restore_building();
        if self.mode == ModeState::Floor {
            self.mode = ModeState::Neither;
        }
    }

    /// Hide the floors above the selected unit; false without a selection
    pub fn clear_floors_above_current_selection(&mut self) -> bool {
        let floor = self
            .selection
            .and_then(|id| self.registry.get(id))
            .and_then(|view| view.floor());

        match floor {
            Some(floor) => {
                self.animator.collapse_above_floor(floor);
                true
            }
            None => false,
        }
    }

    pub fn current_floor_height(&self) -> f32 {
        self.animator.current_floor_height()
    }

    /// Put floors and units on the layer seen by the cylinder camera
    pub fn set_cylinder_layer(&mut self) {
        self.animator.set_floor_layer(RenderLayer::Cylinder);
        for (_, view) in self.registry.iter_mut() {
            view.set_render_layer(RenderLayer::Cylinder);
        }
    }

    /// Put the floors back on the base layer
    pub fn set_base_layer(&mut self) {
        self.animator.set_floor_layer(RenderLayer::Base);
    }

    // ========================================
    // Filtering
    // ========================================

    /// Enqueue a filter pass; nothing is scanned before the next poll
    pub fn start_filter(
        &mut self,
        provider: &mut dyn DataProvider,
        predicate: Box<dyn UnitPredicate>,
    ) -> ControllerResult<FilterStart> {
        let Some(directory) = self.directory.clone() else {
            error!("Cannot filter building '{}' without unit data", self.building_id);
            return Err(ControllerError::MissingData);
        };

        let interrupted_previous = self.cancel_filter_task();
        if interrupted_previous {
            debug!("Restarting filter, previous pass cancelled");
        }

        let results = provider.filtered_results_mut();
        results.set_enabled(true);
        results.clear();

        self.filter = Some(FilterTask::new(
            directory,
            predicate,
            self.settings.filter_batch_size,
        ));
        info!("Filter pass started over {} units", self.directory_len());

        Ok(FilterStart {
            interrupted_previous,
        })
    }

    /// Disable filtering and cancel the running pass
    ///
    /// Views already marked as filtered keep their state.
    pub fn stop_filter(&mut self, provider: &mut dyn DataProvider) -> bool {
        provider.filtered_results_mut().set_enabled(false);
        let interrupted = self.cancel_filter_task();
        if interrupted {
            info!("Filter pass cancelled");
        }
        interrupted
    }

    fn cancel_filter_task(&mut self) -> bool {
        self.filter
            .take()
            .map(|mut task| task.cancel())
            .unwrap_or(false)
    }

    /// Advance the running pass by one scheduling point
    pub fn poll_filter(&mut self, provider: &mut dyn DataProvider) -> FilterPoll {
        let Some(task) = self.filter.as_mut() else {
            return FilterPoll::Idle;
        };

        let registry = &mut self.registry;
        let results = provider.filtered_results_mut();
        let step = task.step(|record| {
            results.push(record.clone());
            if let Some(view) = registry
                .find_bound_by_type(&record.type_number)
                .and_then(|id| registry.get_mut(id))
            {
                view.set_filtered(true);
                view.render_filtered();
            }
        });

        match step {
            FilterStep::Scanned { processed, matched } => FilterPoll::Pending {
                scanned: processed,
                matched,
            },
            FilterStep::Finished { matched } => {
                results.publish();
                self.filter = None;
                info!("Filter pass finished with {} matching units", matched);
                FilterPoll::Completed { matched }
            }
            FilterStep::Idle => {
                self.filter = None;
                FilterPoll::Idle
            }
        }
    }

    pub fn is_filter_running(&self) -> bool {
        self.filter.as_ref().is_some_and(FilterTask::is_running)
    }

    // ========================================
    // Reset
    // ========================================

    /// Clear favorites of the wish-list units and deselect every bound view
    ///
    /// Favorite flags are cleared in the provider's data and on the bound
    /// view records, so later filters and rebinds see them cleared too.
    pub fn clear_apts(&mut self, provider: &mut dyn DataProvider) -> ControllerResult<ClearReport> {
        if self.directory.is_none() {
            warn!("Nothing to clear, unit directory not loaded");
            return Err(ControllerError::MissingData);
        }

        let mut report = ClearReport::default();
        let wishlist = provider.wishlist().to_vec();

        for record in &wishlist {
            if provider.clear_favorite(&record.property_id) {
                report.favorites_cleared += 1;
            }

            let bound = self
                .registry
                .find_bound_by_type(&record.type_number)
                .and_then(|id| self.registry.get_mut(id))
                .and_then(|view| view.record_mut());
            if let Some(bound) = bound {
                bound.is_favorite = false;
            }
        }

        // Pick up the directory with the cleared flags
        let directory = self.load_directory(&*provider)?;

        for record in directory.iter() {
            if let Some(view) = self
                .registry
                .find_bound_by_type(&record.type_number)
                .and_then(|id| self.registry.get_mut(id))
            {
                view.deselect();
                report.deselected += 1;
            }
        }

        self.selection = None;
        debug!(
            "Cleared {} favorites and deselected {} units",
            report.favorites_cleared, report.deselected
        );
        Ok(report)
    }

    // ========================================
    // Queries
    // ========================================

    pub fn current_selection(&self) -> Option<HandleId> {
        self.selection
    }

    pub fn selected_view(&self) -> Option<&dyn UnitView> {
        self.selection.and_then(|id| self.registry.get(id))
    }

    /// View bound to the record's property id
    pub fn view_for_record(&self, record: &UnitRecord) -> Option<HandleId> {
        self.registry.find_by_property(&record.property_id)
    }

    pub fn directory(&self) -> Option<&Arc<UnitDirectory>> {
        self.directory.as_ref()
    }

    fn directory_len(&self) -> usize {
        self.directory.as_ref().map_or(0, |directory| directory.len())
    }

    pub fn building_id(&self) -> &str {
        &self.building_id
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn is_cylinder_mode(&self) -> bool {
        self.mode == ModeState::Cylinder
    }

    pub fn is_floor_mode(&self) -> bool {
        self.mode == ModeState::Floor
    }

    pub fn current_floor(&self) -> i32 {
        self.animator.current_floor()
    }

    pub fn is_floor_scroll(&self) -> bool {
        self.animator.is_floor_scroll()
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn animator(&self) -> &dyn ModeAnimator {
        self.animator.as_ref()
    }

    pub fn animator_mut(&mut self) -> &mut dyn ModeAnimator {
        self.animator.as_mut()
    }

    pub fn animator_as<T: ModeAnimator>(&self) -> Option<&T> {
        self.animator.as_any().downcast_ref::<T>()
    }

    pub fn floor_scroll_as<T: FloorScroll>(&self) -> Option<&T> {
        self.floor_scroll.as_any().downcast_ref::<T>()
    }

    pub fn settings(&self) -> &BuildingSettings {
        &self.settings
    }

    fn view_angle_for(&self, handle: HandleId) -> Option<f32> {
        let view = self.registry.get(handle)?;
        self.settings.view_angle_for(view.declared_type())
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("building_id", &self.building_id)
            .field("registry", &self.registry)
            .field("selection", &self.selection)
            .field("mode", &self.mode)
            .field("initialized_for_cylinder", &self.initialized_for_cylinder)
            .field("active", &self.active)
            .field("filter", &self.filter)
            .finish()
    }
}
