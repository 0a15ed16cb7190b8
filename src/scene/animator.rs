//! Collaborators that perform the visual side of mode changes
//!
//! The controller decides *when* the building changes presentation; a
//! [`ModeAnimator`] decides *how* it looks. [`FloorAnimator`] is the headless
//! implementation that only tracks the resulting floor state.

use crate::scene::view::RenderLayer;
use bevy::prelude::*;
use std::any::Any;

/// Performs cylinder/floor transitions and floor reveal/collapse
pub trait ModeAnimator: Send + Sync + 'static {
    /// Prepare the per-floor meshes used by cylinder mode
    fn enable_floor_mesh(&mut self);

    /// Bring every floor back after floor mode
    fn restore_building(&mut self);

    /// Collapse the building down to `floor`
    fn collapse_floors_to(&mut self, floor: i32);

    /// Hide the floors above `floor`
    fn collapse_above_floor(&mut self, floor: i32);

    fn current_floor_height(&self) -> f32;

    fn set_floor_labels(&mut self);

    fn set_floor_layer(&mut self, layer: RenderLayer);

    fn current_floor(&self) -> i32;

    /// Whether the user is scrolling through floors
    fn is_floor_scroll(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Floor scroll widget of the building UI
pub trait FloorScroll: Send + Sync + 'static {
    fn init_floor_scroll(&mut self, max_floor: i32);

    fn as_any(&self) -> &dyn Any;
}

/// Headless animator tracking floor state
#[derive(Debug, Clone)]
pub struct FloorAnimator {
    floor_height: f32,
    current_floor: i32,
    floor_mesh_enabled: bool,
    floor_mesh_setups: usize,
    collapsed_to: Option<i32>,
    hidden_above: Option<i32>,
    floor_labels_set: bool,
    floor_layer: RenderLayer,
    floor_scroll: bool,
}

impl FloorAnimator {
    pub fn new(floor_height: f32) -> Self {
        Self {
            floor_height,
            current_floor: 0,
            floor_mesh_enabled: false,
            floor_mesh_setups: 0,
            collapsed_to: None,
            hidden_above: None,
            floor_labels_set: false,
            floor_layer: RenderLayer::Base,
            floor_scroll: false,
        }
    }

    pub fn floor_mesh_enabled(&self) -> bool {
        self.floor_mesh_enabled
    }

    /// How many times the floor mesh setup ran
    pub fn floor_mesh_setups(&self) -> usize {
        self.floor_mesh_setups
    }

    pub fn collapsed_to(&self) -> Option<i32> {
        self.collapsed_to
    }

    pub fn hidden_above(&self) -> Option<i32> {
        self.hidden_above
    }

    pub fn floor_labels_set(&self) -> bool {
        self.floor_labels_set
    }

    pub fn floor_layer(&self) -> RenderLayer {
        self.floor_layer
    }

    pub fn set_floor_scroll(&mut self, scrolling: bool) {
        self.floor_scroll = scrolling;
    }
}

impl Default for FloorAnimator {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl ModeAnimator for FloorAnimator {
    fn enable_floor_mesh(&mut self) {
        self.floor_mesh_enabled = true;
        self.floor_mesh_setups += 1;
        debug!("Floor meshes enabled");
    }

    fn restore_building(&mut self) {
        self.collapsed_to = None;
        self.hidden_above = None;
        self.current_floor = 0;
        debug!("Building restored");
    }

    fn collapse_floors_to(&mut self, floor: i32) {
        self.collapsed_to = Some(floor);
        self.current_floor = floor;
        debug!("Collapsed floors down to {}", floor);
    }

    fn collapse_above_floor(&mut self, floor: i32) {
        self.hidden_above = Some(floor);
        self.current_floor = floor;
        debug!("Hid floors above {}", floor);
    }

    fn current_floor_height(&self) -> f32 {
        self.current_floor as f32 * self.floor_height
    }

    fn set_floor_labels(&mut self) {
        self.floor_labels_set = true;
    }

    fn set_floor_layer(&mut self, layer: RenderLayer) {
        self.floor_layer = layer;
    }

    fn current_floor(&self) -> i32 {
        self.current_floor
    }

    fn is_floor_scroll(&self) -> bool {
        self.floor_scroll
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Headless floor scroll widget
#[derive(Debug, Clone, Default)]
pub struct FloorScrollState {
    pub max_floor: Option<i32>,
}

impl FloorScroll for FloorScrollState {
    fn init_floor_scroll(&mut self, max_floor: i32) {
        self.max_floor = Some(max_floor);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_height_follows_current_floor() {
        let mut animator = FloorAnimator::new(2.5);
        assert_eq!(animator.current_floor_height(), 0.0);

        animator.collapse_floors_to(4);
        assert_eq!(animator.current_floor(), 4);
        assert_eq!(animator.current_floor_height(), 10.0);

        animator.restore_building();
        assert_eq!(animator.collapsed_to(), None);
        assert_eq!(animator.current_floor(), 0);
    }
}
