//! Runtime settings for a building scene
//!
//! Resolved once at startup from built-in defaults, the user config file and
//! the command line, then stored as a Bevy resource.

use crate::systems::init_task::DEFAULT_INIT_DELAY;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Records scanned per frame by a filter pass
pub const DEFAULT_FILTER_BATCH_SIZE: usize = 64;

/// Height of one floor in world units
pub const DEFAULT_FLOOR_HEIGHT: f32 = 3.0;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Camera angle override for a unit type when the camera rotates to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRotationException {
    pub unit_type: String,
    pub view_angle: f32,
}

/// Offset of a unit's text label from its default position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOffset {
    pub property_id: String,
    pub offset: [f32; 3],
}

#[derive(Resource, Debug, Clone)]
pub struct BuildingSettings {
    pub building_id: String,
    pub init_delay: Duration,
    pub filter_batch_size: usize,
    pub floor_height: f32,
    pub rotation_exceptions: Vec<CameraRotationException>,
    pub label_offsets: Vec<LabelOffset>,
}

impl Default for BuildingSettings {
    fn default() -> Self {
        Self {
            building_id: String::new(),
            init_delay: DEFAULT_INIT_DELAY,
            filter_batch_size: DEFAULT_FILTER_BATCH_SIZE,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            rotation_exceptions: Vec::new(),
            label_offsets: Vec::new(),
        }
    }
}

impl BuildingSettings {
    /// View angle configured for a unit type
    pub fn view_angle_for(&self, unit_type: &str) -> Option<f32> {
        self.rotation_exceptions
            .iter()
            .find(|exception| exception.unit_type == unit_type)
            .map(|exception| exception.view_angle)
    }

    /// Label offset configured for a unit, zero when none is set
    pub fn label_offset_for(&self, property_id: &str) -> Vec3 {
        self.label_offsets
            .iter()
            .find(|label| label.property_id == property_id)
            .map_or(Vec3::ZERO, |label| Vec3::from(label.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BuildingSettings::default();
        assert_eq!(settings.init_delay, Duration::from_secs(2));
        assert!(settings.filter_batch_size > 0);
        assert!(settings.floor_height > 0.0);
    }

    #[test]
    fn test_view_angle_lookup() {
        let settings = BuildingSettings {
            rotation_exceptions: vec![CameraRotationException {
                unit_type: "PH1".to_string(),
                view_angle: 35.0,
            }],
            ..Default::default()
        };
        assert_eq!(settings.view_angle_for("PH1"), Some(35.0));
        assert_eq!(settings.view_angle_for("A1"), None);
    }

    #[test]
    fn test_label_offset_lookup() {
        let settings = BuildingSettings {
            label_offsets: vec![LabelOffset {
                property_id: "P-7".to_string(),
                offset: [0.0, 1.5, -0.5],
            }],
            ..Default::default()
        };
        assert_eq!(settings.label_offset_for("P-7"), Vec3::new(0.0, 1.5, -0.5));
        assert_eq!(settings.label_offset_for("P-8"), Vec3::ZERO);
    }
}
