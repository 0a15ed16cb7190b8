//! JSON snapshot of a building scene, printed by the runner

use crate::data::provider::{BuildingData, DataProvider};
use crate::editing::selection::SelectionController;
use crate::scene::{Presentation, RenderLayer, UnitView, UnitViewState};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BuildingReport {
    pub building_id: String,
    pub generated_at: String,
    pub active: bool,
    pub initialized: bool,
    pub mode: String,
    pub current_floor: i32,
    pub floor_height: f32,
    /// Property id of the selected unit
    pub selection: Option<String>,
    pub filter: FilterReport,
    pub units: Vec<UnitReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub enabled: bool,
    pub running: bool,
    pub published: Option<usize>,
    pub matches: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub declared_type: String,
    pub property_id: Option<String>,
    pub floor: Option<i32>,
    pub favorite: bool,
    pub filtered: bool,
    pub presentation: Option<Presentation>,
    pub floor_label: Option<String>,
    pub label_offset: Option<[f32; 3]>,
    pub layer: Option<RenderLayer>,
}

impl BuildingReport {
    pub fn capture(controller: &SelectionController, data: &BuildingData) -> Self {
        let results = data.filtered_results();
        let directory = data.unit_directory();

        let units = controller
            .registry()
            .iter()
            .map(|(id, view)| {
                let headless = controller.registry().get_as::<UnitViewState>(id);
                UnitReport {
                    declared_type: view.declared_type().to_string(),
                    property_id: view.record().map(|r| r.property_id.clone()),
                    floor: view.floor(),
                    favorite: view
                        .record()
                        .and_then(|bound| {
                            directory
                                .as_ref()?
                                .find_by_property_id(&bound.property_id)
                        })
                        .is_some_and(|record| record.is_favorite),
                    filtered: view.is_filtered(),
                    presentation: headless.map(UnitViewState::presentation),
                    floor_label: headless
                        .and_then(UnitViewState::floor_label_text)
                        .map(str::to_string),
                    label_offset: headless.map(|state| state.label_offset().to_array()),
                    layer: headless.map(UnitViewState::layer),
                }
            })
            .collect();

        Self {
            building_id: controller.building_id().to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            active: controller.is_active(),
            initialized: controller.is_initialized(),
            mode: controller.mode().name().to_string(),
            current_floor: controller.current_floor(),
            floor_height: controller.current_floor_height(),
            selection: controller
                .selected_view()
                .and_then(|view| view.record())
                .map(|r| r.property_id.clone()),
            filter: FilterReport {
                enabled: results.is_enabled(),
                running: controller.is_filter_running(),
                published: results.published_count(),
                matches: results
                    .matches()
                    .iter()
                    .map(|r| r.property_id.clone())
                    .collect(),
            },
            units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::build_controller;
    use crate::core::settings::BuildingSettings;
    use crate::data::units::{UnitDirectory, UnitRecord};

    #[test]
    fn test_capture_lists_every_view() {
        let settings = BuildingSettings {
            building_id: "tower".to_string(),
            ..Default::default()
        };
        let mut controller =
            build_controller(&settings, &["A1".to_string(), "ZZ".to_string()]);
        let directory = UnitDirectory::new(vec![UnitRecord::new("P-1", "A1", 2)]).unwrap();
        let data = BuildingData::new(Some(directory), Vec::new());
        controller.init_building(&data).unwrap();

        let report = BuildingReport::capture(&controller, &data);
        assert_eq!(report.building_id, "tower");
        assert_eq!(report.mode, "Hemisphere");
        assert_eq!(report.units.len(), 2);
        assert_eq!(report.units[0].property_id.as_deref(), Some("P-1"));
        assert_eq!(report.units[0].floor_label.as_deref(), Some("Floor 2"));
        assert_eq!(report.units[1].property_id, None);
        assert!(report.selection.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["units"][0]["presentation"], "Idle");
    }

    #[test]
    fn test_favorite_follows_provider_data() {
        let settings = BuildingSettings::default();
        let mut controller = build_controller(&settings, &["A1".to_string()]);
        let favorite = UnitRecord::new("P-1", "A1", 2).favorite();
        let directory = UnitDirectory::new(vec![favorite.clone()]).unwrap();
        let mut data = BuildingData::new(Some(directory), vec![favorite]);
        controller.init_building(&data).unwrap();
        assert!(BuildingReport::capture(&controller, &data).units[0].favorite);

        // Cleared in the provider only, the view copy is stale
        data.clear_favorite("P-1");
        assert!(controller.registry().iter().all(|(_, view)| view
            .record()
            .is_some_and(|record| record.is_favorite)));
        assert!(!BuildingReport::capture(&controller, &data).units[0].favorite);
    }
}
