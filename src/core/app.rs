//! Application initialization and configuration

use crate::core::settings::BuildingSettings;
use crate::data::provider::BuildingData;
use crate::editing::selection::SelectionController;
use crate::logging::{self, FileLogging};
use crate::scene::{FloorAnimator, FloorScrollState, UnitViewState, ViewRegistry};
use crate::systems::{BuildingSystems, DelayedInit};
use bevy::log::Level;
use bevy::prelude::*;

/// How the app should log
#[derive(Debug, Clone, Copy)]
pub struct LogOptions {
    pub level: Level,
    /// Mirror logs into the rolling log file
    pub to_file: bool,
}

/// Build the controller for a scene whose views declare `view_types`
pub fn build_controller(settings: &BuildingSettings, view_types: &[String]) -> SelectionController {
    let mut registry = ViewRegistry::new();
    for unit_type in view_types {
        registry.register(Box::new(UnitViewState::new(unit_type.clone())));
    }
    debug!("Registered {} unit views", registry.len());

    SelectionController::new(
        settings.clone(),
        registry,
        Box::new(FloorAnimator::new(settings.floor_height)),
        Box::new(FloorScrollState::default()),
    )
}

/// Creates a headless Bevy application for one building scene
pub fn create_app(
    settings: BuildingSettings,
    data: BuildingData,
    view_types: &[String],
    log: Option<LogOptions>,
) -> App {
    let mut app = App::new();
    configure_resources(&mut app, settings, data, view_types);

    if let Some(log) = log {
        // The file layer is attached only if this marker exists when the
        // log plugin builds.
        if log.to_file {
            app.insert_resource(FileLogging);
        }
        app.add_plugins(logging::configure_logging(log.level));
    }

    app.add_plugins((MinimalPlugins, BuildingSystems));
    app
}

/// Sets up the scene resources
fn configure_resources(
    app: &mut App,
    settings: BuildingSettings,
    data: BuildingData,
    view_types: &[String],
) {
    let controller = build_controller(&settings, view_types);
    app.insert_resource(DelayedInit::new(settings.init_delay))
        .insert_resource(controller)
        .insert_resource(data)
        .insert_resource(settings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_has_one_view_per_type() {
        let settings = BuildingSettings::default();
        let types = vec!["A1".to_string(), "B2".to_string()];
        let controller = build_controller(&settings, &types);

        assert_eq!(controller.registry().len(), 2);
        let declared: Vec<_> = controller
            .registry()
            .iter()
            .map(|(_, view)| view.declared_type().to_string())
            .collect();
        assert_eq!(declared, types);
    }

    #[test]
    fn test_app_holds_scene_resources() {
        let app = create_app(
            BuildingSettings::default(),
            BuildingData::default(),
            &[],
            None,
        );
        let world = app.world();
        assert!(world.contains_resource::<SelectionController>());
        assert!(world.contains_resource::<BuildingData>());
        assert!(world.resource::<DelayedInit>().is_pending());
    }
}
