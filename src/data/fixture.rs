//! Scene fixture I/O
//!
//! A fixture describes one building for the headless runner: its id, the unit
//! records the data provider would serve, the unit types of the views found in
//! the scene, and the wish-list.

use crate::data::provider::BuildingData;
use crate::data::units::{UnitDirectory, UnitRecord};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFixture {
    pub building_id: String,
    /// `None` models a provider that has not delivered data yet
    #[serde(default)]
    pub units: Option<Vec<UnitRecord>>,
    /// Declared unit type of every view in the scene, in scene order
    #[serde(default)]
    pub views: Vec<String>,
    /// Property ids on the wish-list
    #[serde(default)]
    pub wishlist: Vec<String>,
}

impl SceneFixture {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid scene fixture JSON")
    }

    /// Build the data provider, validating the directory and resolving the
    /// wish-list ids against it. Wish-listed units are marked as favorites in
    /// the directory too; unknown wish-list ids are dropped.
    pub fn building_data(&self) -> Result<BuildingData> {
        let units = self.units.clone().map(|units| {
            units
                .into_iter()
                .map(|mut record| {
                    if self.wishlist.contains(&record.property_id) {
                        record.is_favorite = true;
                    }
                    record
                })
                .collect::<Vec<_>>()
        });

        let directory = units
            .map(UnitDirectory::new)
            .transpose()
            .with_context(|| format!("Invalid unit directory for building '{}'", self.building_id))?;

        let wishlist = directory
            .as_ref()
            .map(|directory| {
                self.wishlist
                    .iter()
                    .filter_map(|id| directory.find_by_property_id(id).cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(BuildingData::new(directory, wishlist))
    }
}

/// Load a scene fixture from disk
pub fn load_fixture_from_path(path: impl AsRef<Path>) -> Result<SceneFixture> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene fixture {}", path.display()))?;
    SceneFixture::from_json(&contents)
        .with_context(|| format!("Failed to parse scene fixture {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::DataProvider;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "building_id": "north-tower",
        "units": [
            { "property_id": "P-1", "type_number": "A1", "floor": 1 },
            { "property_id": "P-2", "type_number": "B2", "floor": 2 }
        ],
        "views": ["A1", "B2", "C3"],
        "wishlist": ["P-2", "P-404"]
    }"#;

    #[test]
    fn test_load_fixture_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let fixture = load_fixture_from_path(file.path()).unwrap();
        assert_eq!(fixture.building_id, "north-tower");
        assert_eq!(fixture.views, vec!["A1", "B2", "C3"]);

        let data = fixture.building_data().unwrap();
        assert_eq!(data.unit_directory().unwrap().len(), 2);
        assert_eq!(data.wishlist().len(), 1);
        assert!(data.wishlist()[0].is_favorite);

        let directory = data.unit_directory().unwrap();
        assert!(directory.find_by_property_id("P-2").unwrap().is_favorite);
        assert!(!directory.find_by_property_id("P-1").unwrap().is_favorite);
    }

    #[test]
    fn test_fixture_without_units() {
        let fixture = SceneFixture::from_json(r#"{ "building_id": "empty" }"#).unwrap();
        let data = fixture.building_data().unwrap();
        assert!(data.unit_directory().is_none());
        assert!(data.wishlist().is_empty());
    }

    #[test]
    fn test_fixture_with_duplicate_ids_fails() {
        let fixture = SceneFixture::from_json(
            r#"{
                "building_id": "dup",
                "units": [
                    { "property_id": "P-1", "type_number": "A1", "floor": 1 },
                    { "property_id": "P-1", "type_number": "A2", "floor": 2 }
                ]
            }"#,
        )
        .unwrap();
        assert!(fixture.building_data().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let error = load_fixture_from_path("/nonexistent/scene.json").unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/scene.json"));
    }
}
