//! The data provider seam
//!
//! The unit directory, the wish-list and the filtered-results collection all
//! belong to the data provider. The controller only receives them through the
//! [`DataProvider`] trait, never through global state.

use crate::data::units::{UnitDirectory, UnitRecord};
use bevy::prelude::*;
use std::sync::Arc;

/// Access to the externally owned building data
pub trait DataProvider {
    /// The loaded directory, `None` while data is still being fetched
    fn unit_directory(&self) -> Option<Arc<UnitDirectory>>;

    /// Units the user marked as favorites
    fn wishlist(&self) -> &[UnitRecord];

    fn filtered_results(&self) -> &FilteredResults;

    fn filtered_results_mut(&mut self) -> &mut FilteredResults;

    /// Clear the favorite flag of a unit in the directory and the wish-list;
    /// returns true if any flag was set
    fn clear_favorite(&mut self, property_id: &str) -> bool;
}

/// Results collection written by filter passes
#[derive(Debug, Clone, Default)]
pub struct FilteredResults {
    enabled: bool,
    matches: Vec<UnitRecord>,
    published_count: Option<usize>,
    debug_snapshot: Vec<UnitRecord>,
}

impl FilteredResults {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether a filter is applied to the building
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Drop the matches and the debug mirror
    pub fn clear(&mut self) {
        self.matches.clear();
        self.debug_snapshot.clear();
        self.published_count = None;
    }

    pub fn push(&mut self, record: UnitRecord) {
        self.matches.push(record);
    }

    pub fn matches(&self) -> &[UnitRecord] {
        &self.matches
    }

    /// Make the current matches the final result of a pass
    pub fn publish(&mut self) {
        self.published_count = Some(self.matches.len());
        self.debug_snapshot = self.matches.clone();
    }

    /// Match count of the last completed pass
    pub fn published_count(&self) -> Option<usize> {
        self.published_count
    }

    pub fn debug_snapshot(&self) -> &[UnitRecord] {
        &self.debug_snapshot
    }
}

/// In-memory data provider, stored as a Bevy resource
#[derive(Resource, Debug, Default, Clone)]
pub struct BuildingData {
    directory: Option<Arc<UnitDirectory>>,
    wishlist: Vec<UnitRecord>,
    filtered: FilteredResults,
}

impl BuildingData {
    pub fn new(directory: Option<UnitDirectory>, wishlist: Vec<UnitRecord>) -> Self {
        Self {
            directory: directory.map(Arc::new),
            wishlist,
            filtered: FilteredResults::default(),
        }
    }

    /// Replace the directory, e.g. after the data was re-fetched
    pub fn set_directory(&mut self, directory: UnitDirectory) {
        self.directory = Some(Arc::new(directory));
    }

    pub fn set_wishlist(&mut self, wishlist: Vec<UnitRecord>) {
        self.wishlist = wishlist;
    }
}

impl DataProvider for BuildingData {
    fn unit_directory(&self) -> Option<Arc<UnitDirectory>> {
        self.directory.clone()
    }

    fn wishlist(&self) -> &[UnitRecord] {
        &self.wishlist
    }

    fn filtered_results(&self) -> &FilteredResults {
        &self.filtered
    }

    fn filtered_results_mut(&mut self) -> &mut FilteredResults {
        &mut self.filtered
    }

    fn clear_favorite(&mut self, property_id: &str) -> bool {
        let mut cleared = false;

        if let Some(directory) = self.directory.as_mut() {
            let is_favorite = directory
                .find_by_property_id(property_id)
                .is_some_and(|record| record.is_favorite);
            // Views and running filter passes keep the directory they hold
            if is_favorite {
                if let Some(record) = Arc::make_mut(directory).find_by_property_id_mut(property_id) {
                    record.is_favorite = false;
                    cleared = true;
                }
            }
        }

        for record in self
            .wishlist
            .iter_mut()
            .filter(|record| record.property_id == property_id && record.is_favorite)
        {
            record.is_favorite = false;
            cleared = true;
        }

        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_clear() {
        let mut results = FilteredResults::default();
        results.push(UnitRecord::new("P-1", "A1", 1));
        results.push(UnitRecord::new("P-2", "A1", 2));
        assert_eq!(results.published_count(), None);

        results.publish();
        assert_eq!(results.published_count(), Some(2));
        assert_eq!(results.debug_snapshot().len(), 2);

        results.clear();
        assert!(results.matches().is_empty());
        assert!(results.debug_snapshot().is_empty());
        assert_eq!(results.published_count(), None);
    }

    #[test]
    fn test_clear_favorite_updates_directory_and_wishlist() {
        let favorite = UnitRecord::new("P-1", "A1", 1).favorite();
        let directory =
            UnitDirectory::new(vec![favorite.clone(), UnitRecord::new("P-2", "B2", 2)]).unwrap();
        let mut data = BuildingData::new(Some(directory), vec![favorite]);
        let before = data.unit_directory().unwrap();

        assert!(data.clear_favorite("P-1"));
        assert!(!data.clear_favorite("P-1"));
        assert!(!data.clear_favorite("P-2"));

        let after = data.unit_directory().unwrap();
        assert!(!after.find_by_property_id("P-1").unwrap().is_favorite);
        assert!(!data.wishlist()[0].is_favorite);
        // Holders of the old directory are not affected
        assert!(before.find_by_property_id("P-1").unwrap().is_favorite);
    }

    #[test]
    fn test_building_data_without_directory() {
        let data = BuildingData::default();
        assert!(data.unit_directory().is_none());
        assert!(data.wishlist().is_empty());
        assert!(!data.filtered_results().is_enabled());
    }
}
