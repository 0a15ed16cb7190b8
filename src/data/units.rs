//! Apartment records and the ordered directory that holds them

use crate::core::errors::{ControllerError, ControllerResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One apartment of the building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unique property id
    pub property_id: String,
    /// Unit type number, shared with the view that represents it
    pub type_number: String,
    pub floor: i32,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_filtered: bool,
    /// Free-form attributes consulted by filter predicates (price, rooms, ...)
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl UnitRecord {
    pub fn new(property_id: impl Into<String>, type_number: impl Into<String>, floor: i32) -> Self {
        Self {
            property_id: property_id.into(),
            type_number: type_number.into(),
            floor,
            is_favorite: false,
            is_filtered: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    /// Label shown next to the unit on its floor
    pub fn floor_label(&self) -> String {
        format!("Floor {}", self.floor)
    }
}

/// Ordered collection of unit records, unique by property id
#[derive(Debug, Clone, Default)]
pub struct UnitDirectory {
    records: Vec<UnitRecord>,
    by_property: HashMap<String, usize>,
}

impl UnitDirectory {
    /// Build a directory, rejecting duplicate property ids
    pub fn new(records: Vec<UnitRecord>) -> ControllerResult<Self> {
        let mut by_property = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if by_property
                .insert(record.property_id.clone(), index)
                .is_some()
            {
                return Err(ControllerError::DuplicatePropertyId(
                    record.property_id.clone(),
                ));
            }
        }

        Ok(Self {
            records,
            by_property,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[UnitRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&UnitRecord> {
        self.records.get(index)
    }

    pub fn find_by_property_id(&self, property_id: &str) -> Option<&UnitRecord> {
        self.by_property
            .get(property_id)
            .and_then(|&index| self.records.get(index))
    }

    pub fn find_by_property_id_mut(&mut self, property_id: &str) -> Option<&mut UnitRecord> {
        self.by_property
            .get(property_id)
            .copied()
            .and_then(|index| self.records.get_mut(index))
    }

    /// First record in directory order with the given type number
    pub fn find_by_type(&self, type_number: &str) -> Option<&UnitRecord> {
        self.records
            .iter()
            .find(|record| record.type_number == type_number)
    }

    /// Highest floor number across all records
    pub fn max_floor(&self) -> Option<i32> {
        self.records.iter().map(|record| record.floor).max()
    }
}

impl<'a> IntoIterator for &'a UnitDirectory {
    type Item = &'a UnitRecord;
    type IntoIter = std::slice::Iter<'a, UnitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UnitDirectory {
        UnitDirectory::new(vec![
            UnitRecord::new("P-1", "A1", 1),
            UnitRecord::new("P-2", "B2", 4),
            UnitRecord::new("P-3", "A1", 7),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_property_ids_are_rejected() {
        let result = UnitDirectory::new(vec![
            UnitRecord::new("P-1", "A1", 1),
            UnitRecord::new("P-1", "B2", 2),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ControllerError::DuplicatePropertyId("P-1".to_string())
        );
    }

    #[test]
    fn test_lookup_by_type_returns_first_match() {
        let directory = sample();
        let record = directory.find_by_type("A1").unwrap();
        assert_eq!(record.property_id, "P-1");
        assert!(directory.find_by_type("Z9").is_none());
    }

    #[test]
    fn test_lookup_by_property_id() {
        let directory = sample();
        assert_eq!(directory.find_by_property_id("P-2").unwrap().floor, 4);
        assert!(directory.find_by_property_id("missing").is_none());
    }

    #[test]
    fn test_record_is_mutable_by_property_id() {
        let mut directory = sample();
        directory.find_by_property_id_mut("P-3").unwrap().is_favorite = true;
        assert!(directory.find_by_property_id("P-3").unwrap().is_favorite);
        assert!(directory.find_by_property_id_mut("missing").is_none());
    }

    #[test]
    fn test_max_floor() {
        assert_eq!(sample().max_floor(), Some(7));
        assert_eq!(UnitDirectory::default().max_floor(), None);
    }

    #[test]
    fn test_floor_label() {
        assert_eq!(UnitRecord::new("P-9", "C3", 12).floor_label(), "Floor 12");
    }
}
