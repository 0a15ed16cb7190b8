//! Filter predicates applied during a filter pass

use crate::data::units::UnitRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Decides whether a unit belongs to the filtered set
pub trait UnitPredicate: Send + Sync {
    fn matches(&self, record: &UnitRecord) -> bool;
}

impl<F> UnitPredicate for F
where
    F: Fn(&UnitRecord) -> bool + Send + Sync,
{
    fn matches(&self, record: &UnitRecord) -> bool {
        self(record)
    }
}

/// Filter settings as chosen in the search panel
///
/// Every populated field must match; an empty criteria set matches all units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub min_floor: Option<i32>,
    pub max_floor: Option<i32>,
    /// Accepted unit types, any type when empty
    pub unit_types: Vec<String>,
    pub favorites_only: bool,
    /// Attributes that must be present with exactly this value
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl FilterCriteria {
    pub fn floors(min_floor: i32, max_floor: i32) -> Self {
        Self {
            min_floor: Some(min_floor),
            max_floor: Some(max_floor),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl UnitPredicate for FilterCriteria {
    fn matches(&self, record: &UnitRecord) -> bool {
        if self.min_floor.is_some_and(|min| record.floor < min) {
            return false;
        }
        if self.max_floor.is_some_and(|max| record.floor > max) {
            return false;
        }
        if !self.unit_types.is_empty() && !self.unit_types.contains(&record.type_number) {
            return false;
        }
        if self.favorites_only && !record.is_favorite {
            return false;
        }

        self.attributes
            .iter()
            .all(|(key, expected)| record.attributes.get(key) == Some(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&UnitRecord::new("P-1", "A1", 3)));
    }

    #[test]
    fn test_floor_range() {
        let criteria = FilterCriteria::floors(2, 4);
        assert!(!criteria.matches(&UnitRecord::new("P-1", "A1", 1)));
        assert!(criteria.matches(&UnitRecord::new("P-2", "A1", 2)));
        assert!(criteria.matches(&UnitRecord::new("P-3", "A1", 4)));
        assert!(!criteria.matches(&UnitRecord::new("P-4", "A1", 5)));
    }

    #[test]
    fn test_types_favorites_and_attributes() {
        let criteria = FilterCriteria {
            unit_types: vec!["B2".to_string()],
            favorites_only: true,
            attributes: BTreeMap::from([("rooms".to_string(), json!(4))]),
            ..Default::default()
        };

        let matching = UnitRecord::new("P-1", "B2", 3)
            .favorite()
            .with_attribute("rooms", json!(4));
        assert!(criteria.matches(&matching));

        let wrong_rooms = UnitRecord::new("P-2", "B2", 3)
            .favorite()
            .with_attribute("rooms", json!(3));
        assert!(!criteria.matches(&wrong_rooms));

        let not_favorite = UnitRecord::new("P-3", "B2", 3).with_attribute("rooms", json!(4));
        assert!(!criteria.matches(&not_favorite));
    }

    #[test]
    fn test_closures_are_predicates() {
        let even_floors = |record: &UnitRecord| record.floor % 2 == 0;
        assert!(even_floors.matches(&UnitRecord::new("P-1", "A1", 2)));
        assert!(!even_floors.matches(&UnitRecord::new("P-2", "A1", 3)));
    }

    #[test]
    fn test_criteria_deserialize_with_defaults() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{ "min_floor": 3, "unit_types": ["A1"] }"#).unwrap();
        assert_eq!(criteria.min_floor, Some(3));
        assert_eq!(criteria.max_floor, None);
        assert!(!criteria.favorites_only);
    }
}
