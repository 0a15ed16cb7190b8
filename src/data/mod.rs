//! Building data: unit records, the data provider seam and filter predicates

pub mod filter;
pub mod fixture;
pub mod provider;
pub mod units;

pub use filter::{FilterCriteria, UnitPredicate};
pub use fixture::{load_fixture_from_path, SceneFixture};
pub use provider::{BuildingData, DataProvider, FilteredResults};
pub use units::{UnitDirectory, UnitRecord};
