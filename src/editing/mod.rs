//! Editing functionality
//!
//! Selection, presentation modes and filtering of the building's units.

pub mod selection;

pub use selection::{BuildingCommand, SelectionController, SelectionPlugin};
