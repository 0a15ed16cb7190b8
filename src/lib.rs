//! Towerview
pub mod core;
pub mod data;
pub mod editing;
pub mod logging;
pub mod scene;
pub mod systems;
