//! The building scene as seen by the controller: unit views, their registry,
//! and the animator collaborators

pub mod animator;
pub mod registry;
pub mod view;

pub use animator::{FloorAnimator, FloorScroll, FloorScrollState, ModeAnimator};
pub use registry::{BindReport, HandleId, ViewRegistry};
pub use view::{Presentation, RenderLayer, UnitView, UnitViewState, ViewCall};
