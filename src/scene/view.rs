//! Per-unit view objects
//!
//! A view is the on-screen representative of one apartment. The controller
//! talks to views only through [`UnitView`]; [`UnitViewState`] is the headless
//! implementation used by the runner and by tests, which keeps a journal of
//! every call it receives.

use crate::data::units::UnitRecord;
use bevy::math::Vec3;
use serde::Serialize;
use std::any::Any;

/// Render layer a scene object is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RenderLayer {
    #[default]
    Base,
    /// Layer seen by the cylinder camera
    Cylinder,
}

impl RenderLayer {
    /// Engine layer index
    pub fn index(&self) -> u8 {
        match self {
            RenderLayer::Base => 0,
            RenderLayer::Cylinder => 13,
        }
    }
}

/// Capabilities the controller needs from a unit view
pub trait UnitView: Send + Sync + 'static {
    /// Unit type this view was authored for
    fn declared_type(&self) -> &str;

    /// Attach a record, or detach with `None`
    fn bind(&mut self, record: Option<UnitRecord>);

    fn record(&self) -> Option<&UnitRecord>;

    fn record_mut(&mut self) -> Option<&mut UnitRecord>;

    /// Floor of the bound record
    fn floor(&self) -> Option<i32> {
        self.record().map(|record| record.floor)
    }

    fn clear_highlight(&mut self);

    fn select_in_cylinder(&mut self, rotate: bool);

    fn select_floor_mesh(&mut self);

    fn deselect(&mut self);

    fn deselect_floor_mesh(&mut self);

    fn set_filtered(&mut self, filtered: bool);

    fn is_filtered(&self) -> bool;

    fn render_filtered(&mut self);

    /// Show the floor label, shifted by `offset` from its default position
    fn set_floor_label(&mut self, offset: Vec3);

    fn set_render_layer(&mut self, layer: RenderLayer);

    fn as_any(&self) -> &dyn Any;
}

/// What a headless view currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Presentation {
    #[default]
    Idle,
    SelectedInCylinder,
    SelectedFloorMesh,
    Filtered,
}

/// A call received by a headless view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Bind(Option<String>),
    ClearHighlight,
    SelectInCylinder { rotate: bool },
    SelectFloorMesh,
    Deselect,
    DeselectFloorMesh,
    SetFiltered(bool),
    RenderFiltered,
    SetFloorLabel,
    SetRenderLayer(RenderLayer),
}

/// Headless view that records its state and every call
#[derive(Debug, Clone, Default)]
pub struct UnitViewState {
    declared_type: String,
    record: Option<UnitRecord>,
    presentation: Presentation,
    filtered: bool,
    floor_label: Option<String>,
    label_offset: Vec3,
    layer: RenderLayer,
    calls: Vec<ViewCall>,
}

impl UnitViewState {
    pub fn new(declared_type: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
            ..Default::default()
        }
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn floor_label_text(&self) -> Option<&str> {
        self.floor_label.as_deref()
    }

    pub fn label_offset(&self) -> Vec3 {
        self.label_offset
    }

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn calls(&self) -> &[ViewCall] {
        &self.calls
    }

    /// How many times `call` was received
    pub fn count(&self, call: &ViewCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl UnitView for UnitViewState {
    fn declared_type(&self) -> &str {
        &self.declared_type
    }

    fn bind(&mut self, record: Option<UnitRecord>) {
        self.calls
            .push(ViewCall::Bind(record.as_ref().map(|r| r.property_id.clone())));
        self.record = record;
    }

    fn record(&self) -> Option<&UnitRecord> {
        self.record.as_ref()
    }

    fn record_mut(&mut self) -> Option<&mut UnitRecord> {
        self.record.as_mut()
    }

    fn clear_highlight(&mut self) {
        self.calls.push(ViewCall::ClearHighlight);
        if self.presentation == Presentation::Filtered {
            self.presentation = Presentation::Idle;
        }
    }

    fn select_in_cylinder(&mut self, rotate: bool) {
        self.calls.push(ViewCall::SelectInCylinder { rotate });
        self.presentation = Presentation::SelectedInCylinder;
    }

    fn select_floor_mesh(&mut self) {
        self.calls.push(ViewCall::SelectFloorMesh);
        self.presentation = Presentation::SelectedFloorMesh;
    }

    fn deselect(&mut self) {
        self.calls.push(ViewCall::Deselect);
        self.presentation = Presentation::Idle;
    }

    fn deselect_floor_mesh(&mut self) {
        self.calls.push(ViewCall::DeselectFloorMesh);
        if self.presentation == Presentation::SelectedFloorMesh {
            self.presentation = Presentation::Idle;
        }
    }

    fn set_filtered(&mut self, filtered: bool) {
        self.calls.push(ViewCall::SetFiltered(filtered));
        self.filtered = filtered;
        if let Some(record) = self.record.as_mut() {
            record.is_filtered = filtered;
        }
    }

    fn is_filtered(&self) -> bool {
        self.filtered
    }

    fn render_filtered(&mut self) {
        self.calls.push(ViewCall::RenderFiltered);
        self.presentation = Presentation::Filtered;
    }

    fn set_floor_label(&mut self, offset: Vec3) {
        self.calls.push(ViewCall::SetFloorLabel);
        self.floor_label = self.record.as_ref().map(UnitRecord::floor_label);
        self.label_offset = offset;
    }

    fn set_render_layer(&mut self, layer: RenderLayer) {
        self.calls.push(ViewCall::SetRenderLayer(layer));
        self.layer = layer;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
