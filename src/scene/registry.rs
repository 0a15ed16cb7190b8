//! Registry of the unit views found in the building scene
//!
//! Views live in an arena and are addressed by [`HandleId`]. Two indexes give
//! constant-time lookup: declared unit type (fixed at registration) and the
//! property id of the bound record (rebuilt on every bind).

use crate::core::errors::{ControllerError, ControllerResult};
use crate::data::units::UnitDirectory;
use crate::scene::view::UnitView;
use bevy::prelude::*;
use std::collections::HashMap;

/// Index of a view in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(usize);

impl HandleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Result of binding the directory to the registered views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindReport {
    pub bound: usize,
    pub unbound: usize,
}

#[derive(Default)]
pub struct ViewRegistry {
    views: Vec<Box<dyn UnitView>>,
    by_type: HashMap<String, HandleId>,
    by_property: HashMap<String, HandleId>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view; the first view registered for a type wins type lookups
    pub fn register(&mut self, view: Box<dyn UnitView>) -> HandleId {
        let id = HandleId(self.views.len());
        self.by_type
            .entry(view.declared_type().to_string())
            .or_insert(id);
        if let Some(record) = view.record() {
            self.by_property
                .entry(record.property_id.clone())
                .or_insert(id);
        }
        self.views.push(view);
        id
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn contains(&self, id: HandleId) -> bool {
        id.0 < self.views.len()
    }

    pub fn get(&self, id: HandleId) -> Option<&dyn UnitView> {
        self.views.get(id.0).map(|view| view.as_ref())
    }

    pub fn get_mut(&mut self, id: HandleId) -> Option<&mut (dyn UnitView + 'static)> {
        self.views.get_mut(id.0).map(|view| view.as_mut())
    }

    /// Downcast a view to its concrete type
    pub fn get_as<T: UnitView>(&self, id: HandleId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn try_get_mut(&mut self, id: HandleId) -> ControllerResult<&mut (dyn UnitView + 'static)> {
        self.get_mut(id).ok_or(ControllerError::UnknownHandle(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = HandleId> + '_ {
        (0..self.views.len()).map(HandleId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (HandleId, &dyn UnitView)> + '_ {
        self.views
            .iter()
            .enumerate()
            .map(|(index, view)| (HandleId(index), view.as_ref()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (HandleId, &mut Box<dyn UnitView>)> + '_ {
        self.views
            .iter_mut()
            .enumerate()
            .map(|(index, view)| (HandleId(index), view))
    }

    /// View bound to the given property id
    pub fn find_by_property(&self, property_id: &str) -> Option<HandleId> {
        self.by_property.get(property_id).copied()
    }

    /// First bound view whose record has the given type number
    pub fn find_bound_by_type(&self, type_number: &str) -> Option<HandleId> {
        self.by_type.get(type_number).copied().filter(|id| {
            self.get(*id)
                .and_then(|view| view.record())
                .is_some_and(|record| record.type_number == type_number)
        })
    }

    /// Bind every view to the first record of its declared type
    ///
    /// Views without a matching record are unbound, which is tolerated.
    pub fn bind_all(&mut self, directory: &UnitDirectory) -> BindReport {
        let mut report = BindReport::default();
        self.by_property.clear();

        for (index, view) in self.views.iter_mut().enumerate() {
            let record = directory.find_by_type(view.declared_type()).cloned();
            match &record {
                Some(record) => {
                    self.by_property
                        .entry(record.property_id.clone())
                        .or_insert(HandleId(index));
                    report.bound += 1;
                }
                None => {
                    debug!("No unit record for view type '{}'", view.declared_type());
                    report.unbound += 1;
                }
            }
            view.bind(record);
        }

        report
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views.len())
            .field("bound", &self.by_property.len())
            .finish()
    }
}
