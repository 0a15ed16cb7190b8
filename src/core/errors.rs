//! Error types for the building controller
//!
//! Controller operations return [`ControllerResult`]. Every failure is logged
//! where it happens, so callers that only care about the visual outcome can
//! drop the error, while callers that need to tell "missing data" from "no
//! matching view" can match on it.

use crate::scene::HandleId;
use thiserror::Error;

/// Failures raised by the selection controller and the data model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The data provider has no unit directory loaded yet
    #[error("no unit directory available from the data provider")]
    MissingData,

    /// No view is bound to the requested property
    #[error("no view bound to property '{property_id}'")]
    HandleNotFound { property_id: String },

    /// A handle id that does not belong to the registry
    #[error("view handle {0:?} is not registered")]
    UnknownHandle(HandleId),

    /// Two records in a directory share a property id
    #[error("duplicate property id '{0}' in unit directory")]
    DuplicatePropertyId(String),
}

impl ControllerError {
    pub fn handle_not_found(property_id: impl Into<String>) -> Self {
        Self::HandleNotFound {
            property_id: property_id.into(),
        }
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;
