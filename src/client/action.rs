//! Actions accepted by the client reducer.

use super::state::{FilterPatch, Operation};
use crate::model::Property;

/// Every transition the client state container accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetSelectedProperty(Property),
    ClearSelectedProperty,
    SetFilters(FilterPatch),
    ResetFilters,
    ClearError,
    Pending(Operation),
    FetchFulfilled(Vec<Property>),
    CreateFulfilled(Property),
    UpdateFulfilled(Property),
    Rejected(Operation, String),
}
