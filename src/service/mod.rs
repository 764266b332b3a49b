//! Request-level services: body validation and list query building.

pub mod query;
mod validation;

pub use query::{build_property_query, ListParams, PropertyQuery};
pub use validation::{PropertyValidator, DESCRIPTION_MIN_LENGTH};
