//! HTTP handlers for property CRUD.

pub mod property;
pub use property::*;
