//! Client-side state container for property listings.
//!
//! `reduce` is the only transition function; `ClientStore` serializes dispatches and runs
//! the async API calls; `FilteredView` derives the visible records from the state.

pub mod action;
pub mod api;
pub mod reducer;
pub mod state;
pub mod store;
pub mod view;

pub use action::Action;
pub use api::{ClientError, HttpPropertyApi, Page, PropertyApi};
pub use reducer::reduce;
pub use state::{FilterCriteria, FilterPatch, Operation, PriceRange, PropertyState, RequestStatus};
pub use store::ClientStore;
pub use view::{filter_properties, FilteredView};
