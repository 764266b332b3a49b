//! Client-side state: fetched records, selection, request status, error, filter criteria.

use crate::model::{Property, PropertyStatus};

pub const DEFAULT_MAX_PRICE: f64 = 1_000_000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The asynchronous operations the container tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
}

/// Independent status per operation so concurrent requests can be told apart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationStatus {
    pub fetch: RequestStatus,
    pub create: RequestStatus,
    pub update: RequestStatus,
}

impl OperationStatus {
    pub fn get(&self, op: Operation) -> RequestStatus {
        match op {
            Operation::Fetch => self.fetch,
            Operation::Create => self.create,
            Operation::Update => self.update,
        }
    }

    pub fn set(&mut self, op: Operation, status: RequestStatus) {
        match op {
            Operation::Fetch => self.fetch = status,
            Operation::Create => self.create = status,
            Operation::Update => self.update = status,
        }
    }

    pub fn any_loading(&self) -> bool {
        [self.fetch, self.create, self.update].contains(&RequestStatus::Loading)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange {
            min: 0.0,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

/// Ephemeral, client-only predicate state for the derived view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    /// Empty means every status.
    pub status: Vec<PropertyStatus>,
    pub price_range: PriceRange,
    /// Substring of city or state; empty matches everything.
    pub location: String,
}

/// Shallow merge onto `FilterCriteria`; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterPatch {
    pub status: Option<Vec<PropertyStatus>>,
    pub price_range: Option<PriceRange>,
    pub location: Option<String>,
}

impl FilterCriteria {
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(price_range) = patch.price_range {
            self.price_range = price_range;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyState {
    pub properties: Vec<Property>,
    pub selected_property: Option<Property>,
    pub status: OperationStatus,
    /// Single notification surface: the most recent failure message.
    pub error: Option<String>,
    pub filters: FilterCriteria,
    /// Bumped whenever `properties` changes; keys derived-view caches.
    pub revision: u64,
}

impl PropertyState {
    pub fn is_loading(&self) -> bool {
        self.status.any_loading()
    }
}
