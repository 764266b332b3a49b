//! Client state container: the single writer of `PropertyState`.
//!
//! Async operations dispatch `Pending`, await the API, then dispatch the outcome. In-flight
//! requests are never cancelled, so when two overlap the later response wins.

use super::action::Action;
use super::api::{ClientError, PropertyApi};
use super::reducer::reduce;
use super::state::{Operation, PropertyState};
use crate::model::{NewProperty, Property, PropertyId, PropertyPatch};
use crate::service::query::ListParams;
use std::sync::{Mutex, MutexGuard};

pub struct ClientStore<A> {
    api: A,
    state: Mutex<PropertyState>,
}

impl<A: PropertyApi> ClientStore<A> {
    pub fn new(api: A) -> Self {
        Self::with_state(api, PropertyState::default())
    }

    pub fn with_state(api: A, state: PropertyState) -> Self {
        ClientStore {
            api,
            state: Mutex::new(state),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, PropertyState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PropertyState {
        self.lock().clone()
    }

    /// Apply one action atomically as a whole-state replacement.
    pub fn dispatch(&self, action: Action) {
        let mut guard = self.lock();
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, action);
    }

    fn reject(&self, op: Operation, err: &ClientError) {
        tracing::warn!(?op, error = %err, "request failed");
        self.dispatch(Action::Rejected(op, err.to_string()));
    }

    /// Replace the record list with the requested page only (server default `limit` is 10).
    /// Use `fetch_all_properties` when the filtered view should see every record.
    pub async fn fetch_properties(&self, params: &ListParams) -> Result<Vec<Property>, ClientError> {
        self.dispatch(Action::Pending(Operation::Fetch));
        match self.api.list(params).await {
            Ok(page) => {
                self.dispatch(Action::FetchFulfilled(page.records.clone()));
                Ok(page.records)
            }
            Err(e) => {
                self.reject(Operation::Fetch, &e);
                Err(e)
            }
        }
    }

    /// Replace the record list with every page matching `params`, following `totalPages`.
    /// `params.page` is ignored; `params.limit` sets the page size of each request.
    pub async fn fetch_all_properties(&self, params: &ListParams) -> Result<Vec<Property>, ClientError> {
        self.dispatch(Action::Pending(Operation::Fetch));
        match self.collect_pages(params).await {
            Ok(records) => {
                self.dispatch(Action::FetchFulfilled(records.clone()));
                Ok(records)
            }
            Err(e) => {
                self.reject(Operation::Fetch, &e);
                Err(e)
            }
        }
    }

    async fn collect_pages(&self, params: &ListParams) -> Result<Vec<Property>, ClientError> {
        let mut params = params.clone();
        let mut records = Vec::new();
        let mut page: u64 = 1;
        loop {
            params.page = Some(page.to_string());
            let batch = self.api.list(&params).await?;
            let last = batch.records.is_empty() || page >= batch.pagination.total_pages;
            records.extend(batch.records);
            if last {
                return Ok(records);
            }
            page += 1;
        }
    }

    pub async fn create_property(&self, new: &NewProperty) -> Result<Property, ClientError> {
        self.dispatch(Action::Pending(Operation::Create));
        match self.api.create(new).await {
            Ok(p) => {
                self.dispatch(Action::CreateFulfilled(p.clone()));
                Ok(p)
            }
            Err(e) => {
                self.reject(Operation::Create, &e);
                Err(e)
            }
        }
    }

    pub async fn update_property(&self, id: &PropertyId, patch: &PropertyPatch) -> Result<Property, ClientError> {
        self.dispatch(Action::Pending(Operation::Update));
        match self.api.update(id, patch).await {
            Ok(p) => {
                self.dispatch(Action::UpdateFulfilled(p.clone()));
                Ok(p)
            }
            Err(e) => {
                self.reject(Operation::Update, &e);
                Err(e)
            }
        }
    }
}
