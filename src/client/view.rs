//! Derived, memoized view of the records under the current filter criteria.

use super::state::{FilterCriteria, PropertyState};
use crate::model::Property;

pub fn matches_criteria(p: &Property, criteria: &FilterCriteria) -> bool {
    if !criteria.status.is_empty() && !criteria.status.contains(&p.status) {
        return false;
    }
    if p.price < criteria.price_range.min || p.price > criteria.price_range.max {
        return false;
    }
    if !criteria.location.is_empty() {
        let needle = criteria.location.to_lowercase();
        if !p.location.city.to_lowercase().contains(&needle) && !p.location.state.to_lowercase().contains(&needle) {
            return false;
        }
    }
    true
}

pub fn filter_properties(properties: &[Property], criteria: &FilterCriteria) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| matches_criteria(p, criteria))
        .cloned()
        .collect()
}

/// Recomputes only when the record revision or the filter criteria change.
#[derive(Debug, Default)]
pub struct FilteredView {
    cache: Option<(u64, FilterCriteria, Vec<Property>)>,
    recomputations: usize,
}

impl FilteredView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, state: &PropertyState) -> &[Property] {
        let fresh = matches!(
            &self.cache,
            Some((rev, filters, _)) if *rev == state.revision && *filters == state.filters
        );
        if !fresh {
            let items = filter_properties(&state.properties, &state.filters);
            self.cache = Some((state.revision, state.filters.clone(), items));
            self.recomputations += 1;
        }
        match &self.cache {
            Some((_, _, items)) => items.as_slice(),
            None => &[],
        }
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::action::Action;
    use crate::client::reducer::reduce;
    use crate::client::state::{FilterPatch, PriceRange};
    use crate::model::{Location, NewProperty, PropertyId, PropertyStatus};
    use chrono::Utc;

    fn property(city: &str, state: &str, price: f64, status: PropertyStatus) -> Property {
        Property::from_new(
            PropertyId::new(),
            NewProperty {
                title: format!("{city} home"),
                description: "Somewhere to live".into(),
                price,
                location: Location {
                    address: "1 Main St".into(),
                    city: city.into(),
                    state: state.into(),
                    zip_code: "00000".into(),
                },
                features: vec![],
                images: vec![],
                status,
            },
            Utc::now(),
        )
    }

    fn seeded() -> PropertyState {
        reduce(
            PropertyState::default(),
            Action::FetchFulfilled(vec![
                property("New York", "NY", 250_000.0, PropertyStatus::Available),
                property("Los Angeles", "CA", 450_000.0, PropertyStatus::Rented),
                property("Albany", "NY", 2_000_000.0, PropertyStatus::Available),
            ]),
        )
    }

    #[test]
    fn default_criteria_apply_price_ceiling() {
        let state = seeded();
        let mut view = FilteredView::new();
        assert_eq!(view.get(&state).len(), 2);
    }

    #[test]
    fn filters_by_status_and_location() {
        let state = reduce(
            seeded(),
            Action::SetFilters(FilterPatch {
                status: Some(vec![PropertyStatus::Available]),
                location: Some("ny".into()),
                price_range: Some(PriceRange { min: 0.0, max: 5_000_000.0 }),
            }),
        );
        let mut view = FilteredView::new();
        let cities: Vec<_> = view.get(&state).iter().map(|p| p.location.city.clone()).collect();
        assert_eq!(cities, vec!["New York", "Albany"]);
    }

    #[test]
    fn memoizes_until_inputs_change() {
        let state = seeded();
        let mut view = FilteredView::new();
        view.get(&state);
        view.get(&state);
        assert_eq!(view.recomputations(), 1);

        let state = reduce(state, Action::ClearError);
        view.get(&state);
        assert_eq!(view.recomputations(), 1);

        let state = reduce(
            state,
            Action::SetFilters(FilterPatch {
                location: Some("angeles".into()),
                ..Default::default()
            }),
        );
        assert_eq!(view.get(&state).len(), 1);
        assert_eq!(view.recomputations(), 2);

        let state = reduce(state, Action::CreateFulfilled(property("Los Angeles", "CA", 1.0, PropertyStatus::Maintenance)));
        assert_eq!(view.get(&state).len(), 2);
        assert_eq!(view.recomputations(), 3);
    }
}
