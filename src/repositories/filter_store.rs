use std::sync::{PoisonError, RwLock};
use tracing::debug;
use crate::models::filter::FilterSet;

/// Read/write access to the active filter set. Last write wins.
pub trait FilterStore: Send + Sync {
    fn current(&self) -> FilterSet;
    fn replace(&self, filters: FilterSet);
}

#[derive(Default)]
pub struct InMemoryFilterStore {
    filters: RwLock<FilterSet>,
}

impl FilterStore for InMemoryFilterStore {
    fn current(&self) -> FilterSet {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, filters: FilterSet) {
        debug!("Replacing active filters with {:?}", filters);
        *self.filters.write().unwrap_or_else(PoisonError::into_inner) = filters;
    }
}
