use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing::debug;
use crate::models::restaurant::RestaurantDetail;

/// What the cache knows about a place id right now.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailStatus {
    Missing,
    InFlight,
    Resolved(RestaurantDetail),
}

#[derive(Clone)]
enum Slot {
    InFlight(Arc<Notify>),
    Resolved(RestaurantDetail),
}

enum Claim {
    Resolved(RestaurantDetail),
    Wait(Arc<Notify>),
    Fetch(Arc<Notify>),
}

/// Detail records for one deck, keyed by place id. At most one fetch per id
/// runs at a time; later callers wait on it instead of issuing their own.
#[derive(Default)]
pub struct DetailCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never waits, render paths use this.
    pub fn status(&self, place_id: &str) -> DetailStatus {
        match self.snapshot(place_id) {
            None => DetailStatus::Missing,
            Some(Slot::InFlight(_)) => DetailStatus::InFlight,
            Some(Slot::Resolved(detail)) => DetailStatus::Resolved(detail),
        }
    }

    pub fn resolved(&self, place_id: &str) -> Option<RestaurantDetail> {
        match self.status(place_id) {
            DetailStatus::Resolved(detail) => Some(detail),
            _ => None,
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, place_id: &str, fetch: F) -> RestaurantDetail
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RestaurantDetail>,
    {
        let notify = loop {
            let waiter = match self.claim(place_id) {
                Claim::Resolved(detail) => return detail,
                Claim::Fetch(notify) => break notify,
                Claim::Wait(notify) => notify,
            };

            let notified = waiter.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            // The fetch may have finished between claim and enable.
            match self.snapshot(place_id) {
                Some(Slot::Resolved(detail)) => return detail,
                Some(Slot::InFlight(current)) if Arc::ptr_eq(&current, &waiter) => {
                    debug!("Waiting on in-flight detail fetch for {}", place_id);
                    notified.await;
                }
                _ => {}
            }
        };

        let mut guard = InFlightGuard {
            cache: self,
            place_id,
            notify,
            finished: false,
        };
        let detail = fetch().await;
        self.lock()
            .insert(place_id.to_string(), Slot::Resolved(detail.clone()));
        guard.finished = true;
        guard.notify.notify_waiters();

        detail
    }

    fn claim(&self, place_id: &str) -> Claim {
        let mut slots = self.lock();
        match slots.get(place_id) {
            Some(Slot::Resolved(detail)) => Claim::Resolved(detail.clone()),
            Some(Slot::InFlight(notify)) => Claim::Wait(notify.clone()),
            None => {
                let notify = Arc::new(Notify::new());
                slots.insert(place_id.to_string(), Slot::InFlight(notify.clone()));
                Claim::Fetch(notify)
            }
        }
    }

    fn snapshot(&self, place_id: &str) -> Option<Slot> {
        self.lock().get(place_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the in-flight slot if the fetching future is dropped before it resolves.
struct InFlightGuard<'a> {
    cache: &'a DetailCache,
    place_id: &'a str,
    notify: Arc<Notify>,
    finished: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut slots = self.cache.lock();
        if let Some(Slot::InFlight(current)) = slots.get(self.place_id) {
            if Arc::ptr_eq(current, &self.notify) {
                slots.remove(self.place_id);
            }
        }
        drop(slots);
        self.notify.notify_waiters();
    }
}
