use std::sync::{PoisonError, RwLock};
use tracing::debug;
use crate::models::restaurant::LikedRestaurant;

/// The favourites list. Entries are unique by place id and kept in the order they were liked.
pub trait LikedStore: Send + Sync {
    /// Returns false when the place was already liked.
    fn add(&self, restaurant: LikedRestaurant) -> bool;
    /// Returns false when nothing matched.
    fn remove(&self, place_id: &str) -> bool;
    fn clear(&self);
    fn list(&self) -> Vec<LikedRestaurant>;
}

#[derive(Default)]
pub struct InMemoryLikedStore {
    liked: RwLock<Vec<LikedRestaurant>>,
}

impl LikedStore for InMemoryLikedStore {
    fn add(&self, restaurant: LikedRestaurant) -> bool {
        let mut liked = self.liked.write().unwrap_or_else(PoisonError::into_inner);
        if liked.iter().any(|r| r.id() == restaurant.id()) {
            debug!("Restaurant {} already liked", restaurant.id());
            return false;
        }
        liked.push(restaurant);
        true
    }

    fn remove(&self, place_id: &str) -> bool {
        let mut liked = self.liked.write().unwrap_or_else(PoisonError::into_inner);
        let before = liked.len();
        liked.retain(|r| r.id() != place_id);
        liked.len() != before
    }

    fn clear(&self) {
        self.liked
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn list(&self) -> Vec<LikedRestaurant> {
        self.liked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
