//! Deck state behind the swipe screen: which restaurants are on the deck,
//! which card is on top, and which detail records have been fetched for them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::error::AppError;
use crate::models::card::{DeckView, RestaurantCard};
use crate::models::filter::FilterSet;
use crate::models::restaurant::{Coordinates, LikedRestaurant, RestaurantDetail, RestaurantSummary};
use crate::repositories::detail_cache::{DetailCache, DetailStatus};
use crate::repositories::filter_store::FilterStore;
use crate::repositories::geolocation::Geolocator;
use crate::repositories::google_places_repo::PlacesApi;
use crate::repositories::liked_store::LikedStore;

#[derive(Clone, Copy, Debug)]
pub struct PreloadSettings {
    /// Details fetched when a deck loads, counting the first card.
    pub initial: usize,
    /// Details fetched ahead of the top card after each swipe.
    pub on_swipe: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    /// Filters changed while the search was running, its results were dropped.
    Superseded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeOutcome {
    Added,
    AlreadyLiked,
}

#[derive(Default)]
struct Deck {
    restaurants: Vec<RestaurantSummary>,
    details: Arc<DetailCache>,
    current_index: usize,
    origin: Option<Coordinates>,
}

pub struct SwipeSession {
    places: Arc<dyn PlacesApi>,
    geolocator: Arc<dyn Geolocator>,
    filters: Arc<dyn FilterStore>,
    liked: Arc<dyn LikedStore>,
    preload: PreloadSettings,
    generation: AtomicU64,
    deck: RwLock<Deck>,
}

impl SwipeSession {
    pub fn new(
        places: Arc<dyn PlacesApi>,
        geolocator: Arc<dyn Geolocator>,
        filters: Arc<dyn FilterStore>,
        liked: Arc<dyn LikedStore>,
        preload: PreloadSettings,
    ) -> Self {
        Self {
            places,
            geolocator,
            filters,
            liked,
            preload,
            generation: AtomicU64::new(0),
            deck: RwLock::new(Deck::default()),
        }
    }

    pub fn filters(&self) -> FilterSet {
        self.filters.current()
    }

    /// Stores new filters and throws the current deck away. Loads still in
    /// flight for the old filters will not install their results.
    pub fn apply_filters(&self, filters: FilterSet) {
        let mut deck = self.deck_mut();
        info!("Applying filters {:?}", filters);
        self.filters.replace(filters);
        self.generation.fetch_add(1, Ordering::SeqCst);
        *deck = Deck::default();
    }

    pub fn liked(&self) -> &dyn LikedStore {
        self.liked.as_ref()
    }

    pub async fn load(&self, location: Option<Coordinates>) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let filters = self.filters.current();

        let origin = match location {
            Some(location) => Some(location),
            None => match self.geolocator.current_position().await {
                Ok(position) => Some(position),
                Err(e) => {
                    warn!("Could not determine current location due to: {:#}", e);
                    None
                }
            },
        };
        let restaurants = match origin {
            Some(origin) => self.places.fetch_nearby_restaurants(origin, &filters).await,
            None => Vec::new(),
        };

        let details = Arc::new(DetailCache::new());
        {
            let mut deck = self.deck_mut();
            if self.generation.load(Ordering::SeqCst) != generation {
                info!("Dropping {} restaurants from a superseded load", restaurants.len());
                return LoadOutcome::Superseded;
            }
            *deck = Deck {
                restaurants: restaurants.clone(),
                details: details.clone(),
                current_index: 0,
                origin,
            };
        }

        if self.preload.initial > 0 {
            if let Some(first) = restaurants.first() {
                details
                    .get_or_fetch(&first.id, || self.places.fetch_place_details(&first.id))
                    .await;
            }
        }
        for restaurant in restaurants
            .iter()
            .skip(1)
            .take(self.preload.initial.saturating_sub(1))
        {
            self.spawn_detail_fetch(details.clone(), restaurant.id.clone());
        }

        LoadOutcome::Loaded {
            count: restaurants.len(),
        }
    }

    pub fn swiped(&self, index: usize) -> Result<(), AppError> {
        let (details, upcoming) = {
            let mut deck = self.deck_mut();
            if index >= deck.restaurants.len() {
                return Err(AppError::CardNotFound(index));
            }
            deck.current_index = index + 1;
            let upcoming: Vec<String> = deck
                .restaurants
                .iter()
                .skip(index + 1)
                .take(self.preload.on_swipe)
                .map(|r| r.id.clone())
                .collect();
            (deck.details.clone(), upcoming)
        };

        for place_id in upcoming {
            self.spawn_detail_fetch(details.clone(), place_id);
        }
        Ok(())
    }

    /// Likes the card at `index`, carrying its detail record when one has arrived.
    pub fn like(&self, index: usize) -> Result<LikeOutcome, AppError> {
        let liked = {
            let deck = self.deck();
            let restaurant = deck
                .restaurants
                .get(index)
                .ok_or(AppError::CardNotFound(index))?;
            LikedRestaurant::new(restaurant.clone(), deck.details.resolved(&restaurant.id))
        };

        if self.liked.add(liked) {
            Ok(LikeOutcome::Added)
        } else {
            Ok(LikeOutcome::AlreadyLiked)
        }
    }

    /// Detail for any place id. Ids on the current deck go through its cache,
    /// anything else is fetched directly and not kept.
    pub async fn place_details(&self, place_id: &str) -> RestaurantDetail {
        let details = {
            let deck = self.deck();
            deck.restaurants
                .iter()
                .any(|restaurant| restaurant.id == place_id)
                .then(|| deck.details.clone())
        };

        match details {
            Some(details) => {
                details
                    .get_or_fetch(place_id, || self.places.fetch_place_details(place_id))
                    .await
            }
            None => {
                debug!("Fetching details for {} which is not on the deck", place_id);
                self.places.fetch_place_details(place_id).await
            }
        }
    }

    pub fn deck_view(&self) -> DeckView {
        let deck = self.deck();
        let cards = deck
            .restaurants
            .iter()
            .map(|restaurant| match deck.details.status(&restaurant.id) {
                DetailStatus::Resolved(detail) => {
                    RestaurantCard::new(restaurant, Some(&detail), false, deck.origin)
                }
                DetailStatus::InFlight => RestaurantCard::new(restaurant, None, true, deck.origin),
                DetailStatus::Missing => RestaurantCard::new(restaurant, None, false, deck.origin),
            })
            .collect();

        DeckView {
            current_index: deck.current_index,
            total: deck.restaurants.len(),
            cards,
        }
    }

    fn spawn_detail_fetch(&self, details: Arc<DetailCache>, place_id: String) {
        if details.status(&place_id) != DetailStatus::Missing {
            return;
        }
        debug!("Preloading details for {}", place_id);
        let places = self.places.clone();
        tokio::spawn(async move {
            details
                .get_or_fetch(&place_id, || places.fetch_place_details(&place_id))
                .await;
        });
    }

    fn deck(&self) -> RwLockReadGuard<'_, Deck> {
        self.deck.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn deck_mut(&self) -> RwLockWriteGuard<'_, Deck> {
        self.deck.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use async_trait::async_trait;
    use tokio::sync::Semaphore;
    use crate::repositories::filter_store::InMemoryFilterStore;
    use crate::repositories::geolocation::ConfiguredGeolocator;
    use crate::repositories::liked_store::InMemoryLikedStore;

    const HERE: Coordinates = Coordinates { latitude: 1.3, longitude: 103.8 };

    #[derive(Default)]
    struct FakePlaces {
        restaurants: Vec<RestaurantSummary>,
        searches: AtomicUsize,
        detail_calls: Mutex<HashMap<String, usize>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakePlaces {
        fn with_restaurants(count: usize) -> Self {
            Self {
                restaurants: (0..count).map(|i| summary(&format!("p{}", i))).collect(),
                ..Self::default()
            }
        }

        fn detail_calls(&self) -> HashMap<String, usize> {
            self.detail_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlacesApi for FakePlaces {
        async fn fetch_nearby_restaurants(
            &self,
            _location: Coordinates,
            _filters: &FilterSet,
        ) -> Vec<RestaurantSummary> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            self.restaurants.clone()
        }

        async fn fetch_place_details(&self, place_id: &str) -> RestaurantDetail {
            *self
                .detail_calls
                .lock()
                .unwrap()
                .entry(place_id.to_string())
                .or_default() += 1;
            RestaurantDetail {
                phone: Some(format!("+65 {}", place_id.len())),
                ..RestaurantDetail::default()
            }
        }
    }

    fn summary(id: &str) -> RestaurantSummary {
        RestaurantSummary {
            id: id.to_string(),
            name: format!("Place {}", id),
            rating: Some(4.5),
            address: format!("{} road", id),
            coordinates: Some(HERE),
            cuisine: None,
        }
    }

    fn session(places: Arc<FakePlaces>, location: Option<Coordinates>) -> SwipeSession {
        SwipeSession::new(
            places,
            Arc::new(ConfiguredGeolocator::new(location)),
            Arc::new(InMemoryFilterStore::default()),
            Arc::new(InMemoryLikedStore::default()),
            PreloadSettings { initial: 10, on_swipe: 3 },
        )
    }

    async fn wait_until(cond: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !cond() {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("condition was not reached in time");
    }

    #[tokio::test]
    async fn load_resolves_first_card_and_preloads_the_rest() {
        let places = Arc::new(FakePlaces::with_restaurants(12));
        let session = session(places.clone(), Some(HERE));

        assert_eq!(session.load(None).await, LoadOutcome::Loaded { count: 12 });

        let view = session.deck_view();
        assert_eq!(view.total, 12);
        assert_eq!(view.current_index, 0);
        assert!(view.cards[0].detail.is_some());
        assert_eq!(view.cards[0].distance.as_deref(), Some("0m"));

        wait_until(|| places.detail_calls().len() == 10).await;
        let calls = places.detail_calls();
        assert!(calls.values().all(|n| *n == 1));
        assert!(!calls.contains_key("p10"));
        assert!(!calls.contains_key("p11"));
    }

    #[tokio::test]
    async fn swiping_preloads_upcoming_cards_once() {
        let places = Arc::new(FakePlaces::with_restaurants(12));
        let session = session(places.clone(), Some(HERE));
        session.load(None).await;
        wait_until(|| places.detail_calls().len() == 10).await;

        session.swiped(8).unwrap();
        assert_eq!(session.deck_view().current_index, 9);

        wait_until(|| places.detail_calls().len() == 12).await;
        assert!(places.detail_calls().values().all(|n| *n == 1));

        assert!(matches!(session.swiped(12), Err(AppError::CardNotFound(12))));
    }

    #[tokio::test]
    async fn missing_location_gives_an_empty_deck() {
        let places = Arc::new(FakePlaces::with_restaurants(3));
        let session = session(places.clone(), None);

        assert_eq!(session.load(None).await, LoadOutcome::Loaded { count: 0 });
        assert_eq!(places.searches.load(Ordering::SeqCst), 0);
        assert_eq!(session.deck_view().total, 0);

        assert_eq!(session.load(Some(HERE)).await, LoadOutcome::Loaded { count: 3 });
    }

    #[tokio::test]
    async fn like_merges_detail_and_dedups() {
        let places = Arc::new(FakePlaces::with_restaurants(3));
        let session = session(places, Some(HERE));
        session.load(None).await;

        assert_eq!(session.like(0).unwrap(), LikeOutcome::Added);
        assert_eq!(session.like(0).unwrap(), LikeOutcome::AlreadyLiked);
        assert!(matches!(session.like(7), Err(AppError::CardNotFound(7))));

        let liked = session.liked().list();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id(), "p0");
        assert_eq!(liked[0].detail.as_ref().and_then(|d| d.phone.as_deref()), Some("+65 2"));
    }

    #[tokio::test]
    async fn filter_change_discards_a_load_in_flight() {
        let gate = Arc::new(Semaphore::new(0));
        let places = Arc::new(FakePlaces {
            gate: Some(gate.clone()),
            ..FakePlaces::with_restaurants(4)
        });
        let session = Arc::new(session(places.clone(), Some(HERE)));

        let loading = session.clone();
        let stale = tokio::spawn(async move { loading.load(None).await });
        wait_until(|| places.searches.load(Ordering::SeqCst) == 1).await;

        session.apply_filters(FilterSet {
            cuisine: Some("thai".to_string()),
            ..FilterSet::default()
        });
        gate.add_permits(1);

        assert_eq!(stale.await.unwrap(), LoadOutcome::Superseded);
        assert_eq!(session.deck_view().total, 0);
        assert_eq!(session.filters().cuisine.as_deref(), Some("thai"));

        gate.add_permits(1);
        assert_eq!(session.load(None).await, LoadOutcome::Loaded { count: 4 });
    }

    #[tokio::test]
    async fn place_details_share_the_deck_cache() {
        let places = Arc::new(FakePlaces::with_restaurants(1));
        let session = session(places.clone(), Some(HERE));
        session.load(None).await;

        let detail = session.place_details("p0").await;
        assert_eq!(detail.phone.as_deref(), Some("+65 2"));
        assert_eq!(places.detail_calls().get("p0"), Some(&1));
    }

    #[tokio::test]
    async fn details_for_ids_off_the_deck_are_not_cached() {
        let places = Arc::new(FakePlaces::with_restaurants(1));
        let session = session(places.clone(), Some(HERE));
        session.load(None).await;

        session.place_details("elsewhere").await;
        session.place_details("elsewhere").await;

        assert_eq!(places.detail_calls().get("elsewhere"), Some(&2));
        assert_eq!(session.deck().details.status("elsewhere"), DetailStatus::Missing);
    }
}
