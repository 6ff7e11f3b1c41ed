use std::time::Duration;
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use crate::config::Config;
use crate::helpers::photo_url::photo_url;
use crate::models::filter::FilterSet;
use crate::models::google_places::{
    is_usable_status, NearbySearchResponse, PlaceDetailsResponse, PlaceResult,
};
use crate::models::restaurant::{Coordinates, RestaurantDetail, RestaurantSummary};

pub const PLACE_TYPE: &str = "restaurant";
pub const DETAIL_FIELDS: &str = "formatted_phone_number,opening_hours,photos,formatted_address";

/// Two-phase access to the places provider. Both calls swallow failures:
/// a failed search is an empty list, a failed detail lookup is an empty record.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn fetch_nearby_restaurants(
        &self,
        location: Coordinates,
        filters: &FilterSet,
    ) -> Vec<RestaurantSummary>;

    async fn fetch_place_details(&self, place_id: &str) -> RestaurantDetail;
}

#[derive(Clone, Debug)]
pub struct SearchSettings {
    pub result_cap: usize,
    pub max_pages: u32,
    pub page_token_delay: Duration,
    pub default_radius_meters: u32,
    pub default_min_rating: f64,
    pub photo_max_width: u32,
}

impl From<&Config> for SearchSettings {
    fn from(config: &Config) -> Self {
        Self {
            result_cap: config.result_cap,
            max_pages: config.max_pages,
            page_token_delay: config.page_token_delay(),
            default_radius_meters: config.default_radius_meters,
            default_min_rating: config.default_min_rating,
            photo_max_width: config.photo_max_width,
        }
    }
}

pub struct GooglePlacesRepo {
    http: Client,
    base_url: String,
    api_key: String,
    settings: SearchSettings,
}

impl GooglePlacesRepo {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            settings,
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(
            http,
            config.places_base_url(),
            config.google_api_key.clone(),
            SearchSettings::from(config),
        )
    }

    pub async fn try_fetch_nearby_restaurants(
        &self,
        location: Coordinates,
        filters: &FilterSet,
    ) -> anyhow::Result<Vec<RestaurantSummary>> {
        let endpoint = format!("{}/nearbysearch/json", self.base_url);
        let base_params = self.nearby_search_params(location, filters);

        let mut places: Vec<PlaceResult> = Vec::new();
        let mut page_token: Option<String> = None;
        for page in 0..self.settings.max_pages {
            let request = match &page_token {
                Some(token) => {
                    // Fresh page tokens are rejected until the provider has had time to register them.
                    tokio::time::sleep(self.settings.page_token_delay).await;
                    self.http
                        .get(&endpoint)
                        .query(&[("pagetoken", token.as_str()), ("key", self.api_key.as_str())])
                }
                None => self.http.get(&endpoint).query(&base_params),
            };

            let response: NearbySearchResponse = request
                .send()
                .await
                .context("Failed to reach nearbysearch endpoint")?
                .error_for_status()
                .context("nearbysearch returned an error status")?
                .json()
                .await
                .context("Failed to decode nearbysearch response")?;

            if !is_usable_status(response.status.as_deref()) {
                bail!(
                    "nearbysearch answered {}: {}",
                    response.status.unwrap_or_default(),
                    response.error_message.unwrap_or_default()
                );
            }

            debug!("nearbysearch page {} returned {} places", page + 1, response.results.len());
            places.extend(response.results);
            page_token = response.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        let min_rating = filters.min_rating_or(self.settings.default_min_rating);
        Ok(select_restaurants(
            places,
            min_rating,
            self.settings.result_cap,
            filters.cuisine.as_deref(),
        ))
    }

    pub async fn try_fetch_place_details(
        &self,
        place_id: &str,
    ) -> anyhow::Result<RestaurantDetail> {
        let response: PlaceDetailsResponse = self
            .http
            .get(format!("{}/details/json", self.base_url))
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach details endpoint")?
            .error_for_status()
            .context("details returned an error status")?
            .json()
            .await
            .context("Failed to decode details response")?;

        if !is_usable_status(response.status.as_deref()) {
            bail!(
                "details answered {}: {}",
                response.status.unwrap_or_default(),
                response.error_message.unwrap_or_default()
            );
        }
        let result = response
            .result
            .ok_or_else(|| anyhow!("details response for {} had no result", place_id))?;

        let image_url = result.photos.first().and_then(|photo| {
            photo_url(
                &self.base_url,
                &photo.photo_reference,
                self.settings.photo_max_width,
                &self.api_key,
            )
        });

        Ok(RestaurantDetail {
            phone: result
                .formatted_phone_number
                .filter(|phone| !phone.trim().is_empty()),
            hours: result
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
            address: result
                .formatted_address
                .filter(|address| !address.trim().is_empty()),
            image_url,
        })
    }

    fn nearby_search_params(
        &self,
        location: Coordinates,
        filters: &FilterSet,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("location", format!("{},{}", location.latitude, location.longitude)),
            ("radius", filters.radius_meters(self.settings.default_radius_meters).to_string()),
            ("type", PLACE_TYPE.to_string()),
            ("keyword", filters.cuisine.clone().unwrap_or_default()),
        ];
        if let Some(range) = filters.price_range() {
            params.push(("minprice", range.min.to_string()));
            params.push(("maxprice", range.max.to_string()));
        }
        params.push(("key", self.api_key.clone()));
        params
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesRepo {
    async fn fetch_nearby_restaurants(
        &self,
        location: Coordinates,
        filters: &FilterSet,
    ) -> Vec<RestaurantSummary> {
        match self.try_fetch_nearby_restaurants(location, filters).await {
            Ok(restaurants) => {
                info!(
                    "Found {} restaurants near {},{}",
                    restaurants.len(),
                    location.latitude,
                    location.longitude
                );
                restaurants
            }
            Err(e) => {
                warn!(
                    "Failed to fetch restaurants near {},{} due to: {:#}",
                    location.latitude, location.longitude, e
                );
                Vec::new()
            }
        }
    }

    async fn fetch_place_details(&self, place_id: &str) -> RestaurantDetail {
        match self.try_fetch_place_details(place_id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Failed to fetch details for place: {}, due to: {:#}", place_id, e);
                RestaurantDetail::default()
            }
        }
    }
}

/// Drops places under `min_rating` (unrated counts as 0), keeps provider order and truncates to `cap`.
pub fn select_restaurants(
    places: Vec<PlaceResult>,
    min_rating: f64,
    cap: usize,
    cuisine: Option<&str>,
) -> Vec<RestaurantSummary> {
    places
        .into_iter()
        .filter(|place| place.rating.unwrap_or(0.0) >= min_rating)
        .take(cap)
        .map(|place| place.into_summary(cuisine))
        .collect()
}
