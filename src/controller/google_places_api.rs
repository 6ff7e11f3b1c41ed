use std::sync::Arc;
use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;
use crate::error::AppError;
use crate::models::card::DetailView;
use crate::models::filter::{FilterSelection, FilterSet};
use crate::models::restaurant::Coordinates;
use crate::repositories::google_places_repo::PlacesApi;
use crate::session::SwipeSession;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/nearby", get(proxy_nearby_search))
        .route("/details/:place_id", get(proxy_place_details))
        .route_layer(Extension(app_state.places))
        .route_layer(Extension(app_state.session))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NearbySearchParams {
    pub latitude: f64,
    pub longitude: f64,
    pub cuisine: Option<String>,
    pub budget: Option<String>,
    pub rating: Option<String>,
    pub radius: Option<String>,
}

/// One-off search that ignores the session's active filters and deck.
pub async fn proxy_nearby_search(
    Extension(places): Extension<Arc<dyn PlacesApi>>,
    Query(query): Query<NearbySearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let filters = FilterSet::try_from(FilterSelection {
        cuisine: query.cuisine,
        budget: query.budget,
        rating: query.rating,
        radius: query.radius,
    })
    .map_err(|e| {
        warn!("Rejected nearby search filters due to: {}", e);
        e
    })?;

    let location = Coordinates {
        latitude: query.latitude,
        longitude: query.longitude,
    };
    let restaurants = places.fetch_nearby_restaurants(location, &filters).await;

    Ok((StatusCode::OK, Json(restaurants)))
}

pub async fn proxy_place_details(
    Extension(session): Extension<Arc<SwipeSession>>,
    Path(place_id): Path<String>,
) -> impl IntoResponse {
    let detail = session.place_details(&place_id).await;

    (StatusCode::OK, Json(DetailView::from(&detail)))
}
