use std::sync::Arc;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::controller::AppState;
use crate::models::card::RestaurantCard;
use crate::models::restaurant::LikedRestaurant;
use crate::session::SwipeSession;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(retrieve_liked_restaurants)
                .post(like_restaurant)
                .delete(clear_liked_restaurants),
        )
        .route("/:place_id", delete(remove_liked_restaurant))
        .route_layer(Extension(app_state.session))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct LikedChange {
    pub place_id: String,
    pub changed: bool,
}

pub async fn retrieve_liked_restaurants(
    Extension(session): Extension<Arc<SwipeSession>>,
) -> impl IntoResponse {
    let cards: Vec<RestaurantCard> = session
        .liked()
        .list()
        .iter()
        .map(RestaurantCard::from_liked)
        .collect();

    (StatusCode::OK, Json(cards))
}

pub async fn like_restaurant(
    Extension(session): Extension<Arc<SwipeSession>>,
    Json(body): Json<LikedRestaurant>,
) -> impl IntoResponse {
    let place_id = body.id().to_string();
    let changed = session.liked().add(body);
    if !changed {
        info!("Restaurant {} was already liked", place_id);
    }

    (StatusCode::OK, Json(LikedChange { place_id, changed }))
}

pub async fn remove_liked_restaurant(
    Extension(session): Extension<Arc<SwipeSession>>,
    Path(place_id): Path<String>,
) -> impl IntoResponse {
    let changed = session.liked().remove(&place_id);
    if !changed {
        warn!("Tried to remove restaurant {} which was not liked", place_id);
    }

    (StatusCode::OK, Json(LikedChange { place_id, changed }))
}

pub async fn clear_liked_restaurants(
    Extension(session): Extension<Arc<SwipeSession>>,
) -> impl IntoResponse {
    session.liked().clear();

    (StatusCode::OK, "Cleared liked restaurants")
}
