use std::sync::Arc;
use axum::extract::Path;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::controller::AppState;
use crate::error::AppError;
use crate::models::restaurant::Coordinates;
use crate::session::{LikeOutcome, LoadOutcome, SwipeSession};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_deck))
        .route("/load", post(load_deck))
        .route("/:index/swiped", post(card_swiped))
        .route("/:index/like", post(like_card))
        .route_layer(Extension(app_state.session))
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct LoadDeckBody {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LoadDeckBody {
    fn location(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct LikeResponse {
    pub outcome: LikeOutcome,
}

pub async fn load_deck(
    Extension(session): Extension<Arc<SwipeSession>>,
    body: Option<Json<LoadDeckBody>>,
) -> impl IntoResponse {
    let body = body.map(|Json(body)| body).unwrap_or_default();

    match session.load(body.location()).await {
        LoadOutcome::Loaded { count } => info!("Loaded deck with {} restaurants", count),
        LoadOutcome::Superseded => warn!("Deck load was superseded by a filter change"),
    }

    (StatusCode::OK, Json(session.deck_view()))
}

pub async fn retrieve_deck(
    Extension(session): Extension<Arc<SwipeSession>>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(session.deck_view()))
}

pub async fn card_swiped(
    Extension(session): Extension<Arc<SwipeSession>>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    session.swiped(index)?;

    Ok((StatusCode::OK, Json(session.deck_view())))
}

pub async fn like_card(
    Extension(session): Extension<Arc<SwipeSession>>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = session.like(index).map_err(|e| {
        warn!("Something went wrong liking card {} due to: {}", index, e);
        e
    })?;

    Ok((StatusCode::OK, Json(LikeResponse { outcome })))
}
