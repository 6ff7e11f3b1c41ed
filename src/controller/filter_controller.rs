use std::sync::Arc;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use reqwest::StatusCode;
use tracing::warn;
use crate::controller::AppState;
use crate::error::AppError;
use crate::models::filter::{FilterSelection, FilterSet};
use crate::session::SwipeSession;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(retrieve_filters).put(apply_filters))
        .route_layer(Extension(app_state.session))
}

pub async fn retrieve_filters(
    Extension(session): Extension<Arc<SwipeSession>>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(session.filters()))
}

/// Applying filters clears the deck, the client reloads it afterwards.
pub async fn apply_filters(
    Extension(session): Extension<Arc<SwipeSession>>,
    Json(body): Json<FilterSelection>,
) -> Result<impl IntoResponse, AppError> {
    let filters = match FilterSet::try_from(body) {
        Ok(filters) => filters,
        Err(e) => {
            warn!("Something went wrong applying filters due to: {}", e);
            return Err(e.into());
        }
    };

    session.apply_filters(filters.clone());
    Ok((StatusCode::OK, Json(filters)))
}
