use std::sync::Arc;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::filter_store::InMemoryFilterStore;
use crate::repositories::geolocation::ConfiguredGeolocator;
use crate::repositories::google_places_repo::{GooglePlacesRepo, PlacesApi};
use crate::repositories::liked_store::InMemoryLikedStore;
use crate::session::{PreloadSettings, SwipeSession};

pub mod filter_controller;
pub mod google_places_api;
pub mod health_check;
pub mod liked_controller;
pub mod swipe_controller;

#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlacesApi>,
    pub session: Arc<SwipeSession>,
}

impl AppState {
    pub fn new(places: Arc<dyn PlacesApi>, session: Arc<SwipeSession>) -> Self {
        Self { places, session }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build places http client")?;
        let places: Arc<dyn PlacesApi> = Arc::new(GooglePlacesRepo::from_config(http, config));

        let session = Arc::new(SwipeSession::new(
            places.clone(),
            Arc::new(ConfiguredGeolocator::new(config.default_location())),
            Arc::new(InMemoryFilterStore::default()),
            Arc::new(InMemoryLikedStore::default()),
            PreloadSettings {
                initial: config.initial_preload,
                on_swipe: config.swipe_preload,
            },
        ));

        Ok(Self::new(places, session))
    }
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!("Ignoring invalid origin url {}: {}", s, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
                .layer(CompressionLayer::new())
                .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests))
        );

    info!("API server listening on: {}", config.listen_addr);
    axum::Server::bind(&config.listen_addr)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router())
        .nest("/places", google_places_api::router(app_state.clone()))
        .nest("/filters", filter_controller::router(app_state.clone()))
        .nest("/swipe", swipe_controller::router(app_state.clone()))
        .nest("/liked", liked_controller::router(app_state))
        .fallback(page_not_found_handler)
}
