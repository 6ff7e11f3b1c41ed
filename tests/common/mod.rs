#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use foodie_swipe::config::Config;

pub type RequestLog = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

pub struct FakePlaces {
    pub base_url: String,
    pub requests: RequestLog,
}

impl FakePlaces {
    pub fn requests_to(&self, endpoint: &str) -> Vec<HashMap<String, String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path == endpoint)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .expect("Failed to build test server")
        .serve(app.into_make_service());
    tokio::spawn(async move {
        server.await.expect("Test server crashed");
    });
    addr
}

/// Serves `pages[0]` for a fresh search and `pages[n]` for `pagetoken=page-n`.
/// Details are looked up by place id, unknown ids answer `NOT_FOUND`.
pub async fn spawn_fake_places(pages: Vec<Value>, details: HashMap<String, Value>) -> FakePlaces {
    let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let pages = Arc::new(pages);
    let details = Arc::new(details);

    let nearby_log = requests.clone();
    let details_log = requests.clone();
    let app = Router::new()
        .route(
            "/nearbysearch/json",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let log = nearby_log.clone();
                let pages = pages.clone();
                async move {
                    let page = params
                        .get("pagetoken")
                        .and_then(|token| token.strip_prefix("page-"))
                        .and_then(|n| n.parse::<usize>().ok())
                        .unwrap_or(0);
                    log.lock().unwrap().push(("nearbysearch".to_string(), params));
                    Json(pages.get(page).cloned().unwrap_or_else(|| json!({ "status": "INVALID_REQUEST" })))
                }
            }),
        )
        .route(
            "/details/json",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let log = details_log.clone();
                let details = details.clone();
                async move {
                    let body = params
                        .get("place_id")
                        .and_then(|id| details.get(id))
                        .cloned()
                        .unwrap_or_else(|| json!({ "status": "NOT_FOUND" }));
                    log.lock().unwrap().push(("details".to_string(), params));
                    Json(body)
                }
            }),
        );

    let addr = spawn_server(app).await;
    FakePlaces {
        base_url: format!("http://{}", addr),
        requests,
    }
}

/// Provider that answers every request with a 500.
pub async fn spawn_broken_places() -> String {
    let app = Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") });
    let addr = spawn_server(app).await;
    format!("http://{}", addr)
}

pub fn test_config(base_url: &str, extra: &[&str]) -> Config {
    let mut args = vec![
        "foodie-swipe",
        "--google-api-key",
        "test-key",
        "--places-base-url",
        base_url,
        "--page-token-delay-ms",
        "0",
    ];
    args.extend_from_slice(extra);
    Config::parse_from(args)
}

pub fn place(id: &str, rating: Option<f64>) -> Value {
    let mut place = json!({
        "place_id": id,
        "name": format!("Restaurant {}", id),
        "vicinity": format!("{} Orchard Road", id),
        "geometry": { "location": { "lat": 1.3048, "lng": 103.8318 } }
    });
    if let Some(rating) = rating {
        place["rating"] = json!(rating);
    }
    place
}

pub fn page(places: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut page = json!({ "status": "OK", "results": places });
    if let Some(token) = next_page_token {
        page["next_page_token"] = json!(token);
    }
    page
}

pub fn detail(phone: Option<&str>, photo_reference: Option<&str>) -> Value {
    let mut result = json!({
        "formatted_address": "1 Orchard Road, Singapore 238823",
        "opening_hours": { "weekday_text": ["Monday: 11:00 AM – 10:00 PM", "Tuesday: Closed"] }
    });
    if let Some(phone) = phone {
        result["formatted_phone_number"] = json!(phone);
    }
    if let Some(reference) = photo_reference {
        result["photos"] = json!([{ "photo_reference": reference, "height": 800, "width": 1200 }]);
    }
    json!({ "status": "OK", "result": result })
}
