use std::net::SocketAddr;
use std::time::Duration;
use clap::Parser;
use crate::models::restaurant::Coordinates;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

#[derive(Parser, Clone, Debug)]
#[clap(name = "foodie-swipe", about = "Nearby restaurant discovery service backed by Google Places")]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long)]
    pub google_api_key: String,

    #[clap(env, long, default_value = DEFAULT_PLACES_BASE_URL)]
    pub places_base_url: String,

    #[clap(env, long, default_value = "127.0.0.1:3000")]
    pub listen_addr: SocketAddr,

    /// Comma separated list of origins allowed through CORS.
    #[clap(env, long, default_value = "http://localhost:8081")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 10)]
    pub result_cap: usize,

    /// Number of nearbysearch pages to follow, the provider never hands out more than 3.
    #[clap(env, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=3))]
    pub max_pages: u32,

    #[clap(env, long, default_value_t = 2000)]
    pub page_token_delay_ms: u64,

    #[clap(env, long, default_value_t = 2000)]
    pub default_radius_meters: u32,

    #[clap(env, long, default_value_t = 4.0)]
    pub default_min_rating: f64,

    #[clap(env, long, default_value_t = 400)]
    pub photo_max_width: u32,

    /// Details fetched right after a deck loads, the first card included.
    #[clap(env, long, default_value_t = 10)]
    pub initial_preload: usize,

    /// Details fetched ahead of the current card on every swipe.
    #[clap(env, long, default_value_t = 3)]
    pub swipe_preload: usize,

    #[clap(env, long)]
    pub default_latitude: Option<f64>,

    #[clap(env, long)]
    pub default_longitude: Option<f64>,

    #[clap(env, long, default_value_t = 64)]
    pub max_concurrent_requests: usize,
}

impl Config {
    pub fn page_token_delay(&self) -> Duration {
        Duration::from_millis(self.page_token_delay_ms)
    }

    pub fn default_location(&self) -> Option<Coordinates> {
        match (self.default_latitude, self.default_longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }

    pub fn places_base_url(&self) -> &str {
        self.places_base_url.trim_end_matches('/')
    }
}
