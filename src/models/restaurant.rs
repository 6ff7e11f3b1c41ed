use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub const PHONE_UNAVAILABLE: &str = "N/A";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400?text=No+Image";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One entry of a nearby search, keyed by the provider's place id.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestaurantSummary {
    pub id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub address: String,
    pub coordinates: Option<Coordinates>,
    pub cuisine: Option<String>,
}

/// Lazily fetched second half of a card. Absent fields stay `None` here,
/// display fallbacks are applied by the card views.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct RestaurantDetail {
    pub phone: Option<String>,
    #[serde(default)]
    pub hours: Vec<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

impl RestaurantDetail {
    pub fn phone_or_sentinel(&self) -> &str {
        self.phone.as_deref().unwrap_or(PHONE_UNAVAILABLE)
    }

    pub fn image_or_placeholder(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE_URL)
    }
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct LikedRestaurant {
    #[serde(flatten)]
    pub summary: RestaurantSummary,
    pub detail: Option<RestaurantDetail>,
}

impl LikedRestaurant {
    pub fn new(summary: RestaurantSummary, detail: Option<RestaurantDetail>) -> Self {
        Self { summary, detail }
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }
}
