use serde::{Deserialize, Serialize};
use crate::models::restaurant::{Coordinates, RestaurantSummary};

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    pub next_page_token: Option<String>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceResult {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub vicinity: String,
    pub geometry: Option<Geometry>,
}

impl PlaceResult {
    pub fn into_summary(self, cuisine: Option<&str>) -> RestaurantSummary {
        RestaurantSummary {
            id: self.place_id,
            name: self.name,
            rating: self.rating,
            address: self.vicinity,
            coordinates: self.geometry.map(|geometry| Coordinates {
                latitude: geometry.location.lat,
                longitude: geometry.location.lng,
            }),
            cuisine: cuisine.map(str::to_string),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Photo {
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub html_attributions: Vec<String>,
    pub photo_reference: String,
    #[serde(default)]
    pub width: i64,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceDetailsResponse {
    pub result: Option<PlaceDetailsResult>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PlaceDetailsResult {
    pub formatted_phone_number: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub formatted_address: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// `OK` and `ZERO_RESULTS` are the only statuses that carry a usable body.
/// A missing status is treated as `OK`.
pub fn is_usable_status(status: Option<&str>) -> bool {
    matches!(status, None | Some("OK") | Some("ZERO_RESULTS"))
}
