use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use crate::error::LinkError;
use crate::helpers::device_links::{dial_url, direction_links, DirectionLinks};
use crate::helpers::distance::distance_label;
use crate::models::restaurant::{Coordinates, LikedRestaurant, RestaurantDetail, RestaurantSummary};

/// Display shape of a detail record, sentinels applied.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DetailView {
    pub phone: String,
    pub hours: Vec<String>,
    pub address: Option<String>,
    pub image: String,
    pub dial_url: Option<String>,
    /// Alert text shown instead of dialing when there is no usable number.
    pub dial_error: Option<String>,
}

impl From<&RestaurantDetail> for DetailView {
    fn from(detail: &RestaurantDetail) -> Self {
        let (dial_url, dial_error) = split_link(dial_url(detail.phone.as_deref()));

        Self {
            phone: detail.phone_or_sentinel().to_string(),
            hours: detail.hours.clone(),
            address: detail.address.clone(),
            image: detail.image_or_placeholder().to_string(),
            dial_url,
            dial_error,
        }
    }
}

fn split_link<T>(link: Result<T, LinkError>) -> (Option<T>, Option<String>) {
    match link {
        Ok(link) => (Some(link), None),
        Err(e) => (None, Some(e.to_string())),
    }
}

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestaurantCard {
    #[serde(flatten)]
    pub summary: RestaurantSummary,
    pub detail: Option<DetailView>,
    /// True while the detail record is still being fetched.
    #[serde(default)]
    pub loading: bool,
    pub distance: Option<String>,
    pub directions: Option<DirectionLinks>,
    pub directions_error: Option<String>,
}

impl RestaurantCard {
    pub fn new(
        summary: &RestaurantSummary,
        detail: Option<&RestaurantDetail>,
        loading: bool,
        origin: Option<Coordinates>,
    ) -> Self {
        let address = detail
            .and_then(|d| d.address.as_deref())
            .or(Some(summary.address.as_str()));
        let distance = match (origin, summary.coordinates) {
            (Some(from), Some(to)) => Some(distance_label(from, to)),
            _ => None,
        };
        let (directions, directions_error) = split_link(direction_links(address));

        Self {
            summary: summary.clone(),
            detail: detail.map(DetailView::from),
            loading,
            distance,
            directions,
            directions_error,
        }
    }

    pub fn from_liked(liked: &LikedRestaurant) -> Self {
        Self::new(&liked.summary, liked.detail.as_ref(), false, None)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DeckView {
    pub current_index: usize,
    pub total: usize,
    pub cards: Vec<RestaurantCard>,
}
