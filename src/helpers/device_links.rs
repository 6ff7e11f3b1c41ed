use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::error::LinkError;

const APPLE_MAPS_URL: &str = "http://maps.apple.com/";
const GOOGLE_MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionLinks {
    pub ios: String,
    pub android: String,
}

pub fn directions_url(address: Option<&str>, platform: Platform) -> Result<String, LinkError> {
    let address = address
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(LinkError::AddressUnavailable)?;

    let url = match platform {
        Platform::Ios => Url::parse_with_params(APPLE_MAPS_URL, &[("daddr", address)]),
        Platform::Android => Url::parse_with_params(
            GOOGLE_MAPS_DIRECTIONS_URL,
            &[("api", "1"), ("destination", address)],
        ),
    };

    url.map(String::from).map_err(|e| {
        warn!("Failed to build directions url for {}: {}", address, e);
        LinkError::AddressUnavailable
    })
}

pub fn direction_links(address: Option<&str>) -> Result<DirectionLinks, LinkError> {
    Ok(DirectionLinks {
        ios: directions_url(address, Platform::Ios)?,
        android: directions_url(address, Platform::Android)?,
    })
}

/// Strips spaces, dashes and parentheses, keeping digits and a leading `+`.
pub fn dial_url(phone: Option<&str>) -> Result<String, LinkError> {
    let digits: String = phone
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if digits.is_empty() {
        return Err(LinkError::PhoneUnavailable);
    }
    Ok(format!("tel:{}", digits))
}
