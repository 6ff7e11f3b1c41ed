use reqwest::Url;
use tracing::warn;

/// Builds the provider `photo` endpoint URL for a photo reference. The image
/// itself is never downloaded here, clients load it straight from the URL.
pub fn photo_url(
    base_url: &str,
    photo_reference: &str,
    max_width: u32,
    api_key: &str,
) -> Option<String> {
    let endpoint = format!("{}/photo", base_url);
    match Url::parse_with_params(
        &endpoint,
        &[
            ("maxwidth", max_width.to_string().as_str()),
            ("photoreference", photo_reference),
            ("key", api_key),
        ],
    ) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            warn!("Failed to build photo url from {}: {}", endpoint, e);
            None
        }
    }
}
