use anyhow::anyhow;
use async_trait::async_trait;
use crate::models::restaurant::Coordinates;

/// Source of the user's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> anyhow::Result<Coordinates>;
}

/// Position taken from configuration, used when a request carries no coordinates.
pub struct ConfiguredGeolocator {
    position: Option<Coordinates>,
}

impl ConfiguredGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> anyhow::Result<Coordinates> {
        self.position
            .ok_or_else(|| anyhow!("No device location available and no default location configured"))
    }
}
