use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::codec::{CodecError, Coordinates};
use crate::config::GeocodingConfig;

/// Postal address fields sent to the geocoding service
#[derive(Debug, Clone, PartialEq)]
pub struct AddressQuery {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Invalid geocoder URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoder returned an unusable point: {0}")]
    BadPoint(#[from] CodecError),
}

/// Resolves an address to coordinates. `Ok(None)` means the service had no match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &AddressQuery) -> Result<Option<Coordinates>, GeocodeError>;
}

/// OpenStreetMap Nominatim structured search
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url: config.base_url.clone() })
    }

    fn search_url(&self, address: &AddressQuery) -> Result<url::Url, GeocodeError> {
        let url = url::Url::parse_with_params(
            &format!("{}/search", self.base_url.trim_end_matches('/')),
            &[
                ("street", address.street.as_str()),
                ("city", address.city.as_str()),
                ("state", address.state.as_str()),
                ("country", address.country.as_str()),
                ("postalcode", address.postal_code.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &AddressQuery) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.search_url(address)?;
        debug!("Geocoding address via {}", url);

        let places: Vec<NominatimPlace> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        match (place.lon.parse::<f64>(), place.lat.parse::<f64>()) {
            (Ok(lon), Ok(lat)) => Ok(Some(Coordinates::new(lon, lat)?)),
            _ => {
                warn!("Geocoder returned non-numeric coordinates: lon={}, lat={}", place.lon, place.lat);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeocodingConfig {
        GeocodingConfig {
            base_url: "https://nominatim.openstreetmap.org/".to_string(),
            user_agent: "rentavenue-api tests".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn builds_structured_search_url() {
        let geocoder = NominatimGeocoder::new(&config()).unwrap();
        let url = geocoder
            .search_url(&AddressQuery {
                street: "1 Market St".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                country: "USA".to_string(),
                postal_code: "94105".to_string(),
            })
            .unwrap();

        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("street".to_string(), "1 Market St".to_string())));
        assert!(pairs.contains(&("postalcode".to_string(), "94105".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "1".to_string())));
    }
}
