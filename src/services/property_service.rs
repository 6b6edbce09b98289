use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};
use tracing::{info, warn};

use super::search_service::decode_listings;
use super::ServiceError;
use crate::database::models::{
    Amenity, AvailabilityStatus, Highlight, Listing, NewLocation, NewProperty, PropertyType,
};
use crate::database::{ManagerStore, PropertyStore};
use crate::geo::{AddressQuery, CoordinateCodec, Geocoder};

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

/// Accepts either a JSON array of names or one comma-separated string
fn list_or_csv<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let items = match Option::<ListOrCsv>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ListOrCsv::List(items)) => items,
        Some(ListOrCsv::Csv(text)) => text.split(',').map(str::to_string).collect(),
    };
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(de::Error::custom))
        .collect()
}

/// Body of `POST /properties`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub amenities: Vec<Amenity>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub is_pets_allowed: bool,
    #[serde(default)]
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: i32,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub available_from: Option<DateTime<Utc>>,
    pub year_built: Option<i32>,
    pub floor_number: Option<i32>,
    pub total_floors: Option<i32>,
    pub lease_term: Option<String>,
    pub availability_status: Option<AvailabilityStatus>,
    pub location_description: Option<String>,
    pub nearby_schools: Option<String>,
    pub nearby_hospitals: Option<String>,
    pub nearby_transit: Option<String>,
    pub nearby_shopping: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub manager_cognito_id: String,
}

impl CreatePropertyRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        let money = [
            ("pricePerMonth", self.price_per_month),
            ("securityDeposit", self.security_deposit),
            ("applicationFee", self.application_fee),
        ];
        if let Some((field, _)) = money.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ServiceError::invalid(format!("{} must be a non-negative number", field)));
        }
        if self.beds < 0 || self.baths < 0 || self.square_feet < 0 {
            return Err(ServiceError::invalid("beds, baths and squareFeet must not be negative"));
        }
        if self.manager_cognito_id.trim().is_empty() {
            return Err(ServiceError::invalid("managerCognitoId is required"));
        }
        Ok(())
    }

    fn address_query(&self) -> AddressQuery {
        AddressQuery {
            street: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            postal_code: self.postal_code.clone(),
        }
    }

    fn into_parts(self, coordinates: String) -> (NewProperty, NewLocation) {
        let location = NewLocation {
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
            coordinates,
        };
        let property = NewProperty {
            name: self.name,
            description: self.description,
            price_per_month: self.price_per_month,
            security_deposit: self.security_deposit,
            application_fee: self.application_fee,
            photo_urls: self.photo_urls,
            amenities: self.amenities,
            highlights: self.highlights,
            is_pets_allowed: self.is_pets_allowed,
            is_parking_included: self.is_parking_included,
            beds: self.beds,
            baths: self.baths,
            square_feet: self.square_feet,
            property_type: self.property_type,
            available_from: self.available_from,
            year_built: self.year_built,
            floor_number: self.floor_number,
            total_floors: self.total_floors,
            lease_term: self.lease_term,
            availability_status: self.availability_status,
            location_description: self.location_description,
            nearby_schools: self.nearby_schools,
            nearby_hospitals: self.nearby_hospitals,
            nearby_transit: self.nearby_transit,
            nearby_shopping: self.nearby_shopping,
            manager_cognito_id: self.manager_cognito_id,
        };
        (property, location)
    }
}

/// Property creation and per-manager listings
#[derive(Clone)]
pub struct PropertyService {
    properties: Arc<dyn PropertyStore>,
    managers: Arc<dyn ManagerStore>,
    codec: Arc<dyn CoordinateCodec>,
    geocoder: Arc<dyn Geocoder>,
}

impl PropertyService {
    pub fn new(
        properties: Arc<dyn PropertyStore>,
        managers: Arc<dyn ManagerStore>,
        codec: Arc<dyn CoordinateCodec>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self { properties, managers, codec, geocoder }
    }

    /// Geocodes the address, then stores location and property together
    pub async fn create(&self, request: CreatePropertyRequest) -> Result<Listing, ServiceError> {
        request.validate()?;

        if self.managers.manager(&request.manager_cognito_id).await?.is_none() {
            return Err(ServiceError::not_found("Manager not found"));
        }

        let point = match self.geocoder.geocode(&request.address_query()).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                return Err(ServiceError::Unprocessable(format!(
                    "Could not locate address: {}, {}, {}",
                    request.address, request.city, request.country
                )));
            }
            Err(e) => {
                warn!("Geocoding failed for {}: {}", request.address, e);
                return Err(e.into());
            }
        };

        let (property, location) = request.into_parts(self.codec.encode(&point));
        let stored = self.properties.create(property, location).await?;
        info!(id = stored.property.id, "created property {}", stored.property.name);
        Ok(stored.decode(self.codec.as_ref())?)
    }

    pub async fn by_manager(&self, manager_cognito_id: &str) -> Result<Vec<Listing>, ServiceError> {
        if self.managers.manager(manager_cognito_id).await?.is_none() {
            return Err(ServiceError::not_found("Manager not found"));
        }
        let stored = self.properties.by_manager(manager_cognito_id).await?;
        decode_listings(self.codec.as_ref(), stored)
    }
}
