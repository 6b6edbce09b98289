//! Postgres/PostGIS implementation of the store traits.
//!
//! Listings are read as one JSON object per row (camelCase keys, location
//! nested, point rendered with `ST_AsText`) so a search is a single query
//! with no follow-up reads for coordinates.

mod application;
mod lease;
mod manager;
mod property;
mod tenant;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::manager::DatabaseManager;
use super::store::{StoreError, StoreHealth};

/// Property columns as `json_build_object` arguments, keyed like the `Property` model
const PROPERTY_FIELDS: &str = "\
'id', p.id, 'name', p.name, 'description', p.description, \
'pricePerMonth', p.price_per_month, 'securityDeposit', p.security_deposit, \
'applicationFee', p.application_fee, 'photoUrls', p.photo_urls, \
'amenities', p.amenities, 'highlights', p.highlights, \
'isPetsAllowed', p.is_pets_allowed, 'isParkingIncluded', p.is_parking_included, \
'beds', p.beds, 'baths', p.baths, 'squareFeet', p.square_feet, \
'propertyType', p.property_type, 'availableFrom', p.available_from, \
'yearBuilt', p.year_built, 'floorNumber', p.floor_number, 'totalFloors', p.total_floors, \
'leaseTerm', p.lease_term, 'availabilityStatus', p.availability_status, \
'locationDescription', p.location_description, 'nearbySchools', p.nearby_schools, \
'nearbyHospitals', p.nearby_hospitals, 'nearbyTransit', p.nearby_transit, \
'nearbyShopping', p.nearby_shopping, 'postedDate', p.posted_date, \
'locationId', p.location_id, 'managerCognitoId', p.manager_cognito_id";

const LOCATION_FIELDS: &str = "\
'id', l.id, 'address', l.address, 'city', l.city, 'state', l.state, \
'country', l.country, 'postalCode', l.postal_code, 'coordinates', ST_AsText(l.coordinates)";

fn listing_select() -> String {
    format!(
        "SELECT json_build_object({}, 'location', json_build_object({})) AS row \
         FROM properties p JOIN locations l ON l.id = p.location_id",
        PROPERTY_FIELDS, LOCATION_FIELDS
    )
}

fn property_select() -> String {
    format!("SELECT json_build_object({}) AS row FROM properties p", PROPERTY_FIELDS)
}

/// Deserializes the `row` JSON column into a model
fn from_json_row<T: DeserializeOwned>(row: &PgRow) -> Result<T, StoreError> {
    let value: Value = row.try_get("row")?;
    Ok(serde_json::from_value(value)?)
}

fn from_json_rows<T: DeserializeOwned>(rows: &[PgRow]) -> Result<Vec<T>, StoreError> {
    rows.iter().map(from_json_row).collect()
}

fn has_sqlstate(err: &sqlx::Error, code: &str) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(code))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23505")
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, "23503")
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(DatabaseManager::health_check(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_select_joins_location_once() {
        let sql = listing_select();
        assert!(sql.contains("'coordinates', ST_AsText(l.coordinates)"));
        assert!(sql.ends_with("FROM properties p JOIN locations l ON l.id = p.location_id"));
        assert_eq!(sql.matches("json_build_object").count(), 2);
    }

    #[test]
    fn property_fields_use_model_keys() {
        for key in ["'pricePerMonth'", "'squareFeet'", "'managerCognitoId'", "'photoUrls'"] {
            assert!(PROPERTY_FIELDS.contains(key), "missing {}", key);
        }
        // json_build_object takes at most 100 arguments, two more are added for the location
        assert!(PROPERTY_FIELDS.split(", ").count() + 2 <= 100);
    }
}
