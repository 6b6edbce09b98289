use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::debug;

use super::{from_json_row, from_json_rows, is_foreign_key_violation, listing_select, PgStore};
use crate::database::models::{NewLocation, NewProperty, StoredListing};
use crate::database::store::{PropertyStore, StoreError};
use crate::filter::SearchFilter;

fn names<T: ToString>(values: &[T]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[async_trait]
impl PropertyStore for PgStore {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<StoredListing>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(listing_select());
        filter.push_where(&mut qb);
        qb.push(" ORDER BY p.id");
        debug!(sql = qb.sql(), "property search");

        let rows = qb.build().fetch_all(&self.pool).await?;
        from_json_rows(&rows)
    }

    async fn find(&self, id: i32) -> Result<Option<StoredListing>, StoreError> {
        let sql = format!("{} WHERE p.id = $1", listing_select());
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(from_json_row).transpose()
    }

    async fn create(&self, property: NewProperty, location: NewLocation) -> Result<StoredListing, StoreError> {
        let mut tx = self.pool.begin().await?;

        let location_id: i32 = sqlx::query(
            "INSERT INTO locations (address, city, state, country, postal_code, coordinates) \
             VALUES ($1, $2, $3, $4, $5, ST_GeomFromText($6, 4326)::geography) RETURNING id",
        )
        .bind(&location.address)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.country)
        .bind(&location.postal_code)
        .bind(&location.coordinates)
        .fetch_one(&mut *tx)
        .await?
        .try_get("id")?;

        let manager = property.manager_cognito_id.clone();
        let inserted = sqlx::query(
            "INSERT INTO properties (name, description, price_per_month, security_deposit, application_fee, \
             photo_urls, amenities, highlights, is_pets_allowed, is_parking_included, beds, baths, square_feet, \
             property_type, available_from, year_built, floor_number, total_floors, lease_term, availability_status, \
             location_description, nearby_schools, nearby_hospitals, nearby_transit, nearby_shopping, \
             location_id, manager_cognito_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, \
             $21, $22, $23, $24, $25, $26, $27) RETURNING id",
        )
        .bind(property.name)
        .bind(property.description)
        .bind(property.price_per_month)
        .bind(property.security_deposit)
        .bind(property.application_fee)
        .bind(property.photo_urls)
        .bind(names(&property.amenities))
        .bind(names(&property.highlights))
        .bind(property.is_pets_allowed)
        .bind(property.is_parking_included)
        .bind(property.beds)
        .bind(property.baths)
        .bind(property.square_feet)
        .bind(property.property_type.as_str())
        .bind(property.available_from)
        .bind(property.year_built)
        .bind(property.floor_number)
        .bind(property.total_floors)
        .bind(property.lease_term)
        .bind(property.availability_status.map(|s| s.as_str()))
        .bind(property.location_description)
        .bind(property.nearby_schools)
        .bind(property.nearby_hospitals)
        .bind(property.nearby_transit)
        .bind(property.nearby_shopping)
        .bind(location_id)
        .bind(property.manager_cognito_id)
        .fetch_one(&mut *tx)
        .await;

        let id: i32 = match inserted {
            Ok(row) => row.try_get("id")?,
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(StoreError::not_found(format!("Manager {}", manager)));
            }
            Err(e) => return Err(e.into()),
        };

        let sql = format!("{} WHERE p.id = $1", listing_select());
        let row = sqlx::query(&sql).bind(id).fetch_one(&mut *tx).await?;
        let listing = from_json_row(&row)?;

        tx.commit().await?;
        Ok(listing)
    }

    async fn by_manager(&self, manager_cognito_id: &str) -> Result<Vec<StoredListing>, StoreError> {
        let sql = format!("{} WHERE p.manager_cognito_id = $1 ORDER BY p.id", listing_select());
        let rows = sqlx::query(&sql).bind(manager_cognito_id).fetch_all(&self.pool).await?;
        from_json_rows(&rows)
    }

    async fn residences(&self, tenant_cognito_id: &str) -> Result<Vec<StoredListing>, StoreError> {
        let sql = format!(
            "{} WHERE EXISTS (SELECT 1 FROM tenant_residences r \
             WHERE r.property_id = p.id AND r.tenant_cognito_id = $1) ORDER BY p.id",
            listing_select()
        );
        let rows = sqlx::query(&sql).bind(tenant_cognito_id).fetch_all(&self.pool).await?;
        from_json_rows(&rows)
    }
}
